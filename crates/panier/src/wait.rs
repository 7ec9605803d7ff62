//! Auto-waiting.
//!
//! Locator resolution and `expect()` assertions poll the driver at a fixed
//! interval until the probe reports ready or the timeout elapses. Page
//! script failures count as "not yet" (see `transient`); other driver
//! errors abort the wait immediately.

use std::future::Future;
use std::time::{Duration, Instant};

use crate::locator::DEFAULT_POLL_INTERVAL_MS;
use crate::result::PanierResult;

/// Options for wait operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Total time budget
    pub timeout: Duration,
    /// Delay between probes
    pub poll_interval: Duration,
}

impl WaitOptions {
    /// Create options with the default poll interval
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }

    /// Set the poll interval
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Timeout in whole milliseconds, for error messages
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }
}

/// Outcome of a single probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe<T> {
    /// Condition holds
    Ready(T),
    /// Condition does not hold yet; the string describes what was observed
    Pending(String),
}

/// The wait ran out of time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stalled {
    /// Number of probes made
    pub attempts: usize,
    /// Time spent waiting
    pub elapsed: Duration,
    /// Last observation reported by the probe
    pub last: String,
}

/// Sort the result of one driver query made inside a probe.
///
/// A transient error (a page script that failed, typically because a
/// navigation destroyed its context) becomes `Ok(Err(observed))` so the
/// probe can report `Pending` and poll again. Other errors stay fatal.
///
/// # Errors
///
/// Returns any non-transient driver error unchanged.
pub fn transient<T>(result: PanierResult<T>) -> PanierResult<Result<T, String>> {
    match result {
        Ok(value) => Ok(Ok(value)),
        Err(e) if e.is_transient() => {
            tracing::debug!(error = %e, "page query failed, polling again");
            Ok(Err(e.to_string()))
        }
        Err(e) => Err(e),
    }
}

/// Probe until ready or out of time.
///
/// The probe always runs at least once, even with a zero timeout.
///
/// # Errors
///
/// Returns the first driver error raised by the probe. A timeout is not an
/// error at this level: it comes back as `Ok(Err(Stalled))` so callers can
/// map it to the right failure (element not found, assertion failed...).
pub async fn poll_until<T, F, Fut>(
    options: WaitOptions,
    mut probe: F,
) -> PanierResult<Result<T, Stalled>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = PanierResult<Probe<T>>>,
{
    let start = Instant::now();
    let mut attempts = 0;

    loop {
        attempts += 1;
        let last = match probe().await? {
            Probe::Ready(value) => return Ok(Ok(value)),
            Probe::Pending(observed) => observed,
        };

        let elapsed = start.elapsed();
        if elapsed >= options.timeout {
            tracing::debug!(attempts, ?elapsed, %last, "wait timed out");
            return Ok(Err(Stalled {
                attempts,
                elapsed,
                last,
            }));
        }

        let remaining = options.timeout - elapsed;
        tokio::time::sleep(options.poll_interval.min(remaining)).await;
    }
}
