//! Auto-waiting assertions (Playwright's `expect()`).
//!
//! `page.expect(locator).to_contain_text("...").await?` polls until the
//! condition holds or the expect timeout elapses, then fails with
//! `AssertionFailed` carrying what was expected and what was last seen.

use std::future::Future;
use std::time::Duration;

use crate::driver::PanierDriver;
use crate::locator::Locator;
use crate::page::Page;
use crate::result::{PanierError, PanierResult};
use crate::text::{contains_normalized, normalize_whitespace};
use crate::wait::{poll_until, transient, Probe};

/// Observation used when the locator matches nothing
const NO_ELEMENT: &str = "<no element>";

/// One look at the element's text
enum Observed {
    Text(String),
    Missing,
    /// The page query failed transiently
    Unreadable(String),
}

impl Observed {
    /// Ready when `accept` takes the text
    fn judge(self, accept: impl FnOnce(&str) -> bool) -> Probe<()> {
        match self {
            Self::Text(actual) if accept(&actual) => Probe::Ready(()),
            Self::Text(actual) => Probe::Pending(format!("{actual:?}")),
            Self::Missing => Probe::Pending(NO_ELEMENT.to_string()),
            Self::Unreadable(observed) => Probe::Pending(observed),
        }
    }
}

/// Smart assertion builder for locators
#[derive(Debug)]
pub struct Expect<'p, D: PanierDriver> {
    page: &'p Page<D>,
    locator: Locator,
    timeout: Duration,
}

impl<'p, D: PanierDriver> Expect<'p, D> {
    /// Create a new expectation for a locator
    pub fn new(page: &'p Page<D>, locator: Locator) -> Self {
        Self {
            timeout: page.timeouts().expect,
            page,
            locator,
        }
    }

    /// Override the expect timeout for this assertion
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Poll `check` until it accepts, or report `expected` vs the last observation.
    async fn settle<F, Fut>(&self, expected: String, check: F) -> PanierResult<()>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = PanierResult<Probe<()>>>,
    {
        let wait = self.page.timeouts().wait(self.timeout);
        match poll_until(wait, check).await? {
            Ok(()) => {
                tracing::debug!(locator = %self.locator, %expected, "expectation met");
                Ok(())
            }
            Err(stalled) => Err(PanierError::AssertionFailed {
                locator: self.locator.to_string(),
                expected,
                received: stalled.last,
                ms: wait.timeout_ms(),
            }),
        }
    }

    /// Normalised text of the single matching element
    async fn observe_text(&self) -> PanierResult<Observed> {
        let driver = self.page.driver();
        let selector = self.locator.selector();
        let count = match transient(driver.count(selector).await)? {
            Ok(count) => count,
            Err(observed) => return Ok(Observed::Unreadable(observed)),
        };
        if count == 0 {
            return Ok(Observed::Missing);
        }
        if self.locator.is_strict() && count > 1 {
            return Err(PanierError::StrictModeViolation {
                locator: self.locator.to_string(),
                count,
            });
        }
        Ok(match transient(driver.text_content(selector, 0).await)? {
            Ok(Some(text)) => Observed::Text(normalize_whitespace(&text)),
            Ok(None) => Observed::Missing,
            Err(observed) => Observed::Unreadable(observed),
        })
    }

    /// Assert the element's text contains `text` (case-sensitive, whitespace-normalised)
    ///
    /// # Errors
    ///
    /// `AssertionFailed` after the timeout, `StrictModeViolation`, or a driver error
    pub async fn to_contain_text(&self, text: &str) -> PanierResult<()> {
        self.settle(format!("text containing {text:?}"), || async move {
            Ok(self
                .observe_text()
                .await?
                .judge(|actual| contains_normalized(actual, text)))
        })
        .await
    }

    /// Assert the element's normalised text equals `text`
    ///
    /// # Errors
    ///
    /// `AssertionFailed` after the timeout, `StrictModeViolation`, or a driver error
    pub async fn to_have_text(&self, text: &str) -> PanierResult<()> {
        let wanted = normalize_whitespace(text);
        let wanted = wanted.as_str();
        self.settle(format!("text {wanted:?}"), || async move {
            Ok(self.observe_text().await?.judge(|actual| actual == wanted))
        })
        .await
    }

    /// Assert the element is visible
    ///
    /// # Errors
    ///
    /// `AssertionFailed` after the timeout, or a driver error
    pub async fn to_be_visible(&self) -> PanierResult<()> {
        let driver = self.page.driver();
        let selector = self.locator.selector();
        self.settle("visible".to_string(), || async move {
            Ok(match transient(driver.actionability(selector, 0).await)? {
                Ok(Some(state)) if state.visible => Probe::Ready(()),
                Ok(Some(_)) => Probe::Pending("hidden".to_string()),
                Ok(None) => Probe::Pending(NO_ELEMENT.to_string()),
                Err(observed) => Probe::Pending(observed),
            })
        })
        .await
    }

    /// Assert the number of matches
    ///
    /// # Errors
    ///
    /// `AssertionFailed` after the timeout, or a driver error
    pub async fn to_have_count(&self, expected: usize) -> PanierResult<()> {
        let driver = self.page.driver();
        let selector = self.locator.selector();
        self.settle(format!("{expected} elements"), || async move {
            let count = match transient(driver.count(selector).await)? {
                Ok(count) => count,
                Err(observed) => return Ok(Probe::Pending(observed)),
            };
            Ok(if count == expected {
                Probe::Ready(())
            } else {
                Probe::Pending(format!("{count} elements"))
            })
        })
        .await
    }
}
