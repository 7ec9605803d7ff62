//! Scoped browser session.
//!
//! The browser is released after the scenario whatever the outcome. A
//! teardown error is logged and never replaces the scenario's own result.

use crate::driver::PanierDriver;
use crate::page::{Page, Timeouts};
use crate::scenario::{CartScenario, ScenarioFailure, ScenarioReport, StepObserver};

#[cfg(feature = "browser")]
use crate::browser::{BrowserConfig, ChromiumDriver};
#[cfg(feature = "browser")]
use crate::result::PanierResult;

/// Outcome of a session, with the page handed back after close
#[derive(Debug)]
pub struct SessionOutcome<D: PanierDriver> {
    /// Scenario result
    pub result: Result<ScenarioReport, ScenarioFailure>,
    /// Screenshot taken after a failure, when requested
    pub failure_screenshot: Option<Vec<u8>>,
    /// The closed driver
    pub driver: D,
}

/// Options for `run_in_session`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionOptions {
    /// Page timeouts
    pub timeouts: Timeouts,
    /// Capture the viewport before closing when the scenario fails
    pub screenshot_on_failure: bool,
}

impl SessionOptions {
    /// Set timeouts
    #[must_use]
    pub const fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Capture a screenshot on failure
    #[must_use]
    pub const fn with_screenshot_on_failure(mut self) -> Self {
        self.screenshot_on_failure = true;
        self
    }
}

/// Run `scenario` on a fresh page over `driver`, then close it.
pub async fn run_in_session<D, O>(
    driver: D,
    options: SessionOptions,
    scenario: &CartScenario,
    observer: &mut O,
) -> SessionOutcome<D>
where
    D: PanierDriver,
    O: StepObserver + ?Sized,
{
    let mut page = Page::new(driver).with_timeouts(options.timeouts);
    let result = scenario.run_observed(&mut page, observer).await;

    let mut failure_screenshot = None;
    if result.is_err() && options.screenshot_on_failure {
        match page.screenshot().await {
            Ok(png) => failure_screenshot = Some(png),
            Err(e) => tracing::warn!(error = %e, "failure screenshot not captured"),
        }
    }

    match page.close().await {
        Ok(()) => tracing::debug!("browser closed"),
        Err(e) => tracing::warn!(error = %e, "browser teardown failed"),
    }

    SessionOutcome {
        result,
        failure_screenshot,
        driver: page.into_driver(),
    }
}

/// Launch Chromium for a session
///
/// # Errors
///
/// Returns `BrowserLaunch` when Chromium cannot be started
#[cfg(feature = "browser")]
pub async fn launch_chromium(config: BrowserConfig) -> PanierResult<ChromiumDriver> {
    ChromiumDriver::launch(config).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockDriver, MockNode};
    use crate::result::PanierError;
    use std::time::Duration;

    fn quick() -> SessionOptions {
        SessionOptions::default().with_timeouts(
            Timeouts::default()
                .with_action(Duration::from_millis(30))
                .with_expect(Duration::from_millis(30))
                .with_poll_interval(Duration::from_millis(5)),
        )
    }

    #[tokio::test]
    async fn test_closes_after_failure() {
        let scenario = CartScenario::new().with_url("https://empty.test");
        let driver = MockDriver::new().with_page("https://empty.test", vec![MockNode::new("main")]);
        let outcome = run_in_session(driver, quick(), &scenario, &mut ()).await;

        let failure = outcome.result.unwrap_err();
        assert!(matches!(failure.error, PanierError::ElementNotFound { .. }));
        assert!(outcome.driver.is_closed());
        assert!(outcome.failure_screenshot.is_none());
    }

    #[tokio::test]
    async fn test_screenshot_on_failure() {
        let scenario = CartScenario::new().with_url("https://empty.test");
        let driver = MockDriver::new().with_page("https://empty.test", vec![]);
        let options = quick().with_screenshot_on_failure();
        let outcome = run_in_session(driver, options, &scenario, &mut ()).await;

        assert!(outcome.result.is_err());
        assert!(outcome.failure_screenshot.is_some());
        assert_eq!(outcome.driver.history().last().map(String::as_str), Some("close"));
    }

    #[tokio::test]
    async fn test_navigation_failure_still_closes() {
        let scenario = CartScenario::new().with_url("https://unreachable.test");
        let outcome = run_in_session(MockDriver::new(), quick(), &scenario, &mut ()).await;
        let failure = outcome.result.unwrap_err();
        assert_eq!(failure.step, crate::scenario::Step::Navigate);
        assert!(outcome.driver.was_called("close"));
    }
}
