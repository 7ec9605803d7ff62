//! Page: locator resolution with auto-wait on top of a `PanierDriver`.
//!
//! ```ignore
//! let mut page = Page::new(driver);
//! page.goto("https://www.mon-marche.fr").await?;
//! let cart = page.get_by_role(AriaRole::Button, RoleOptions::name("Mon panier"));
//! page.click(&cart, ClickOptions::forced()).await?;
//! page.expect(page.get_by_role(AriaRole::Dialog, RoleOptions::default()).first())
//!     .to_contain_text("La Tomate grappe sélection HVE")
//!     .await?;
//! ```

use std::time::{Duration, Instant};

use crate::driver::PanierDriver;
use crate::expect::Expect;
use crate::locator::{
    AriaRole, ClickOptions, Locator, RoleOptions, DEFAULT_ACTION_TIMEOUT_MS,
    DEFAULT_EXPECT_TIMEOUT_MS, DEFAULT_POLL_INTERVAL_MS,
};
use crate::result::{PanierError, PanierResult};
use crate::wait::{poll_until, transient, Probe, WaitOptions};

/// Default timeout for navigation (30 seconds)
pub const DEFAULT_NAVIGATION_TIMEOUT_MS: u64 = 30_000;

/// Time budgets for page operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Page load
    pub navigation: Duration,
    /// Locator resolution and actionability for clicks
    pub action: Duration,
    /// `expect()` assertions
    pub expect: Duration,
    /// Delay between auto-wait probes
    pub poll_interval: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            navigation: Duration::from_millis(DEFAULT_NAVIGATION_TIMEOUT_MS),
            action: Duration::from_millis(DEFAULT_ACTION_TIMEOUT_MS),
            expect: Duration::from_millis(DEFAULT_EXPECT_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

impl Timeouts {
    /// Set the navigation timeout
    #[must_use]
    pub const fn with_navigation(mut self, timeout: Duration) -> Self {
        self.navigation = timeout;
        self
    }

    /// Set the action timeout
    #[must_use]
    pub const fn with_action(mut self, timeout: Duration) -> Self {
        self.action = timeout;
        self
    }

    /// Set the expect timeout
    #[must_use]
    pub const fn with_expect(mut self, timeout: Duration) -> Self {
        self.expect = timeout;
        self
    }

    /// Set the poll interval
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub(crate) const fn wait(&self, timeout: Duration) -> WaitOptions {
        WaitOptions::new(timeout).with_poll_interval(self.poll_interval)
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// A browser page
#[derive(Debug)]
pub struct Page<D: PanierDriver> {
    driver: D,
    timeouts: Timeouts,
}

impl<D: PanierDriver> Page<D> {
    /// Wrap a driver with default timeouts
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            timeouts: Timeouts::default(),
        }
    }

    /// Replace the timeouts
    #[must_use]
    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Current timeouts
    pub const fn timeouts(&self) -> &Timeouts {
        &self.timeouts
    }

    /// Navigate to URL
    ///
    /// # Errors
    ///
    /// Returns `NavigationTimeout` when the page does not load within the
    /// navigation timeout, or the driver's `NavigationError`.
    pub async fn goto(&mut self, url: &str) -> PanierResult<()> {
        let budget = self.timeouts.navigation;
        tracing::info!(url, "navigating");
        match tokio::time::timeout(budget, self.driver.navigate(url)).await {
            Ok(result) => result,
            Err(_) => Err(PanierError::NavigationTimeout {
                url: url.to_string(),
                ms: millis(budget),
            }),
        }
    }

    /// URL of the current document
    ///
    /// # Errors
    ///
    /// Returns error if the driver cannot report it
    pub async fn url(&self) -> PanierResult<String> {
        self.driver.current_url().await
    }

    /// Locator for a CSS selector
    #[must_use]
    pub fn locator(&self, css: impl Into<String>) -> Locator {
        Locator::new(css)
    }

    /// Locator for an ARIA role
    #[must_use]
    pub fn get_by_role(&self, role: AriaRole, options: RoleOptions) -> Locator {
        Locator::by_role(role, options)
    }

    /// Wait until `locator` matches, enforcing strictness.
    ///
    /// Returns the number of matches.
    async fn resolve(&self, locator: &Locator, wait: WaitOptions) -> PanierResult<usize> {
        let driver = &self.driver;
        let selector = locator.selector();
        let outcome = poll_until(wait, || async move {
            let count = match transient(driver.count(selector).await)? {
                Ok(count) => count,
                Err(observed) => return Ok(Probe::Pending(observed)),
            };
            Ok(if count > 0 {
                Probe::Ready(count)
            } else {
                Probe::Pending("0 elements".to_string())
            })
        })
        .await?;

        let count = outcome.map_err(|_| PanierError::ElementNotFound {
            locator: locator.to_string(),
            ms: wait.timeout_ms(),
        })?;

        if locator.is_strict() && count > 1 {
            return Err(PanierError::StrictModeViolation {
                locator: locator.to_string(),
                count,
            });
        }
        tracing::debug!(%locator, count, "resolved");
        Ok(count)
    }

    /// Click the element matched by `locator`.
    ///
    /// Waits for the locator to match. A normal click then waits for the
    /// element to be actionable; a forced click does not.
    ///
    /// # Errors
    ///
    /// `ElementNotFound`, `StrictModeViolation`, `NotActionable`, or a driver
    /// error from the click itself.
    pub async fn click(&mut self, locator: &Locator, options: ClickOptions) -> PanierResult<()> {
        let budget = options.timeout.unwrap_or(self.timeouts.action);
        let start = Instant::now();
        let _ = self.resolve(locator, self.timeouts.wait(budget)).await?;

        if options.force {
            tracing::debug!(%locator, "forced click, actionability checks bypassed");
        } else {
            let remaining = budget.saturating_sub(start.elapsed());
            let driver = &self.driver;
            let selector = locator.selector();
            let outcome = poll_until(self.timeouts.wait(remaining), || async move {
                Ok(match transient(driver.actionability(selector, 0).await)? {
                    Ok(Some(state)) => match state.blocker() {
                        None => Probe::Ready(()),
                        Some(reason) => Probe::Pending(reason.to_string()),
                    },
                    Ok(None) => Probe::Pending("element is detached".to_string()),
                    Err(observed) => Probe::Pending(observed),
                })
            })
            .await?;

            outcome.map_err(|stalled| PanierError::NotActionable {
                locator: locator.to_string(),
                reason: stalled.last,
                ms: millis(budget),
            })?;
        }

        self.driver.click(locator.selector(), 0, &options).await?;
        tracing::info!(%locator, force = options.force, "clicked");
        Ok(())
    }

    /// Text content of the element matched by `locator`
    ///
    /// # Errors
    ///
    /// `ElementNotFound` or `StrictModeViolation`, or a driver error
    pub async fn text_content(&self, locator: &Locator) -> PanierResult<String> {
        let _ = self
            .resolve(locator, self.timeouts.wait(self.timeouts.action))
            .await?;
        Ok(self
            .driver
            .text_content(locator.selector(), 0)
            .await?
            .unwrap_or_default())
    }

    /// Number of elements matching `locator` right now
    ///
    /// # Errors
    ///
    /// Returns the driver error
    pub async fn count(&self, locator: &Locator) -> PanierResult<usize> {
        self.driver.count(locator.selector()).await
    }

    /// Start an auto-waiting assertion
    pub fn expect(&self, locator: Locator) -> Expect<'_, D> {
        Expect::new(self, locator)
    }

    /// PNG screenshot of the viewport
    ///
    /// # Errors
    ///
    /// Returns error if the driver cannot capture
    pub async fn screenshot(&self) -> PanierResult<Vec<u8>> {
        self.driver.screenshot().await
    }

    /// Close the page and the browser behind it
    ///
    /// # Errors
    ///
    /// Returns the driver's teardown error
    pub async fn close(&mut self) -> PanierResult<()> {
        self.driver.close().await
    }

    /// The underlying driver
    pub const fn driver(&self) -> &D {
        &self.driver
    }

    /// Take the driver back
    pub fn into_driver(self) -> D {
        self.driver
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockDriver, MockNode};

    const URL: &str = "https://shop.test";

    fn fast() -> Timeouts {
        Timeouts::default()
            .with_navigation(Duration::from_millis(200))
            .with_action(Duration::from_millis(60))
            .with_expect(Duration::from_millis(60))
            .with_poll_interval(Duration::from_millis(5))
    }

    async fn open(body: Vec<MockNode>) -> Page<MockDriver> {
        let mut page = Page::new(MockDriver::new().with_page(URL, body)).with_timeouts(fast());
        page.goto(URL).await.unwrap();
        page
    }

    mod timeout_tests {
        use super::*;

        #[test]
        fn test_default_timeouts() {
            let t = Timeouts::default();
            assert_eq!(t.navigation, Duration::from_secs(30));
            assert_eq!(t.action, Duration::from_secs(10));
            assert_eq!(t.expect, Duration::from_secs(5));
            assert_eq!(t.poll_interval, Duration::from_millis(100));
        }

        #[tokio::test]
        async fn test_slow_navigation_times_out() {
            let driver = MockDriver::new()
                .with_page(URL, Vec::new())
                .with_navigation_delay(Duration::from_millis(500));
            let mut page = Page::new(driver).with_timeouts(fast());
            let err = page.goto(URL).await.unwrap_err();
            assert!(matches!(err, PanierError::NavigationTimeout { ms: 200, .. }));
        }

        #[tokio::test]
        async fn test_navigation_error_passes_through() {
            let mut page = Page::new(MockDriver::new()).with_timeouts(fast());
            let err = page.goto("https://down.test").await.unwrap_err();
            assert!(matches!(err, PanierError::NavigationError { .. }));
        }
    }

    mod click_tests {
        use super::*;

        #[tokio::test]
        async fn test_click_missing_element_is_not_found() {
            let mut page = open(vec![MockNode::new("p")]).await;
            let loc = page.locator("button");
            let err = page.click(&loc, ClickOptions::default()).await.unwrap_err();
            assert!(err.is_not_found());
            assert!(err.to_string().contains("css=button"));
        }

        #[tokio::test]
        async fn test_strict_mode_violation() {
            let mut page = open(vec![MockNode::new("button"), MockNode::new("button")]).await;
            let loc = page.locator("button");
            let err = page.click(&loc, ClickOptions::forced()).await.unwrap_err();
            assert!(matches!(
                err,
                PanierError::StrictModeViolation { count: 2, .. }
            ));

            page.click(&loc.first(), ClickOptions::forced()).await.unwrap();
        }

        #[tokio::test]
        async fn test_covered_element_not_actionable() {
            let mut page = open(vec![MockNode::new("button").covered()]).await;
            let loc = page.locator("button");
            let err = page.click(&loc, ClickOptions::default()).await.unwrap_err();
            match err {
                PanierError::NotActionable { reason, .. } => {
                    assert_eq!(reason, "another element would receive the click");
                }
                other => panic!("unexpected error {other}"),
            }
            assert!(!page.driver().was_called("click:"));
        }

        #[tokio::test]
        async fn test_forced_click_skips_actionability() {
            let mut page = open(vec![MockNode::new("button").hidden()]).await;
            let loc = page.locator("button");
            page.click(&loc, ClickOptions::forced()).await.unwrap();
            assert!(page.driver().was_called("click:css=button[0] (forced)"));
            // No box to aim at, so the click is dispatched on the element.
            assert!(page.driver().was_called("click:dom"));
        }

        #[tokio::test]
        async fn test_forced_click_on_covered_element_uses_pointer() {
            let mut page = open(vec![MockNode::new("button").covered()]).await;
            let loc = page.locator("button");
            page.click(&loc, ClickOptions::forced()).await.unwrap();
            assert!(page.driver().was_called("click:css=button[0] (forced)"));
            assert!(!page.driver().was_called("click:dom"));
            assert!(!page.driver().was_called("click:intercepted"));
        }

        #[tokio::test]
        async fn test_click_waits_for_late_element() {
            let mut page = open(vec![MockNode::new("button").appears_after(3)]).await;
            let loc = page.locator("button");
            page.click(&loc, ClickOptions::default()).await.unwrap();
            assert!(page.driver().was_called("click:css=button"));
        }

        #[tokio::test]
        async fn test_click_timeout_override() {
            let mut page = open(vec![]).await;
            let loc = page.locator("button");
            let err = page
                .click(
                    &loc,
                    ClickOptions::forced().with_timeout(Duration::from_millis(20)),
                )
                .await
                .unwrap_err();
            assert!(matches!(err, PanierError::ElementNotFound { ms: 20, .. }));
        }
    }

    mod script_error_tests {
        use super::*;

        #[tokio::test]
        async fn test_click_polls_past_destroyed_context() {
            let mut page = open(vec![MockNode::new("button").key("go")]).await;
            page.driver().fail_evaluations(3);
            let loc = page.locator("button");
            page.click(&loc, ClickOptions::default()).await.unwrap();
            assert!(page.driver().was_called("click:css=button[0]"));
        }

        #[tokio::test]
        async fn test_script_error_until_timeout_is_not_found() {
            let mut page = open(vec![MockNode::new("button")]).await;
            page.driver().fail_evaluations(usize::MAX);
            let loc = page.locator("button");
            let err = page.click(&loc, ClickOptions::forced()).await.unwrap_err();
            assert!(err.is_not_found());
        }

        #[tokio::test]
        async fn test_closed_page_error_stays_fatal() {
            let mut page = open(vec![MockNode::new("button")]).await;
            page.close().await.unwrap();
            let loc = page.locator("button");
            let err = page.click(&loc, ClickOptions::forced()).await.unwrap_err();
            assert!(matches!(err, PanierError::Page { .. }));
        }
    }

    mod read_tests {
        use super::*;

        #[tokio::test]
        async fn test_text_content_and_count() {
            let page = open(vec![
                MockNode::new("li").text("un"),
                MockNode::new("li").text("deux"),
            ])
            .await;
            assert_eq!(page.count(&page.locator("li")).await.unwrap(), 2);
            let second = page.locator("li").nth(1);
            assert_eq!(page.text_content(&second).await.unwrap(), "deux");
        }

        #[tokio::test]
        async fn test_url_and_close() {
            let mut page = open(vec![]).await;
            assert_eq!(page.url().await.unwrap(), URL);
            page.close().await.unwrap();
            assert!(page.into_driver().is_closed());
        }
    }
}
