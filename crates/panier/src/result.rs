//! Result and error types for panier.

use thiserror::Error;

/// Result type for panier operations
pub type PanierResult<T> = Result<T, PanierError>;

/// Errors that can occur while driving a page
#[derive(Debug, Error)]
pub enum PanierError {
    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Browser teardown error
    #[error("Failed to close browser: {message}")]
    BrowserClose {
        /// Error message
        message: String,
    },

    /// Page error
    #[error("Page error: {message}")]
    Page {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    NavigationError {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Navigation did not finish in time
    #[error("Navigation to {url} timed out after {ms}ms")]
    NavigationTimeout {
        /// URL that was requested
        url: String,
        /// Timeout in milliseconds
        ms: u64,
    },

    /// The locator never matched an element
    #[error("No element matching {locator} after {ms}ms")]
    ElementNotFound {
        /// Locator description
        locator: String,
        /// Timeout in milliseconds
        ms: u64,
    },

    /// An index-less locator matched several elements
    #[error("Strict mode violation: {locator} resolved to {count} elements")]
    StrictModeViolation {
        /// Locator description
        locator: String,
        /// Number of matches
        count: usize,
    },

    /// The element never became actionable
    #[error("Element {locator} is not actionable after {ms}ms: {reason}")]
    NotActionable {
        /// Locator description
        locator: String,
        /// Last observed blocker
        reason: String,
        /// Timeout in milliseconds
        ms: u64,
    },

    /// Expectation failed after auto-waiting
    #[error(
        "Assertion failed for {locator} after {ms}ms\n  Expected: {expected}\n  Received: {received}"
    )]
    AssertionFailed {
        /// Locator description
        locator: String,
        /// Expected value, as described by the assertion
        expected: String,
        /// Last observed value
        received: String,
        /// Timeout in milliseconds
        ms: u64,
    },

    /// Page script evaluation error
    #[error("Script evaluation failed: {message}")]
    Script {
        /// Error message
        message: String,
    },

    /// Input simulation error
    #[error("Input simulation failed: {message}")]
    Input {
        /// Error message
        message: String,
    },

    /// Screenshot error
    #[error("Screenshot failed: {message}")]
    Screenshot {
        /// Error message
        message: String,
    },

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PanierError {
    /// Whether the error comes from an expectation rather than from the page
    #[must_use]
    pub const fn is_assertion(&self) -> bool {
        matches!(self, Self::AssertionFailed { .. })
    }

    /// Whether the error means a locator resolved to nothing
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::ElementNotFound { .. })
    }

    /// Whether a page query may succeed if repeated, as when a script
    /// raced a navigation and lost its execution context
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Script { .. })
    }
}
