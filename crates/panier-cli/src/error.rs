//! Error types for the CLI

use panier::{PanierError, Step};
use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// The scenario ran and a step failed
    #[error("Scenario failed at step {step}: {message}")]
    ScenarioFailed {
        /// Step that failed
        step: Step,
        /// Error message
        message: String,
    },

    /// Browser support is missing or Chromium could not start
    #[error("Browser unavailable: {message}")]
    BrowserUnavailable {
        /// Error message
        message: String,
    },

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Panier library error
    #[error("Panier error: {0}")]
    Panier(#[from] PanierError),

    /// Report serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a scenario failure error
    #[must_use]
    pub fn scenario_failed(step: Step, message: impl Into<String>) -> Self {
        Self::ScenarioFailed {
            step,
            message: message.into(),
        }
    }

    /// Create a browser unavailable error
    #[must_use]
    pub fn browser_unavailable(message: impl Into<String>) -> Self {
        Self::BrowserUnavailable {
            message: message.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error() {
        let err = CliError::config("bad viewport");
        assert!(err.to_string().contains("Configuration"));
        assert!(err.to_string().contains("bad viewport"));
    }

    #[test]
    fn test_scenario_failed_names_step() {
        let err = CliError::scenario_failed(Step::OpenCart, "no button");
        assert_eq!(
            err.to_string(),
            "Scenario failed at step 3. open_cart: no button"
        );
    }

    #[test]
    fn test_browser_unavailable_error() {
        let err = CliError::browser_unavailable("no chromium");
        assert!(err.to_string().contains("Browser unavailable"));
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let cli_err: CliError = io_err.into();
        assert!(cli_err.to_string().contains("I/O"));
    }

    #[test]
    fn test_panier_error_from() {
        let err: CliError = PanierError::Page {
            message: "closed".to_string(),
        }
        .into();
        assert!(err.to_string().starts_with("Panier error"));
    }
}
