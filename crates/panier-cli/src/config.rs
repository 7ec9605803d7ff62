//! CLI configuration

use crate::commands::{RunArgs, StepsArgs, TargetArgs};
use crate::error::{CliError, CliResult};
use crate::output::OutputFormat;
use panier::{BrowserConfig, CartScenario, Timeouts};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// CLI verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Verbosity {
    /// Quiet - errors only
    Quiet,
    /// Normal - default output
    #[default]
    Normal,
    /// Verbose - extra output
    Verbose,
    /// Debug - maximum output
    Debug,
}

impl Verbosity {
    /// Map `-q` and the `-v` count to a level
    #[must_use]
    pub const fn from_flags(quiet: bool, verbose: u8) -> Self {
        if quiet {
            return Self::Quiet;
        }
        match verbose {
            0 => Self::Normal,
            1 => Self::Verbose,
            _ => Self::Debug,
        }
    }

    /// Check if quiet mode
    #[must_use]
    pub const fn is_quiet(self) -> bool {
        matches!(self, Self::Quiet)
    }

    /// Check if verbose or higher
    #[must_use]
    pub const fn is_verbose(self) -> bool {
        matches!(self, Self::Verbose | Self::Debug)
    }
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorChoice {
    /// Always use colors
    Always,
    /// Use colors when output is a terminal
    #[default]
    Auto,
    /// Never use colors
    Never,
}

impl ColorChoice {
    /// Should use colors based on output detection
    #[must_use]
    pub fn should_color(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => console::Term::stderr().features().colors_supported(),
        }
    }
}

/// Log line format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogFormat {
    /// Compact human-readable lines
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

/// Global CLI configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Verbosity level
    pub verbosity: Verbosity,
    /// Color output choice
    pub color: ColorChoice,
    /// Log line format
    pub log_format: LogFormat,
}

impl CliConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set verbosity
    #[must_use]
    pub const fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set color choice
    #[must_use]
    pub const fn with_color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }

    /// Set log format
    #[must_use]
    pub const fn with_log_format(mut self, log_format: LogFormat) -> Self {
        self.log_format = log_format;
        self
    }
}

/// Parse a `WIDTHxHEIGHT` viewport
///
/// # Errors
///
/// Returns `CliError::Config` when the value is malformed or has a zero side
pub fn parse_viewport(value: &str) -> CliResult<(u32, u32)> {
    let invalid = || CliError::config(format!("invalid viewport {value:?}, expected WIDTHxHEIGHT"));
    let (width, height) = value
        .trim()
        .split_once(['x', 'X'])
        .ok_or_else(invalid)?;
    let width: u32 = width.trim().parse().map_err(|_| invalid())?;
    let height: u32 = height.trim().parse().map_err(|_| invalid())?;
    if width == 0 || height == 0 {
        return Err(invalid());
    }
    Ok((width, height))
}

fn positive_ms(name: &str, ms: u64) -> CliResult<Duration> {
    if ms == 0 {
        return Err(CliError::config(format!("{name} must be greater than 0")));
    }
    Ok(Duration::from_millis(ms))
}

/// Build the scenario from `--url` and `--product`
///
/// # Errors
///
/// Returns `CliError::Config` for a non-HTTP URL or an empty product
pub fn scenario_from(target: &TargetArgs) -> CliResult<CartScenario> {
    let url = target.url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(CliError::config(format!(
            "url must start with http:// or https://, got {url:?}"
        )));
    }
    let product = target.product.trim();
    if product.is_empty() {
        return Err(CliError::config("product must not be empty"));
    }
    Ok(CartScenario::new().with_url(url).with_product(product))
}

/// Settings for one `panier run`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Scenario to run
    pub scenario: CartScenario,
    /// Chromium settings
    pub browser: BrowserConfig,
    /// Page timeouts
    pub timeouts: Timeouts,
    /// Where to save a screenshot on failure
    pub screenshot_on_failure: Option<PathBuf>,
    /// Report format
    pub format: OutputFormat,
}

impl RunConfig {
    /// Validate `panier run` arguments
    ///
    /// # Errors
    ///
    /// Returns `CliError::Config` for any invalid value
    pub fn from_args(args: &RunArgs) -> CliResult<Self> {
        let scenario = scenario_from(&args.target)?;
        let (width, height) = parse_viewport(&args.viewport)?;

        let mut browser = BrowserConfig::default()
            .with_headless(!args.headed)
            .with_viewport(width, height);
        if args.no_sandbox {
            browser = browser.with_no_sandbox();
        }
        if let Some(ref path) = args.chromium_path {
            browser = browser.with_chromium_path(path.as_str());
        }

        let timeouts = Timeouts::default()
            .with_navigation(positive_ms("navigation timeout", args.navigation_timeout_ms)?)
            .with_action(positive_ms("action timeout", args.action_timeout_ms)?)
            .with_expect(positive_ms("expect timeout", args.expect_timeout_ms)?);

        Ok(Self {
            scenario,
            browser,
            timeouts,
            screenshot_on_failure: args.screenshot_on_failure.clone(),
            format: args.format.into(),
        })
    }
}

/// Settings for `panier steps`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepsConfig {
    /// Scenario to describe
    pub scenario: CartScenario,
    /// Output format
    pub format: OutputFormat,
}

impl StepsConfig {
    /// Validate `panier steps` arguments
    ///
    /// # Errors
    ///
    /// Returns `CliError::Config` for an invalid URL or product
    pub fn from_args(args: &StepsArgs) -> CliResult<Self> {
        Ok(Self {
            scenario: scenario_from(&args.target)?,
            format: args.format.into(),
        })
    }
}
