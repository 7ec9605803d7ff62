//! CLI command definitions using clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use panier::{MON_MARCHE_URL, PRODUCT_NAME};
use std::path::PathBuf;

/// Panier: checks that a product can be added to the mon-marche.fr cart
#[derive(Parser, Debug)]
#[command(name = "panier")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Log line format
    #[arg(long, default_value = "pretty", global = true)]
    pub log_format: LogFormatArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the cart scenario in Chromium
    Run(RunArgs),

    /// Print the scenario steps without opening a browser
    Steps(StepsArgs),
}

/// Store and product selection shared by both commands
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Store URL
    #[arg(long, default_value = MON_MARCHE_URL)]
    pub url: String,

    /// Product to add to the cart
    #[arg(long, default_value = PRODUCT_NAME)]
    pub product: String,
}

/// Arguments for the run command
#[derive(Args, Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct RunArgs {
    /// Store and product
    #[command(flatten)]
    pub target: TargetArgs,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Disable the Chromium sandbox (containers, CI)
    #[arg(long)]
    pub no_sandbox: bool,

    /// Chromium binary (auto-detected when absent)
    #[arg(long, env = "CHROMIUM_PATH")]
    pub chromium_path: Option<String>,

    /// Viewport size as WIDTHxHEIGHT
    #[arg(long, default_value = "1280x720")]
    pub viewport: String,

    /// Page load timeout in milliseconds
    #[arg(long, default_value = "30000")]
    pub navigation_timeout_ms: u64,

    /// Locator and click timeout in milliseconds
    #[arg(long, default_value = "10000")]
    pub action_timeout_ms: u64,

    /// Assertion timeout in milliseconds
    #[arg(long, default_value = "5000")]
    pub expect_timeout_ms: u64,

    /// Save a PNG of the page here when the scenario fails
    #[arg(long, value_name = "FILE")]
    pub screenshot_on_failure: Option<PathBuf>,

    /// Report format
    #[arg(short, long, default_value = "text")]
    pub format: FormatArg,
}

/// Arguments for the steps command
#[derive(Args, Debug, Clone)]
pub struct StepsArgs {
    /// Store and product
    #[command(flatten)]
    pub target: TargetArgs,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: FormatArg,
}

/// Report format argument
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormatArg {
    /// Human-readable text
    #[default]
    Text,
    /// JSON on stdout
    Json,
}

/// Log format argument
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormatArg {
    /// Compact human-readable lines
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

/// Color argument
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

impl From<LogFormatArg> for crate::config::LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Json => Self::Json,
        }
    }
}

impl From<FormatArg> for crate::output::OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => Self::Text,
            FormatArg::Json => Self::Json,
        }
    }
}
