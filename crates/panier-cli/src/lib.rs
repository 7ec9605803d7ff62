//! Panier CLI Library
//!
//! Command-line front end for the panier cart check.
//!
//! ## Usage
//!
//! ```bash
//! panier run                          # Headless run against mon-marche.fr
//! panier run --headed -v              # Watch the browser, info logs
//! panier run --format json            # Report as JSON on stdout
//! panier steps                        # Print the steps, no browser
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod config;
mod error;
pub mod logging;
mod output;
mod runner;

pub use commands::{
    Cli, ColorArg, Commands, FormatArg, LogFormatArg, RunArgs, StepsArgs, TargetArgs,
};
pub use config::{
    parse_viewport, CliConfig, ColorChoice, LogFormat, RunConfig, StepsConfig, Verbosity,
};
pub use error::{CliError, CliResult};
pub use output::{summary_line, write_plan, write_report, OutputFormat, ProgressReporter};
pub use runner::{check_passed, print_steps, run, run_scenario};
