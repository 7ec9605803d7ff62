//! Panier: checks that a product can be added to the mon-marche.fr cart
//!
//! Exit status is 0 when every step passed and 1 otherwise.

use clap::Parser;
use panier_cli::{
    logging, print_steps, run, Cli, CliConfig, CliResult, Commands, RunConfig, StepsConfig,
    Verbosity,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> CliResult<()> {
    let cli = Cli::parse();
    let config = build_config(&cli);
    logging::init_logging(config.verbosity, config.log_format);

    match cli.command {
        Commands::Run(args) => {
            let run_config = RunConfig::from_args(&args)?;
            run(&config, &run_config)
        }
        Commands::Steps(args) => print_steps(&StepsConfig::from_args(&args)?),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    CliConfig::new()
        .with_verbosity(Verbosity::from_flags(cli.quiet, cli.verbose))
        .with_color(cli.color.into())
        .with_log_format(cli.log_format.into())
}
