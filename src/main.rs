// Entrypoint for the simulator.
// - Keeps `main` small: parse arguments, set up logging, build the config
//   and client, and delegate to `pizza_sim::run`.
// - Any setup error is reported on stderr and exits with the same code as
//   an aborted operation.

use std::io;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pizza_sim::api::ApiClient;
use pizza_sim::cli::Cli;
use pizza_sim::config::Config;
use pizza_sim::output::EXIT_ABORTED;

fn setup_logging(verbose: bool) {
    let default = if verbose { "pizza_sim=debug" } else { "pizza_sim=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(io::stderr),
        )
        .with(filter)
        .init();
}

fn try_main(cli: Cli) -> Result<u8> {
    let config = Config::from_env()?;
    let client = ApiClient::new(config.timeout)?.with_progress(!cli.verbose);
    debug!(timeout_secs = client.timeout().as_secs(), "client ready");

    let operation = cli.command.into_operation();
    pizza_sim::run(
        &operation,
        &config,
        &client,
        &mut io::stdout(),
        &mut io::stderr(),
    )
    .context("Failed to write output")
}

fn main() -> ExitCode {
    // clap prints usage and exits with code 2 on bad arguments.
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match try_main(cli) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(EXIT_ABORTED)
        }
    }
}
