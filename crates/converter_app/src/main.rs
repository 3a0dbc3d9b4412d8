mod cli;
mod platform;

use std::process::ExitCode;

use clap::Parser;
use engine_logging::{engine_error, engine_info};

use cli::Cli;
use platform::config::AppConfig;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = AppConfig::from_cli(&cli);
    platform::logging::initialize(cli.log, cli.verbose, &config.state_dir);
    engine_info!(
        "convert-client {} server={} state_dir={:?}",
        env!("CARGO_PKG_VERSION"),
        config.service_base,
        config.state_dir
    );

    match platform::commands::run(cli.command, &config) {
        Ok(code) => code,
        Err(err) => {
            engine_error!("{:#}", err);
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
