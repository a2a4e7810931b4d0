//! IOTA Keytool - keys, addresses, signatures and BCS from the command line.

pub mod commands;
pub mod config;
pub mod output;
pub mod telemetry;

use clap::Parser;
use tracing::info;

fn main() {
    let cli = commands::Cli::parse();
    if let Err(e) = run(cli) {
        output::print_error(&e);
        std::process::exit(1);
    }
}

fn run(cli: commands::Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => config::KeytoolConfig::from_file(path)?,
        None => config::KeytoolConfig::default(),
    };
    config.validate()?;

    let log_level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    telemetry::init_telemetry(&log_level, cli.json_logs || config.logging.json)?;
    if let Some(path) = &cli.config {
        info!("Loaded configuration from: {:?}", path);
    }

    let registry = config.build_registry()?;
    let result = commands::execute(cli.command, &config, &registry)?;
    output::print_json(&result)
}
