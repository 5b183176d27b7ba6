use accident_warehouse::cli::{run, Cli};
use accident_warehouse::settings::Settings;
use accident_warehouse::utils::init_logging;
use anyhow::Context;
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let log_file = cli
        .log_file
        .clone()
        .unwrap_or_else(|| settings.log_file.clone());
    let _guard = init_logging(cli.verbose, &log_file).context("Failed to initialise logging")?;

    run(cli.command, settings).map_err(|e| {
        tracing::error!("accident-warehouse failed: {}", e);
        anyhow::Error::new(e)
    })
}
