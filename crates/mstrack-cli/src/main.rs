use clap::Parser;
use eyre::Result;

mod commands;
mod config;
mod logging;

use commands::{Cli, Context};

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => config::config_path()?,
    };
    let mut config = config::load_effective(&config_path)?;
    if let Some(data) = &cli.data {
        config.data_path = data.clone();
    }

    logging::init_tracing(&config.log_filter, config.json_logs)?;
    tracing::debug!(
        config = %config_path.display(),
        data = %config.data_path.display(),
        "starting command"
    );

    let ctx = Context {
        config,
        config_path,
        actor: cli.actor.clone(),
    };
    cli.dispatch(ctx)
}
