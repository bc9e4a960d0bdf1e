use clap::Subcommand;
use eyre::Result;

use crate::config;

use super::Context;

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration.
    Show,
    /// Write the effective configuration to the config file.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

pub fn run(cmd: ConfigCommand, ctx: &Context) -> Result<()> {
    match cmd {
        ConfigCommand::Show => {
            println!("# {}", ctx.config_path.display());
            println!("{}", serde_json::to_string_pretty(&ctx.config)?);
        }
        ConfigCommand::Init { force } => {
            if ctx.config_path.exists() && !force {
                eyre::bail!(
                    "config already exists at {} (use --force to overwrite)",
                    ctx.config_path.display()
                );
            }
            config::save_config(&ctx.config_path, &ctx.config)?;
            println!("wrote {}", ctx.config_path.display());
        }
    }
    Ok(())
}
