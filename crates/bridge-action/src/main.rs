mod cli;
mod config;
mod logging;
mod pipeline;

use bridge_fetch::ClientCache;
use bridge_install::join_args;
use clap::Parser;
use tracing::error;

use crate::cli::{Cli, Command};
use crate::config::ActionConfig;
use crate::pipeline::{Acquisition, scratch_dir};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init();

    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("{e:#}");
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<i32> {
    let config = ActionConfig::load(cli.config.as_deref(), &cli.overrides)?;
    let cache = ClientCache::new();
    let acquisition = Acquisition::from_config(config, &cache)?;

    match cli.command {
        Command::Versions => {
            for version in acquisition.versions().await {
                println!("{version}");
            }
        }
        Command::Resolve => {
            let spec = acquisition.resolve().await?;
            println!("{}", serde_json::to_string_pretty(&spec)?);
        }
        Command::Install => {
            let scratch = scratch_dir()?;
            let path = acquisition.install(scratch.path()).await?;
            println!("{}", path.display());
        }
        Command::Run {
            working_directory,
            args,
        } => {
            let scratch = scratch_dir()?;
            return acquisition
                .run(scratch.path(), &join_args(&args), &working_directory)
                .await;
        }
    }
    Ok(0)
}
