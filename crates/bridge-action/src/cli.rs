use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;

#[derive(Debug, Parser)]
#[command(name = "bridge-action", version = env!("CARGO_PKG_VERSION"), about, long_about = None, propagate_version = true)]
pub struct Cli {
    /// TOML file with action inputs, read before the `INPUT_*` environment.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: Overrides,

    #[command(subcommand)]
    pub command: Command,
}

/// Inputs given as flags. Set values win over file and environment.
#[derive(Debug, Clone, Default, Args, Serialize)]
pub struct Overrides {
    #[arg(long = "download-url", global = true)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bridgecli_download_url: Option<String>,

    #[arg(long = "download-version", global = true)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bridgecli_download_version: Option<String>,

    #[arg(long = "install-directory", global = true)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bridgecli_install_directory: Option<String>,

    #[arg(long = "base-url", global = true)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bridgecli_base_url: Option<String>,

    #[arg(long = "airgap", global = true)]
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub network_airgap: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the versions published in the artifact repository.
    #[command(alias = "ls")]
    Versions,
    /// Print the version and download URL that would be installed.
    Resolve,
    /// Install the resolved bundle and print where it lives.
    #[command(alias = "i")]
    Install,
    /// Install if needed, then run the Bridge CLI and exit with its code.
    Run {
        #[arg(long, default_value = ".")]
        working_directory: PathBuf,

        #[arg(last = true)]
        args: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_collects_trailing_args() {
        let cli = Cli::try_parse_from([
            "bridge-action",
            "--download-version",
            "2.1.2",
            "run",
            "--working-directory",
            "/work",
            "--",
            "--stage",
            "polaris",
        ])
        .unwrap();

        assert_eq!(cli.overrides.bridgecli_download_version.as_deref(), Some("2.1.2"));
        match cli.command {
            Command::Run {
                working_directory,
                args,
            } => {
                assert_eq!(working_directory, PathBuf::from("/work"));
                assert_eq!(args, vec!["--stage", "polaris"]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["bridge-action", "install", "--airgap"]).unwrap();
        assert!(cli.overrides.network_airgap);
        assert!(matches!(cli.command, Command::Install));
    }
}
