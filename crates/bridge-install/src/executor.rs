use std::path::{Path, PathBuf};

use bridge_platform::OsFamily;
use tokio::process::Command;
use tracing::{debug, info};

use crate::args::split_args;
use crate::error::{Error, Result};

pub const EXECUTABLE_NAME: &str = "bridge-cli";

/// Runs the Bridge CLI out of an installed bundle.
#[derive(Debug, Clone)]
pub struct BridgeExecutor {
    bridge_dir: PathBuf,
    os:         OsFamily,
}

impl BridgeExecutor {
    pub fn new(bridge_dir: impl Into<PathBuf>, os: OsFamily) -> Self {
        Self {
            bridge_dir: bridge_dir.into(),
            os,
        }
    }

    pub fn bridge_dir(&self) -> &Path {
        &self.bridge_dir
    }

    /// Path of the executable, trying `.exe` first on Windows.
    pub fn executable(&self) -> Result<PathBuf> {
        let base = self.bridge_dir.join(EXECUTABLE_NAME);
        let found = self
            .os
            .executable_suffixes()
            .iter()
            .map(|suffix| {
                let mut name = base.clone().into_os_string();
                name.push(suffix);
                PathBuf::from(name)
            })
            .find(|candidate| candidate.is_file());
        found.ok_or(Error::ExecutableNotFound(base))
    }

    /// Run with the pre-joined `command` in `working_dir` and return its exit code.
    ///
    /// A non-zero code is returned, not raised. A process killed by a signal
    /// reports `-1`.
    pub async fn run(&self, command: &str, working_dir: &Path) -> Result<i32> {
        let executable = self.executable()?;
        let args = split_args(command);
        info!("Executing {} {command}", executable.display());
        debug!(cwd = %working_dir.display(), ?args, "spawning bridge");

        let status = Command::new(&executable)
            .args(&args)
            .current_dir(working_dir)
            .status()
            .await
            .map_err(|source| Error::Launch {
                path: executable.clone(),
                source,
            })?;

        let code = status.code().unwrap_or(-1);
        debug!(code, "bridge exited");
        Ok(code)
    }
}
