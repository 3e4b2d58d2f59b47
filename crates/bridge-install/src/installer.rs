use std::path::{Path, PathBuf};

use bridge_fetch::{Fetcher, HttpClient, Sleeper};
use bridge_version::VersionSpec;
use tracing::{debug, info};

use crate::archive::extract_zip;
use crate::error::{Error, Result};
use crate::layout::InstallLayout;
use crate::probe::LocalInstallationProbe;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The wanted version was already in place; nothing was downloaded.
    AlreadyInstalled(PathBuf),
    Installed(PathBuf),
}

impl InstallOutcome {
    pub fn path(&self) -> &Path {
        match self {
            Self::AlreadyInstalled(path) | Self::Installed(path) => path,
        }
    }
}

/// Downloads a bundle and swaps it in at the layout's target folder.
pub struct ArchiveInstaller<'a, C: HttpClient, S: Sleeper> {
    fetcher:   &'a Fetcher<C, S>,
    layout:    &'a InstallLayout,
    runner_os: String,
}

impl<'a, C: HttpClient, S: Sleeper> ArchiveInstaller<'a, C, S> {
    /// `runner_os` is the CI runner's OS label, used only in error messages.
    pub fn new(fetcher: &'a Fetcher<C, S>, layout: &'a InstallLayout, runner_os: impl Into<String>) -> Self {
        Self {
            fetcher,
            layout,
            runner_os: runner_os.into(),
        }
    }

    /// Install `spec`, downloading into the scratch directory `temp_dir`.
    ///
    /// An existing bundle folder is removed, never merged. On failure
    /// `temp_dir` is deleted and the error rewritten for users (see
    /// [`Error::classify`]).
    pub async fn install(&self, temp_dir: &Path, spec: &VersionSpec) -> Result<InstallOutcome> {
        match self.try_install(temp_dir, spec).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                debug!(error = %e, "installation failed");
                if let Err(cleanup) = tokio::fs::remove_dir_all(temp_dir).await {
                    debug!(path = %temp_dir.display(), error = %cleanup, "failed to remove scratch directory");
                }
                Err(e.classify(&self.runner_os))
            }
        }
    }

    async fn try_install(&self, temp_dir: &Path, spec: &VersionSpec) -> Result<InstallOutcome> {
        let probe = LocalInstallationProbe::new(self.layout);
        if probe.exists(spec.version.as_deref())? {
            info!("Bridge CLI already exists, download has been skipped");
            return Ok(InstallOutcome::AlreadyInstalled(self.layout.locate()?));
        }

        info!("Downloading and configuring Bridge from URL - {}", spec.download_url);
        let archive = self.fetcher.download(&spec.download_url, temp_dir).await?;

        let root = self.layout.extract_root();
        let target = self.layout.target_dir();
        info!("Clear the existing bridge folder, if available from {}", target.display());
        if tokio::fs::try_exists(&target).await.unwrap_or(false) {
            tokio::fs::remove_dir_all(&target)
                .await
                .map_err(Error::io("remove", &target))?;
        }

        tokio::fs::create_dir_all(root)
            .await
            .map_err(Error::io("create directory", root))?;
        let (zip_path, dest) = (archive.clone(), root.to_path_buf());
        tokio::task::spawn_blocking(move || extract_zip(&zip_path, &dest)).await??;

        let extracted = root.join(extracted_folder_name(&archive));
        debug!("Rename folder from {} to {}", extracted.display(), target.display());
        tokio::fs::rename(&extracted, &target)
            .await
            .map_err(Error::io("rename", &extracted))?;

        info!("Download and configuration of Bridge CLI completed");
        Ok(InstallOutcome::Installed(target))
    }
}

/// Top-level folder inside a bundle archive: its file name up to `.zip`.
fn extracted_folder_name(archive: &Path) -> String {
    let name = archive
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.split_once(".zip") {
        Some((stem, _)) => stem.to_string(),
        None => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracted_folder_name() {
        assert_eq!(
            extracted_folder_name(Path::new("/tmp/x/bridge-cli-bundle-1.2.3-linux64.zip")),
            "bridge-cli-bundle-1.2.3-linux64"
        );
        assert_eq!(
            extracted_folder_name(Path::new("bridge-cli-bundle-win64.zip")),
            "bridge-cli-bundle-win64"
        );
        assert_eq!(extracted_folder_name(Path::new("bundle")), "bundle");
    }
}
