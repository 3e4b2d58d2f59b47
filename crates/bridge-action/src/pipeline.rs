//! Acquisition from action inputs to a runnable Bridge CLI.

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use bridge_fetch::{ClientCache, Fetcher, HttpClient, ReqwestClient, Sleeper};
use bridge_install::{ArchiveInstaller, BridgeExecutor, InstallLayout};
use bridge_platform::PlatformInfo;
use bridge_platform::dir::default_install_root;
use bridge_version::{Artifactory, VersionResolver, VersionSource, VersionSpec};
use tracing::{debug, info};

use crate::config::ActionConfig;

pub const AIR_GAP_VERSION_MESSAGE: &str =
    "Unable to use the specified Bridge CLI version in air gap mode. Please provide a valid 'BRIDGE_CLI_DOWNLOAD_URL'.";

/// Prefix of the per-run scratch directory archives are downloaded into.
pub const SCRATCH_PREFIX: &str = "blackduck-security-action";

pub struct Acquisition<C: HttpClient, S: Sleeper> {
    config:   ActionConfig,
    platform: PlatformInfo,
    fetcher:  Fetcher<C, S>,
    repo:     Artifactory,
    layout:   InstallLayout,
}

impl Acquisition<ReqwestClient, bridge_fetch::TokioSleeper> {
    /// Acquisition for this runner, with an HTTP client from `cache`.
    pub fn from_config(config: ActionConfig, cache: &ClientCache) -> anyhow::Result<Self> {
        let settings = config.client_settings();
        settings.validate()?;
        let client = cache
            .get_or_build(&settings)
            .context("failed to build HTTP client")?;

        let platform = PlatformInfo::detect();
        debug!(os = %platform.os(), arch = platform.arch(), cpu = platform.cpu_model(), "detected platform");
        Self::new(
            config,
            platform,
            Fetcher::new(ReqwestClient::from_client(client)),
            default_install_root()?,
        )
    }
}

impl<C: HttpClient, S: Sleeper> Acquisition<C, S> {
    /// `default_root` is where bundles go when no install directory is configured.
    pub fn new(
        config: ActionConfig,
        platform: PlatformInfo,
        fetcher: Fetcher<C, S>,
        default_root: PathBuf,
    ) -> anyhow::Result<Self> {
        let layout = InstallLayout::for_platform(&platform, default_root)?
            .install_dir(config.install_directory())
            .air_gap(config.network_airgap);
        let repo = config
            .bridgecli_base_url
            .as_deref()
            .map(Artifactory::new)
            .unwrap_or_default();

        Ok(Self {
            config,
            platform,
            fetcher,
            repo,
            layout,
        })
    }

    pub fn source(&self) -> VersionSource {
        VersionSource::from_inputs(
            self.config.bridgecli_download_url.as_deref(),
            self.config.bridgecli_download_version.as_deref(),
        )
    }

    fn resolver(&self) -> VersionResolver<'_, C, S> {
        VersionResolver::new(&self.fetcher, &self.repo, &self.platform)
    }

    pub async fn versions(&self) -> Vec<String> {
        self.resolver().list_published_versions().await
    }

    pub async fn resolve(&self) -> anyhow::Result<VersionSpec> {
        Ok(self.resolver().resolve(&self.source()).await?)
    }

    /// Make the Bridge CLI available and return the directory it runs from.
    ///
    /// In air gap mode without a download URL nothing is fetched and the
    /// pre-staged installation is used.
    pub async fn install(&self, temp_dir: &Path) -> anyhow::Result<PathBuf> {
        if self.config.network_airgap && self.config.bridgecli_download_url.is_none() {
            if self.config.bridgecli_download_version.is_some() {
                bail!(AIR_GAP_VERSION_MESSAGE);
            }
            info!("Network air gap is enabled, skipping Bridge CLI download");
            return Ok(self.layout.bridge_path()?);
        }

        let spec = match self.resolver().resolve(&self.source()).await {
            Ok(spec) => spec,
            Err(e) => {
                if let Err(cleanup) = tokio::fs::remove_dir_all(temp_dir).await {
                    debug!(path = %temp_dir.display(), error = %cleanup, "failed to remove scratch directory");
                }
                return Err(bridge_install::Error::from(e)
                    .classify(self.config.runner_os())
                    .into());
            }
        };

        let installer = ArchiveInstaller::new(&self.fetcher, &self.layout, self.config.runner_os());
        let outcome = installer.install(temp_dir, &spec).await?;
        Ok(outcome.path().to_path_buf())
    }

    /// Install if needed, then run the Bridge CLI and return its exit code.
    pub async fn run(&self, temp_dir: &Path, command: &str, working_dir: &Path) -> anyhow::Result<i32> {
        let bridge_dir = self.install(temp_dir).await?;
        let executor = BridgeExecutor::new(bridge_dir, self.platform.os());
        Ok(executor.run(command, working_dir).await?)
    }
}

/// Per-run scratch directory, removed when dropped.
pub fn scratch_dir() -> anyhow::Result<tempfile::TempDir> {
    tempfile::Builder::new()
        .prefix(SCRATCH_PREFIX)
        .tempdir()
        .context("failed to create scratch directory")
}
