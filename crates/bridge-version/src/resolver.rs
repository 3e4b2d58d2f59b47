use bridge_fetch::{Fetcher, HttpClient, Sleeper};
use bridge_platform::{ArtifactTag, PlatformInfo};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::catalog::fetch_catalog;
use crate::error::{Error, Result};
use crate::manifest::bundle_version;
use crate::repository::Artifactory;
use crate::url_version::{manifest_url_for, version_from_url};

/// Where the bundle to install comes from.
///
/// An explicit URL wins over a pinned version; with neither, the latest
/// release is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSource {
    Url(String),
    Version(String),
    Latest,
}

impl VersionSource {
    /// Pick the source from raw inputs. Blank inputs count as unset.
    pub fn from_inputs(download_url: Option<&str>, version: Option<&str>) -> Self {
        let present = |value: Option<&str>| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        match (present(download_url), present(version)) {
            (Some(url), _) => Self::Url(url),
            (None, Some(version)) => Self::Version(version),
            (None, None) => Self::Latest,
        }
    }
}

/// A concrete bundle to install.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionSpec {
    /// `None` when the version could not be determined; such a bundle is
    /// never considered already installed.
    pub version:      Option<String>,
    pub download_url: String,
}

pub struct VersionResolver<'a, C: HttpClient, S: Sleeper> {
    fetcher:  &'a Fetcher<C, S>,
    repo:     &'a Artifactory,
    platform: &'a PlatformInfo,
}

impl<'a, C: HttpClient, S: Sleeper> VersionResolver<'a, C, S> {
    pub fn new(fetcher: &'a Fetcher<C, S>, repo: &'a Artifactory, platform: &'a PlatformInfo) -> Self {
        Self {
            fetcher,
            repo,
            platform,
        }
    }

    pub async fn resolve(&self, source: &VersionSource) -> Result<VersionSpec> {
        let spec = match source {
            VersionSource::Url(url) => {
                let version = match version_from_url(url) {
                    Some("") => self.latest_version(&manifest_url_for(url)?).await,
                    Some(version) => Some(version.to_string()),
                    None => {
                        debug!(url, "no bundle version in download URL");
                        None
                    }
                };
                VersionSpec {
                    version,
                    download_url: url.trim().to_string(),
                }
            }
            VersionSource::Version(version) => {
                let version = version.trim();
                if !self.validate_version(version).await {
                    return Err(Error::VersionNotFound(version.to_string()));
                }
                VersionSpec {
                    version:      Some(version.to_string()),
                    download_url: self.version_url(version)?,
                }
            }
            VersionSource::Latest => {
                info!("Checking for latest version of Bridge to download and configure");
                VersionSpec {
                    version:      self.latest_version(&self.repo.latest_manifest_url()).await,
                    download_url: self.latest_url()?,
                }
            }
        };

        info!(
            "Bridge CLI version is - {}",
            spec.version.as_deref().unwrap_or_default()
        );
        Ok(spec)
    }

    pub async fn list_published_versions(&self) -> Vec<String> {
        fetch_catalog(self.fetcher, self.repo.catalog_url()).await
    }

    pub async fn validate_version(&self, version: &str) -> bool {
        let version = version.trim();
        self.list_published_versions()
            .await
            .iter()
            .any(|published| published == version)
    }

    /// Bundle version recorded in the manifest at `manifest_url`.
    pub async fn latest_version(&self, manifest_url: &str) -> Option<String> {
        let version = self
            .fetcher
            .get(manifest_url, "Getting latest Bridge CLI versions")
            .await
            .filter(|response| response.is_ok())
            .and_then(|response| bundle_version(response.body.trim()).map(str::to_string));

        if version.is_none() {
            warn!("Unable to retrieve the most recent version from Artifactory URL");
        }
        version
    }

    /// Download URL for a pinned release, using the non-ARM tag for releases
    /// that predate ARM builds.
    pub fn version_url(&self, version: &str) -> Result<String> {
        let tag = self.tag(Some(version))?;
        Ok(self.repo.version_url(version, tag))
    }

    pub fn latest_url(&self) -> Result<String> {
        let tag = self.tag(None)?;
        Ok(self.repo.latest_url(tag))
    }

    fn tag(&self, version: Option<&str>) -> Result<ArtifactTag> {
        self.platform
            .resolve_artifact_tag(version)
            .ok_or_else(|| Error::UnsupportedPlatform(self.platform.os().to_string()))
    }
}
