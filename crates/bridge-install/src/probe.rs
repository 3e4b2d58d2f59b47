use bridge_version::manifest::{MANIFEST_FILE, records_bundle_version};
use tracing::{debug, info};

use crate::error::Result;
use crate::layout::InstallLayout;

/// Checks whether a bundle version is already extracted where it would run from.
pub struct LocalInstallationProbe<'a> {
    layout: &'a InstallLayout,
}

impl<'a> LocalInstallationProbe<'a> {
    pub fn new(layout: &'a InstallLayout) -> Self {
        Self { layout }
    }

    /// `true` only when the bundle's `versions.txt` records `version`.
    ///
    /// An unknown version, a missing manifest or an unreadable one all mean
    /// "not installed". A configured install directory that does not exist is
    /// an error.
    pub fn exists(&self, version: Option<&str>) -> Result<bool> {
        let bridge_path = self.layout.locate()?;
        let Some(version) = version.filter(|v| !v.is_empty()) else {
            debug!("bundle version unknown, treating as not installed");
            return Ok(false);
        };

        let manifest = bridge_path.join(MANIFEST_FILE);
        if !manifest.is_file() {
            return Ok(false);
        }
        debug!(path = %bridge_path.display(), "version file found");

        match std::fs::read_to_string(&manifest) {
            Ok(content) => Ok(records_bundle_version(&content, version)),
            Err(e) => {
                info!("Error reading version file content: {e}");
                Ok(false)
            }
        }
    }
}
