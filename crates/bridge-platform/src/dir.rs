//! Default install locations.

use std::path::PathBuf;

use crate::BUNDLE_NAME;
use crate::error::{Error, Result};
use crate::tag::ArtifactTag;

pub fn user_home() -> Option<PathBuf> {
    home::home_dir()
}

/// Per-user root that bundles are extracted into when no directory is configured.
pub fn default_install_root() -> Result<PathBuf> {
    user_home()
        .map(|home| home.join(BUNDLE_NAME))
        .ok_or(Error::NoHomeDir)
}

/// Folder name a bundle for `tag` lives under, e.g. `bridge-cli-bundle-linux64`.
pub fn bundle_dir_name(tag: ArtifactTag) -> String {
    format!("{BUNDLE_NAME}-{tag}")
}
