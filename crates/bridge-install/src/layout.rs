use std::path::{Path, PathBuf};

use bridge_platform::dir::bundle_dir_name;
use bridge_platform::{ArtifactTag, PlatformInfo};
use tracing::debug;

use crate::error::{Error, Result};

/// Where bundles are extracted and where the active one is expected to live.
///
/// Bundles extract under the configured install directory, or under the
/// per-user default root when none is configured. Each lands in a folder
/// named after the runner's artifact tag, e.g. `bridge-cli-bundle-linux64`.
#[derive(Debug, Clone)]
pub struct InstallLayout {
    install_dir:  Option<PathBuf>,
    default_root: PathBuf,
    tag:          ArtifactTag,
    air_gap:      bool,
}

impl InstallLayout {
    pub fn new(tag: ArtifactTag, default_root: impl Into<PathBuf>) -> Self {
        Self {
            install_dir: None,
            default_root: default_root.into(),
            tag,
            air_gap: false,
        }
    }

    /// Layout for `platform` with bundles defaulting to `default_root`.
    ///
    /// The folder name follows the detected hardware. A pinned pre-ARM
    /// release downloaded on an ARM runner still lands in the ARM folder.
    pub fn for_platform(platform: &PlatformInfo, default_root: impl Into<PathBuf>) -> Result<Self> {
        let tag = platform
            .detected_tag()
            .ok_or_else(|| Error::UnsupportedPlatform(platform.os().to_string()))?;
        Ok(Self::new(tag, default_root))
    }

    #[must_use]
    pub fn install_dir(mut self, install_dir: Option<PathBuf>) -> Self {
        self.install_dir = install_dir.filter(|dir| !dir.as_os_str().is_empty());
        self
    }

    #[must_use]
    pub fn air_gap(mut self, air_gap: bool) -> Self {
        self.air_gap = air_gap;
        self
    }

    pub fn tag(&self) -> ArtifactTag {
        self.tag
    }

    /// Directory archives are extracted into.
    pub fn extract_root(&self) -> &Path {
        self.install_dir.as_deref().unwrap_or(&self.default_root)
    }

    /// Final location of a freshly installed bundle.
    pub fn target_dir(&self) -> PathBuf {
        self.extract_root().join(bundle_dir_name(self.tag))
    }

    /// Directory the Bridge CLI runs from.
    ///
    /// A configured install directory must exist. Its bundle subfolder is used
    /// when present, otherwise the directory itself is taken to be the bundle.
    /// Without one, the default bundle folder is used, which in air gap mode
    /// must already be staged.
    pub fn bridge_path(&self) -> Result<PathBuf> {
        let path = self.locate()?;
        if self.install_dir.is_none() && self.air_gap && !path.exists() {
            return Err(Error::DefaultDirectoryNotFound(path));
        }
        Ok(path)
    }

    /// Like [`InstallLayout::bridge_path`] without the air gap staging check.
    pub(crate) fn locate(&self) -> Result<PathBuf> {
        let Some(install_dir) = &self.install_dir else {
            return Ok(self.default_root.join(bundle_dir_name(self.tag)));
        };

        if !install_dir.is_dir() {
            return Err(Error::InstallDirectoryNotFound(install_dir.clone()));
        }
        let bundle = install_dir.join(bundle_dir_name(self.tag));
        if bundle.exists() {
            Ok(bundle)
        } else {
            debug!(path = %install_dir.display(), "no bundle subfolder, using install directory as is");
            Ok(install_dir.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use bridge_platform::OsFamily;

    use super::*;
    use crate::DEFAULT_DIRECTORY_NOT_FOUND_MESSAGE;

    #[test]
    fn test_default_layout() {
        let layout = InstallLayout::new(ArtifactTag::Linux64, "/home/runner/bridge-cli-bundle");

        assert_eq!(layout.extract_root(), Path::new("/home/runner/bridge-cli-bundle"));
        assert_eq!(
            layout.target_dir(),
            Path::new("/home/runner/bridge-cli-bundle/bridge-cli-bundle-linux64")
        );
        assert_eq!(layout.bridge_path().unwrap(), layout.target_dir());
    }

    #[test]
    fn test_for_platform_follows_detected_hardware() {
        let mac_arm = PlatformInfo::new(OsFamily::Mac, "arm64", "Apple M2");
        let layout = InstallLayout::for_platform(&mac_arm, "/Users/runner/bridge-cli-bundle").unwrap();
        assert_eq!(layout.tag(), ArtifactTag::MacosArm);
        assert!(layout.target_dir().ends_with("bridge-cli-bundle-macos_arm"));

        let linux = PlatformInfo::new(OsFamily::Linux, "x86_64", "Intel(R) Xeon(R)");
        let layout = InstallLayout::for_platform(&linux, "/home/runner/bridge-cli-bundle").unwrap();
        assert_eq!(layout.tag(), ArtifactTag::Linux64);
    }

    #[test]
    fn test_for_platform_rejects_unknown_os() {
        let unknown = PlatformInfo::new(OsFamily::Unknown, "riscv64", "");

        let err = InstallLayout::for_platform(&unknown, "/root").unwrap_err();

        assert!(matches!(err, Error::UnsupportedPlatform(_)));
        assert!(err.to_string().contains("not supported"));
    }

    #[test]
    fn test_install_dir_must_exist() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing");
        let layout = InstallLayout::new(ArtifactTag::Win64, dir.path()).install_dir(Some(missing));

        let err = layout.bridge_path().unwrap_err();

        assert!(matches!(err, Error::InstallDirectoryNotFound(_)));
    }

    #[test]
    fn test_install_dir_prefers_bundle_subfolder() {
        let dir = tempdir().unwrap();
        let layout = InstallLayout::new(ArtifactTag::MacosArm, "/unused").install_dir(Some(dir.path().to_path_buf()));

        assert_eq!(layout.bridge_path().unwrap(), dir.path());

        let bundle = dir.path().join("bridge-cli-bundle-macos_arm");
        std::fs::create_dir(&bundle).unwrap();
        assert_eq!(layout.bridge_path().unwrap(), bundle);
        assert_eq!(layout.target_dir(), bundle);
    }

    #[test]
    fn test_empty_install_dir_is_unset() {
        let layout = InstallLayout::new(ArtifactTag::Linux64, "/root").install_dir(Some(PathBuf::new()));
        assert_eq!(layout.extract_root(), Path::new("/root"));
    }

    #[test]
    fn test_air_gap_requires_staged_default() {
        let dir = tempdir().unwrap();
        let layout = InstallLayout::new(ArtifactTag::LinuxArm, dir.path()).air_gap(true);

        let err = layout.bridge_path().unwrap_err();
        assert_eq!(err.to_string(), DEFAULT_DIRECTORY_NOT_FOUND_MESSAGE);

        std::fs::create_dir(layout.target_dir()).unwrap();
        assert_eq!(layout.bridge_path().unwrap(), layout.target_dir());
    }
}
