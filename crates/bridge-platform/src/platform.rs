//! Execution environment snapshot and artifact tag resolution.

use once_cell::sync::Lazy;
use regex::Regex;
use sysinfo::System;
use tracing::{debug, info};

use crate::os::OsFamily;
use crate::tag::ArtifactTag;
use crate::version;

static ARM_ARCH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(arm.*|aarch.*)$").unwrap());

/// Operating system, CPU architecture and primary CPU model of the runner.
///
/// Built once per run with [`PlatformInfo::detect`], or by hand in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformInfo {
    os:        OsFamily,
    arch:      String,
    cpu_model: String,
}

impl PlatformInfo {
    pub fn new(os: OsFamily, arch: impl Into<String>, cpu_model: impl Into<String>) -> Self {
        Self {
            os,
            arch: arch.into(),
            cpu_model: cpu_model.into(),
        }
    }

    /// Snapshot the current process environment.
    pub fn detect() -> Self {
        let mut sys = System::new();
        sys.refresh_cpu_all();

        let cpu_model = sys
            .cpus()
            .first()
            .map(|cpu| cpu.brand().to_string())
            .unwrap_or_default();
        let arch = System::cpu_arch();

        let info = Self::new(OsFamily::current(), arch, cpu_model);
        debug!(os = %info.os, arch = %info.arch, cpu = %info.cpu_model, "detected platform");
        info
    }

    pub fn os(&self) -> OsFamily {
        self.os
    }

    pub fn arch(&self) -> &str {
        &self.arch
    }

    pub fn cpu_model(&self) -> &str {
        &self.cpu_model
    }

    /// Whether the runner is an ARM machine.
    ///
    /// macOS reports the CPU brand rather than a reliable architecture under
    /// Rosetta, so anything that is not an Intel part counts as ARM there.
    pub fn is_arm(&self) -> bool {
        match self.os {
            OsFamily::Mac => !self.cpu_model.contains("Intel"),
            OsFamily::Linux => ARM_ARCH.is_match(&self.arch),
            OsFamily::Windows | OsFamily::Unknown => false,
        }
    }

    /// Tag for the detected hardware, ignoring release history.
    pub fn detected_tag(&self) -> Option<ArtifactTag> {
        let arm = self.is_arm();
        match self.os {
            OsFamily::Mac if arm => Some(ArtifactTag::MacosArm),
            OsFamily::Mac => Some(ArtifactTag::Macosx),
            OsFamily::Linux if arm => Some(ArtifactTag::LinuxArm),
            OsFamily::Linux => Some(ArtifactTag::Linux64),
            OsFamily::Windows => Some(ArtifactTag::Win64),
            OsFamily::Unknown => None,
        }
    }

    /// Tag to download for `version`, or for the latest release when `None`.
    ///
    /// A pinned release older than the first ARM build for this OS falls back
    /// to the non-ARM tag. Returns `None` on an unsupported OS.
    pub fn resolve_artifact_tag(&self, version: Option<&str>) -> Option<ArtifactTag> {
        let detected = self.detected_tag()?;
        let (Some(version), Some(minimum)) = (version, detected.min_version()) else {
            return Some(detected);
        };

        match version::at_least(version, minimum) {
            Some(true) => Some(detected),
            Some(false) => {
                let fallback = detected.non_arm();
                info!(
                    "Detected Bridge CLI version ({version}) below the minimum ARM support requirement ({minimum}). Defaulting to {fallback} platform."
                );
                Some(fallback)
            }
            None => {
                debug!(version, "version is not comparable, keeping detected platform");
                Some(detected)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mac(cpu: &str) -> PlatformInfo {
        PlatformInfo::new(OsFamily::Mac, "aarch64", cpu)
    }

    fn linux(arch: &str) -> PlatformInfo {
        PlatformInfo::new(OsFamily::Linux, arch, "Neoverse-N1")
    }

    #[test]
    fn test_mac_arm_detection_uses_cpu_model() {
        assert!(mac("Apple M1").is_arm());
        assert!(!mac("Intel(R) Core(TM) i7-9750H CPU @ 2.60GHz").is_arm());
    }

    #[test]
    fn test_linux_arm_detection_uses_arch() {
        assert!(linux("aarch64").is_arm());
        assert!(linux("arm64").is_arm());
        assert!(linux("armv7l").is_arm());
        assert!(!linux("x86_64").is_arm());
        assert!(!linux("x64").is_arm());
    }

    #[test]
    fn test_windows_is_never_arm() {
        let win = PlatformInfo::new(OsFamily::Windows, "aarch64", "Snapdragon");
        assert!(!win.is_arm());
        assert_eq!(win.resolve_artifact_tag(Some("9.9.9")), Some(ArtifactTag::Win64));
    }

    #[test]
    fn test_unknown_os_has_no_tag() {
        let other = PlatformInfo::new(OsFamily::Unknown, "x86_64", "");
        assert_eq!(other.resolve_artifact_tag(None), None);
        assert_eq!(other.resolve_artifact_tag(Some("1.0.0")), None);
    }

    #[test]
    fn test_latest_mode_uses_detected_tag() {
        assert_eq!(mac("Apple M1").resolve_artifact_tag(None), Some(ArtifactTag::MacosArm));
        assert_eq!(linux("aarch64").resolve_artifact_tag(None), Some(ArtifactTag::LinuxArm));
    }

    #[test]
    fn test_mac_arm_gate() {
        let m1 = mac("Apple M1");
        assert_eq!(m1.resolve_artifact_tag(Some("2.1.2")), Some(ArtifactTag::MacosArm));
        assert_eq!(m1.resolve_artifact_tag(Some("2.1.0")), Some(ArtifactTag::MacosArm));
        assert_eq!(m1.resolve_artifact_tag(Some("0.1.0")), Some(ArtifactTag::Macosx));
    }

    #[test]
    fn test_linux_arm_gate() {
        let arm = linux("aarch64");
        assert_eq!(arm.resolve_artifact_tag(Some("3.5.1")), Some(ArtifactTag::LinuxArm));
        assert_eq!(arm.resolve_artifact_tag(Some("3.5.0")), Some(ArtifactTag::Linux64));
        assert_eq!(arm.resolve_artifact_tag(Some("2.9.9")), Some(ArtifactTag::Linux64));
    }

    #[test]
    fn test_gate_ignored_on_non_arm() {
        let intel = mac("Intel(R) Xeon(R)");
        assert_eq!(intel.resolve_artifact_tag(Some("9.0.0")), Some(ArtifactTag::Macosx));
        assert_eq!(linux("x86_64").resolve_artifact_tag(Some("0.1.0")), Some(ArtifactTag::Linux64));
    }

    #[test]
    fn test_every_combination_yields_known_tag() {
        let oses = [OsFamily::Mac, OsFamily::Linux, OsFamily::Windows];
        let cpus = [("aarch64", "Apple M2"), ("x86_64", "Intel(R) Core(TM)"), ("armv7l", "Cortex-A72")];
        let versions = [None, Some("0.1.0"), Some("2.1.0"), Some("3.5.1"), Some("4.0.0")];

        for os in oses {
            for (arch, cpu) in cpus {
                for version in versions {
                    let info = PlatformInfo::new(os, arch, cpu);
                    let tag = info.resolve_artifact_tag(version).unwrap();
                    assert!(ArtifactTag::ALL.contains(&tag));

                    if let (Some(v), Some(min)) = (version, info.detected_tag().and_then(|t| t.min_version())) {
                        if version::at_least(v, min) == Some(false) {
                            assert!(!tag.is_arm(), "{os:?}/{arch}/{v} should fall back");
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_detect_returns_consistent_snapshot() {
        let info = PlatformInfo::detect();
        assert_eq!(info.os(), OsFamily::current());
    }
}
