use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// First bundle release published for Apple silicon.
pub const MIN_MAC_ARM_VERSION: &str = "2.1.0";

/// First bundle release published for Linux on ARM.
pub const MIN_LINUX_ARM_VERSION: &str = "3.5.1";

/// Platform and architecture identifier embedded in artifact names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactTag {
    Win64,
    Linux64,
    LinuxArm,
    Macosx,
    MacosArm,
}

impl ArtifactTag {
    pub const ALL: [ArtifactTag; 5] = [
        ArtifactTag::Win64,
        ArtifactTag::Linux64,
        ArtifactTag::LinuxArm,
        ArtifactTag::Macosx,
        ArtifactTag::MacosArm,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ArtifactTag::Win64 => "win64",
            ArtifactTag::Linux64 => "linux64",
            ArtifactTag::LinuxArm => "linux_arm",
            ArtifactTag::Macosx => "macosx",
            ArtifactTag::MacosArm => "macos_arm",
        }
    }

    pub fn is_arm(self) -> bool {
        matches!(self, ArtifactTag::LinuxArm | ArtifactTag::MacosArm)
    }

    /// The tag to use instead when a release predates ARM support.
    pub fn non_arm(self) -> Self {
        match self {
            ArtifactTag::LinuxArm => ArtifactTag::Linux64,
            ArtifactTag::MacosArm => ArtifactTag::Macosx,
            other => other,
        }
    }

    /// Oldest release carrying this tag, if the tag was introduced later.
    pub fn min_version(self) -> Option<&'static str> {
        match self {
            ArtifactTag::LinuxArm => Some(MIN_LINUX_ARM_VERSION),
            ArtifactTag::MacosArm => Some(MIN_MAC_ARM_VERSION),
            _ => None,
        }
    }
}

impl fmt::Display for ArtifactTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtifactTag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArtifactTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| Error::UnknownTag(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_strings_round_trip() {
        for tag in ArtifactTag::ALL {
            assert_eq!(tag.as_str().parse::<ArtifactTag>().unwrap(), tag);
        }
        assert!("linux32".parse::<ArtifactTag>().is_err());
    }

    #[test]
    fn test_non_arm() {
        assert_eq!(ArtifactTag::MacosArm.non_arm(), ArtifactTag::Macosx);
        assert_eq!(ArtifactTag::LinuxArm.non_arm(), ArtifactTag::Linux64);
        assert_eq!(ArtifactTag::Win64.non_arm(), ArtifactTag::Win64);
    }

    #[test]
    fn test_min_version_only_for_arm() {
        for tag in ArtifactTag::ALL {
            assert_eq!(tag.min_version().is_some(), tag.is_arm());
        }
    }
}
