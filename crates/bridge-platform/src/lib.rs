//! Platform detection for Bridge CLI artifacts.
//!
//! The execution environment is captured once into a [`PlatformInfo`] value and
//! passed to whatever needs it. Nothing in this crate reads process-global state
//! after [`PlatformInfo::detect`] returns, so the ARM fallback rules can be
//! exercised with hand-built fixtures.

pub use error::{Error, Result};
pub use os::OsFamily;
pub use platform::PlatformInfo;
pub use tag::{ArtifactTag, MIN_LINUX_ARM_VERSION, MIN_MAC_ARM_VERSION};

pub mod dir;
mod error;
mod os;
mod platform;
mod tag;
pub mod version;

/// Name shared by the artifact file, the install folder and the manifest entry.
pub const BUNDLE_NAME: &str = "bridge-cli-bundle";
