//! Getting a resolved Bridge CLI bundle onto disk and running it.
//!
//! - [`LocalInstallationProbe`] answers whether the wanted version is already
//!   extracted under the install root.
//! - [`ArchiveInstaller`] downloads, extracts and renames a bundle into place.
//! - [`BridgeExecutor`] finds the executable inside an installed bundle and
//!   runs it.

mod archive;
mod args;
mod error;
mod executor;
mod installer;
mod layout;
mod probe;

pub use archive::extract_zip;
pub use args::{join_args, split_args};
pub use error::{
    DEFAULT_DIRECTORY_NOT_FOUND_MESSAGE, EMPTY_URL_MESSAGE, Error, INSTALL_DIRECTORY_NOT_FOUND_MESSAGE,
    Result,
};
pub use executor::{BridgeExecutor, EXECUTABLE_NAME};
pub use installer::{ArchiveInstaller, InstallOutcome};
pub use layout::InstallLayout;
pub use probe::LocalInstallationProbe;
