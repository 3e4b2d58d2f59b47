//! Resolution of which Bridge CLI bundle to fetch and from where.
//!
//! A run names its bundle in exactly one of three ways: an explicit download
//! URL, a pinned version, or nothing at all (latest). [`VersionResolver`]
//! turns that choice into a [`VersionSpec`] the installer can act on.

mod catalog;
mod error;
pub mod manifest;
mod repository;
mod resolver;
mod template;
mod url_version;

pub use catalog::parse_catalog;
pub use error::{Error, Result, VERSION_NOT_FOUND_MESSAGE};
pub use repository::{Artifactory, DEFAULT_BASE_URL};
pub use resolver::{VersionResolver, VersionSource, VersionSpec};
pub use template::UrlTemplate;
pub use url_version::{manifest_url_for, version_from_url};
