use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

pub const VERSION_NOT_FOUND_MESSAGE: &str = "Provided Bridge CLI version not found in artifactory";

#[derive(Debug, Error)]
pub enum Error {
    #[error("Provided Bridge CLI version not found in artifactory: {0}")]
    VersionNotFound(String),

    #[error("Bridge CLI is not supported on this operating system: {0}")]
    UnsupportedPlatform(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}
