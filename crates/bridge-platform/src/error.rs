use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown artifact tag: {0}")]
    UnknownTag(String),

    #[error("home directory could not be determined")]
    NoHomeDir,
}
