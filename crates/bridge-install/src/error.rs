use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

pub const INSTALL_DIRECTORY_NOT_FOUND_MESSAGE: &str = "Bridge CLI Install Directory does not exist";
pub const DEFAULT_DIRECTORY_NOT_FOUND_MESSAGE: &str = "Bridge CLI default directory does not exist";
pub const EMPTY_URL_MESSAGE: &str = "Provided Bridge CLI URL cannot be empty";

#[derive(Debug, Error)]
pub enum Error {
    #[error("Bridge CLI Install Directory does not exist")]
    InstallDirectoryNotFound(PathBuf),

    #[error("Bridge CLI default directory does not exist")]
    DefaultDirectoryNotFound(PathBuf),

    #[error("Bridge CLI is not supported on this operating system: {0}")]
    UnsupportedPlatform(String),

    #[error("Provided Bridge CLI url is not valid for the configured {runner_os} runner")]
    InvalidPlatformUrl { runner_os: String },

    #[error("Provided Bridge CLI URL cannot be empty")]
    EmptyUrl,

    #[error("Bridge CLI executable file could not be found at {}", .0.display())]
    ExecutableNotFound(PathBuf),

    #[error("failed to launch '{}': {source}", .path.display())]
    Launch { path: PathBuf, source: io::Error },

    #[error("archive is corrupted: {0}")]
    Corrupted(String),

    #[error("archive entry '{0}' escapes the extraction directory")]
    UnsafeEntry(String),

    #[error("failed to {action} '{}': {source}", .path.display())]
    Io {
        action: &'static str,
        path:   PathBuf,
        source: io::Error,
    },

    #[error(transparent)]
    Fetch(#[from] bridge_fetch::Error),

    #[error(transparent)]
    Version(#[from] bridge_version::Error),

    #[error("archive extraction did not complete: {0}")]
    ExtractionTask(#[from] tokio::task::JoinError),
}

impl Error {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io {
            action,
            path,
            source,
        }
    }

    /// Rewrite an acquisition failure into the message shown to users.
    ///
    /// Anything mentioning a 404 or an invalid URL almost always means the
    /// configured URL is for a different platform than the runner's.
    pub fn classify(self, runner_os: &str) -> Self {
        let message = self.to_string();
        let lower = message.to_lowercase();
        if message.contains("404") || lower.contains("invalid url") {
            Self::InvalidPlatformUrl {
                runner_os: runner_os.to_string(),
            }
        } else if lower.contains("empty") {
            Self::EmptyUrl
        } else {
            self
        }
    }
}
