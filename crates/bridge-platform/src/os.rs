//! Operating system family detection.

use std::fmt;

/// Operating system families a bridge bundle is published for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsFamily {
    Mac,
    Linux,
    Windows,
    Unknown,
}

impl OsFamily {
    /// Map an OS name as reported by `std::env::consts::OS`.
    pub fn from_os_name(name: &str) -> Self {
        match name {
            "macos" | "darwin" => OsFamily::Mac,
            "linux" => OsFamily::Linux,
            "windows" | "win32" => OsFamily::Windows,
            _ => OsFamily::Unknown,
        }
    }

    pub fn current() -> Self {
        Self::from_os_name(std::env::consts::OS)
    }

    /// File name suffixes tried when looking for an executable.
    pub fn executable_suffixes(self) -> &'static [&'static str] {
        match self {
            OsFamily::Windows => &[".exe", ""],
            _ => &[""],
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OsFamily::Mac => write!(f, "macOS"),
            OsFamily::Linux => write!(f, "Linux"),
            OsFamily::Windows => write!(f, "Windows"),
            OsFamily::Unknown => write!(f, "unknown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_os_name() {
        assert_eq!(OsFamily::from_os_name("macos"), OsFamily::Mac);
        assert_eq!(OsFamily::from_os_name("darwin"), OsFamily::Mac);
        assert_eq!(OsFamily::from_os_name("linux"), OsFamily::Linux);
        assert_eq!(OsFamily::from_os_name("windows"), OsFamily::Windows);
        assert_eq!(OsFamily::from_os_name("freebsd"), OsFamily::Unknown);
    }

    #[test]
    fn test_executable_suffixes() {
        assert_eq!(OsFamily::Windows.executable_suffixes()[0], ".exe");
        assert_eq!(OsFamily::Linux.executable_suffixes(), &[""]);
    }
}
