//! `versions.txt` manifests.
//!
//! One `<tool-name>: <version>` entry per line. The same format is published
//! next to every release and shipped inside every installed bundle.

use bridge_platform::BUNDLE_NAME;

pub const MANIFEST_FILE: &str = "versions.txt";

/// Version recorded for `tool`, looking at each line's tool name exactly.
pub fn tool_version<'a>(content: &'a str, tool: &str) -> Option<&'a str> {
    content
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim() == tool)
        .map(|(_, version)| version.trim())
}

pub fn bundle_version(content: &str) -> Option<&str> {
    tool_version(content, BUNDLE_NAME).filter(|v| !v.is_empty())
}

/// Whether `content` contains the literal `bridge-cli-bundle: <version>`.
///
/// This is a plain substring test, not a line parse: `1.2` also matches a
/// manifest recording `1.2.3`.
pub fn records_bundle_version(content: &str, version: &str) -> bool {
    content.contains(&format!("{BUNDLE_NAME}: {version}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_version() {
        let content = "bridge-cli-bundle: 3.5.1\nbridge-cli: 3.5.1-b12\nother-tool: 2.0.0\n";
        assert_eq!(bundle_version(content), Some("3.5.1"));
        assert_eq!(tool_version(content, "other-tool"), Some("2.0.0"));
    }

    #[test]
    fn test_bundle_version_requires_exact_tool_name() {
        assert_eq!(bundle_version("bridge-cli-bundle-extra: 1.0.0"), None);
        assert_eq!(bundle_version("  bridge-cli-bundle :  0.3.1  \r\n"), Some("0.3.1"));
    }

    #[test]
    fn test_bundle_version_missing_or_blank() {
        assert_eq!(bundle_version(""), None);
        assert_eq!(bundle_version("error"), None);
        assert_eq!(bundle_version("bridge-cli-bundle:"), None);
    }

    #[test]
    fn test_records_bundle_version() {
        let content = "bridge-cli-bundle: 1.2.3\nother-tool: 2.0.0";
        assert!(records_bundle_version(content, "1.2.3"));
        assert!(!records_bundle_version(content, "1.2.4"));
        assert!(!records_bundle_version("", "1.2.3"));
        assert!(!records_bundle_version("bridge-cli-bundle-1.2.3\nother content", "1.2.3"));
    }

    #[test]
    fn test_records_bundle_version_multiple_entries() {
        let content = "bridge-cli-bundle: 1.2.2\nother-tool: 2.0.0\nbridge-cli-bundle: 1.2.3\n";
        assert!(records_bundle_version(content, "1.2.3"));
    }

    #[test]
    fn test_records_bundle_version_is_a_prefix_match() {
        // Substring semantics: a shorter target matches a longer recorded version.
        assert!(records_bundle_version("bridge-cli-bundle: 1.2.3", "1.2"));
        assert!(!records_bundle_version("bridge-cli-bundle: 1.2", "1.2.3"));
    }
}
