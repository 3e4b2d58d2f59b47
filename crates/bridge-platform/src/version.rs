//! Lenient semantic version comparison for the ARM support gate.

use once_cell::sync::Lazy;
use regex::Regex;
use semver::Version;

static LEADING_NUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^v?(\d+)(?:\.(\d+))?(?:\.(\d+))?").unwrap());

/// Parse a version string, coercing short or decorated forms such as `2.1`
/// or `3.5.1.4` down to `major.minor.patch`.
pub fn parse_lenient(version: &str) -> Option<Version> {
    let version = version.trim();
    if let Ok(v) = Version::parse(version) {
        return Some(v);
    }

    let caps = LEADING_NUMERIC.captures(version)?;
    let part = |i: usize| {
        caps.get(i)
            .map(|m| m.as_str().parse::<u64>())
            .unwrap_or(Ok(0))
            .ok()
    };
    Some(Version::new(part(1)?, part(2)?, part(3)?))
}

/// `Some(true)` when `version >= minimum`, `None` if either side is not a version.
pub fn at_least(version: &str, minimum: &str) -> Option<bool> {
    let version = parse_lenient(version)?;
    let minimum = parse_lenient(minimum)?;
    Some(version >= minimum)
}
