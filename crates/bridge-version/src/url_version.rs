use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::error::{Error, Result};
use crate::manifest::MANIFEST_FILE;

static BUNDLE_FILE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"bridge-cli-bundle-([0-9.]*[0-9a-zA-Z]*?)-?(?:win64|linux64|linux_arm|macosx|macos_arm)\.zip")
        .unwrap()
});

/// Version embedded in a bundle download URL.
///
/// `None` when the URL does not name a bundle artifact at all. `Some("")`
/// for the versionless `latest` alias (`bridge-cli-bundle-<platform>.zip`).
pub fn version_from_url(url: &str) -> Option<&str> {
    BUNDLE_FILE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// The `versions.txt` published next to the artifact `url` points at.
pub fn manifest_url_for(url: &str) -> Result<String> {
    let mut parsed = Url::parse(url.trim()).map_err(|e| Error::InvalidUrl(format!("{url}: {e}")))?;
    parsed
        .path_segments_mut()
        .map_err(|_| Error::InvalidUrl(url.to_string()))?
        .pop()
        .push(MANIFEST_FILE);
    parsed.set_query(None);
    parsed.set_fragment(None);
    Ok(parsed.into())
}
