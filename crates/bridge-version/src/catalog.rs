//! Published version catalog, scraped from the repository's HTML index.

use bridge_fetch::{Fetcher, HttpClient, Sleeper};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

static ANCHOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<a\b[^>]*>(.*?)</a>").unwrap());
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());
static VERSION_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+").unwrap());

/// Versions named by the index's anchors, in page order.
///
/// Anchor text must start with `N.N.N`; only that prefix is kept, so both
/// `0.1.61/` and `0.1.61-hotfix/` read as `0.1.61`. Repeats are dropped.
pub fn parse_catalog(html: &str) -> Vec<String> {
    let mut versions: Vec<String> = Vec::new();
    for caps in ANCHOR.captures_iter(html) {
        let text = TAG.replace_all(&caps[1], "");
        let Some(version) = VERSION_PREFIX.find(text.trim()) else {
            continue;
        };
        if !versions.iter().any(|v| v == version.as_str()) {
            versions.push(version.as_str().to_string());
        }
    }
    versions
}

pub(crate) async fn fetch_catalog<C, S>(fetcher: &Fetcher<C, S>, url: &str) -> Vec<String>
where
    C: HttpClient,
    S: Sleeper,
{
    let versions = match fetcher
        .get(url, "Getting all available bridge versions")
        .await
    {
        Some(response) if (200..300).contains(&response.status) => parse_catalog(&response.body),
        Some(response) => {
            debug!(url, status = response.status, "catalog request not successful");
            Vec::new()
        }
        None => Vec::new(),
    };

    if versions.is_empty() {
        warn!("Unable to retrieve the Bridge Versions from Artifactory");
    }
    versions
}
