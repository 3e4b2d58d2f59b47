use bridge_platform::ArtifactTag;

use crate::manifest::MANIFEST_FILE;
use crate::template::UrlTemplate;

/// Public artifact repository hosting Bridge CLI bundles.
pub const DEFAULT_BASE_URL: &str =
    "https://repo.blackduck.com/bds-integrations-release/com/blackduck/integration/bridge/binaries/bridge-cli-bundle/";

/// Layout of a bundle repository: an HTML index of version folders at the
/// root, one folder per version, and a `latest/` alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifactory {
    base_url: String,
}

impl Default for Artifactory {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl Artifactory {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into().trim().to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self { base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The HTML index listing every published version.
    pub fn catalog_url(&self) -> &str {
        &self.base_url
    }

    pub fn latest_manifest_url(&self) -> String {
        format!("{}latest/{MANIFEST_FILE}", self.base_url)
    }

    pub fn version_template(&self) -> UrlTemplate {
        UrlTemplate::new(format!(
            "{}$version/bridge-cli-bundle-$version-$platform.zip",
            self.base_url
        ))
    }

    pub fn latest_template(&self) -> UrlTemplate {
        UrlTemplate::new(format!("{}latest/bridge-cli-bundle-$platform.zip", self.base_url))
    }

    pub fn version_url(&self, version: &str, tag: ArtifactTag) -> String {
        self.version_template()
            .render(&[("version", version), ("platform", tag.as_str())])
    }

    pub fn latest_url(&self, tag: ArtifactTag) -> String {
        self.latest_template().render(&[("platform", tag.as_str())])
    }
}
