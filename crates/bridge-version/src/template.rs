/// URL with `$name` placeholders, e.g. `…/$version/bridge-cli-bundle-$version-$platform.zip`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate(String);

impl UrlTemplate {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self(pattern.into())
    }

    pub fn pattern(&self) -> &str {
        &self.0
    }

    /// Substitute every occurrence of each `$name`. Longer names are replaced
    /// first so `$version` is never clobbered by a `$ver` substitution.
    pub fn render(&self, substitutions: &[(&str, &str)]) -> String {
        let mut ordered = substitutions.to_vec();
        ordered.sort_by_key(|(name, _)| std::cmp::Reverse(name.len()));

        ordered
            .into_iter()
            .fold(self.0.clone(), |url, (name, value)| {
                url.replace(&format!("${name}"), value)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_replaces_every_occurrence() {
        let template = UrlTemplate::new("https://repo/$version/bridge-cli-bundle-$version-$platform.zip");
        assert_eq!(
            template.render(&[("version", "1.2.3"), ("platform", "linux64")]),
            "https://repo/1.2.3/bridge-cli-bundle-1.2.3-linux64.zip"
        );
    }

    #[test]
    fn test_render_leaves_unknown_placeholders() {
        let template = UrlTemplate::new("https://repo/latest/bridge-cli-bundle-$platform.zip");
        assert_eq!(template.render(&[]), template.pattern());
    }

    #[test]
    fn test_render_prefers_longer_names() {
        let template = UrlTemplate::new("$version-$ver");
        assert_eq!(template.render(&[("ver", "a"), ("version", "b")]), "b-a");
    }
}
