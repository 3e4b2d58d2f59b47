use std::path::{Path, PathBuf};

use bridge_fetch::{ClientSettings, ProxySettings};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Deserializer, Serialize};

/// Action inputs that drive acquisition.
///
/// Sources, lowest precedence first: an optional TOML file, `INPUT_*`
/// environment variables as set by the CI runner, then command-line flags.
/// `runner_os` comes from the runner's own `RUNNER_OS`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ActionConfig {
    #[serde(deserialize_with = "optional_text")]
    pub bridgecli_download_url: Option<String>,

    #[serde(deserialize_with = "optional_text")]
    pub bridgecli_download_version: Option<String>,

    #[serde(deserialize_with = "optional_text")]
    pub bridgecli_install_directory: Option<String>,

    #[serde(deserialize_with = "optional_text")]
    pub bridgecli_base_url: Option<String>,

    #[serde(alias = "network_air_gap", deserialize_with = "flag")]
    pub network_airgap: bool,

    #[serde(deserialize_with = "optional_text")]
    pub network_ssl_cert_file: Option<String>,

    #[serde(alias = "network_ssl_trustall", deserialize_with = "flag")]
    pub network_ssl_trust_all: bool,

    #[serde(deserialize_with = "optional_text")]
    pub runner_os: Option<String>,
}

impl ActionConfig {
    pub fn figment(config_file: Option<&Path>, overrides: &impl Serialize) -> Figment {
        let mut figment = Figment::new();
        if let Some(path) = config_file {
            figment = figment.merge(Toml::file(path));
        }
        figment
            .merge(Env::prefixed("INPUT_"))
            .merge(Env::raw().only(&["RUNNER_OS"]))
            .merge(Serialized::defaults(overrides))
    }

    pub fn load(config_file: Option<&Path>, overrides: &impl Serialize) -> Result<Self, figment::Error> {
        Self::figment(config_file, overrides).extract()
    }

    pub fn install_directory(&self) -> Option<PathBuf> {
        self.bridgecli_install_directory.as_ref().map(PathBuf::from)
    }

    pub fn runner_os(&self) -> &str {
        self.runner_os.as_deref().unwrap_or_default()
    }

    /// Client settings for these inputs, with proxies taken from the environment.
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            trust_all_certs: self.network_ssl_trust_all,
            ca_cert_file: self.network_ssl_cert_file.as_ref().map(PathBuf::from),
            proxy: ProxySettings::from_env(),
            ..ClientSettings::default()
        }
    }
}

/// Any scalar the environment provider may have typed.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Text(String),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Int(n) => n.to_string(),
            Self::Uint(n) => n.to_string(),
            Self::Float(n) => n.to_string(),
            Self::Text(s) => s,
        }
    }
}

/// Text input where blank means unset.
fn optional_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Scalar>::deserialize(deserializer)?;
    Ok(value
        .map(|v| v.into_text().trim().to_string())
        .filter(|v| !v.is_empty()))
}

/// Boolean input. Only `true`, in any case, is truthy.
fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = Option::<Scalar>::deserialize(deserializer)?;
    Ok(match value {
        Some(Scalar::Bool(b)) => b,
        Some(Scalar::Text(s)) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use figment::Jail;

    use super::*;
    use crate::cli::Overrides;

    #[test]
    fn test_defaults() {
        Jail::expect_with(|_| {
            let config = ActionConfig::load(None, &Overrides::default())?;
            assert_eq!(config.bridgecli_download_url, None);
            assert_eq!(config.bridgecli_download_version, None);
            assert_eq!(config.install_directory(), None);
            assert!(!config.network_airgap);
            assert!(!config.network_ssl_trust_all);
            Ok(())
        });
    }

    #[test]
    fn test_action_inputs_from_environment() {
        Jail::expect_with(|jail| {
            jail.set_env("INPUT_BRIDGECLI_DOWNLOAD_VERSION", "2.1.2");
            jail.set_env("INPUT_BRIDGECLI_DOWNLOAD_URL", "");
            jail.set_env("INPUT_NETWORK_AIRGAP", "TRUE");
            jail.set_env("INPUT_NETWORK_SSL_TRUSTALL", "yes");
            jail.set_env("INPUT_BRIDGECLI_INSTALL_DIRECTORY", "/opt/bridge");
            jail.set_env("RUNNER_OS", "macOS");

            let config = ActionConfig::load(None, &Overrides::default())?;

            assert_eq!(config.bridgecli_download_version.as_deref(), Some("2.1.2"));
            assert_eq!(config.bridgecli_download_url, None);
            assert!(config.network_airgap);
            assert!(!config.network_ssl_trust_all);
            assert_eq!(config.install_directory(), Some(PathBuf::from("/opt/bridge")));
            assert_eq!(config.runner_os(), "macOS");
            Ok(())
        });
    }

    #[test]
    fn test_numeric_looking_version_stays_text() {
        Jail::expect_with(|jail| {
            jail.set_env("INPUT_BRIDGECLI_DOWNLOAD_VERSION", "3");
            let config = ActionConfig::load(None, &Overrides::default())?;
            assert_eq!(config.bridgecli_download_version.as_deref(), Some("3"));
            Ok(())
        });
    }

    #[test]
    fn test_precedence_file_env_flags() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "action.toml",
                r#"
                bridgecli_download_version = "1.0.0"
                bridgecli_base_url = "https://mirror.example.com/bundle/"
                network_ssl_cert_file = "/etc/ssl/corp.pem"
                "#,
            )?;
            jail.set_env("INPUT_BRIDGECLI_DOWNLOAD_VERSION", "2.0.0");
            let overrides = Overrides {
                bridgecli_download_version: Some("3.0.0".into()),
                ..Overrides::default()
            };

            let config = ActionConfig::load(Some(Path::new("action.toml")), &overrides)?;

            assert_eq!(config.bridgecli_download_version.as_deref(), Some("3.0.0"));
            assert_eq!(
                config.bridgecli_base_url.as_deref(),
                Some("https://mirror.example.com/bundle/")
            );
            assert_eq!(
                config.client_settings().ca_cert_file,
                Some(PathBuf::from("/etc/ssl/corp.pem"))
            );
            Ok(())
        });
    }

    #[test]
    fn test_conflicting_tls_inputs_fail_validation() {
        let config = ActionConfig {
            network_ssl_cert_file: Some("/etc/ssl/corp.pem".into()),
            network_ssl_trust_all: true,
            ..ActionConfig::default()
        };
        let err = config.client_settings().validate().unwrap_err();
        assert_eq!(err.to_string(), bridge_fetch::SSL_CONFLICT_MESSAGE);
    }
}
