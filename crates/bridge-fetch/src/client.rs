//! TLS and proxy aware construction of the shared reqwest client.

use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use reqwest::{Certificate, Client, Proxy};
use tracing::{debug, warn};
use url::Url;

use crate::USER_AGENT;
use crate::error::{Error, Result};

pub const SSL_CONFLICT_MESSAGE: &str =
    "Both network.ssl.cert.file and network.ssl.trustAll are set. Only one of these resources should be set.";

/// Outbound proxy taken from the conventional environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxySettings {
    pub url:      Url,
    pub no_proxy: Option<String>,
}

impl ProxySettings {
    /// `HTTPS_PROXY` wins over `HTTP_PROXY`; lower-case spellings are honoured.
    pub fn from_env() -> Option<Self> {
        let var = |upper: &str, lower: &str| {
            std::env::var(upper)
                .ok()
                .or_else(|| std::env::var(lower).ok())
                .filter(|v| !v.trim().is_empty())
        };
        Self::from_values(
            var("HTTPS_PROXY", "https_proxy").or_else(|| var("HTTP_PROXY", "http_proxy")),
            var("NO_PROXY", "no_proxy"),
        )
    }

    pub fn from_values(proxy: Option<String>, no_proxy: Option<String>) -> Option<Self> {
        let proxy = proxy?;
        match Url::parse(proxy.trim()) {
            Ok(url) => {
                debug!(proxy = %url.origin().ascii_serialization(), "using proxy");
                Some(Self { url, no_proxy })
            }
            Err(e) => {
                debug!(proxy = %proxy, error = %e, "invalid proxy URL, proxy will not be used");
                None
            }
        }
    }

    /// Proxy to route `target` through, `None` when `NO_PROXY` exempts its host.
    pub fn proxy_for(&self, target: &Url) -> Option<Url> {
        if let (Some(host), Some(no_proxy)) = (target.host_str(), self.no_proxy.as_deref())
            && bypasses_proxy(host, no_proxy)
        {
            debug!(host, "bypassing proxy");
            return None;
        }
        Some(self.url.clone())
    }
}

/// Whether `host` matches any comma separated `NO_PROXY` entry.
///
/// Entries are case insensitive:
/// - `*.example.com` matches `example.com` and its subdomains
/// - `*example.com` matches any host ending in `example.com`
/// - `.example.com` matches subdomains only
/// - `example.com` matches the host itself and its subdomains
pub fn bypasses_proxy(host: &str, no_proxy: &str) -> bool {
    let host = host.to_ascii_lowercase();
    no_proxy
        .split(',')
        .map(|entry| entry.trim().to_ascii_lowercase())
        .filter(|entry| !entry.is_empty())
        .any(|entry| matches_no_proxy_entry(&host, &entry))
}

fn matches_no_proxy_entry(host: &str, entry: &str) -> bool {
    let is_subdomain = |domain: &str| {
        host.strip_suffix(domain)
            .is_some_and(|rest| rest.ends_with('.'))
    };

    if let Some(domain) = entry.strip_prefix("*.") {
        host == domain || is_subdomain(domain)
    } else if let Some(suffix) = entry.strip_prefix('*') {
        host.ends_with(suffix)
    } else if entry.starts_with('.') {
        host.ends_with(entry)
    } else {
        host == entry || is_subdomain(entry)
    }
}

/// Everything that shapes the HTTP client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub trust_all_certs: bool,
    pub ca_cert_file:    Option<PathBuf>,
    pub proxy:           Option<ProxySettings>,
    pub user_agent:      String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            trust_all_certs: false,
            ca_cert_file: None,
            proxy: None,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl ClientSettings {
    /// Trusting every certificate and pinning a CA at once is contradictory.
    pub fn validate(&self) -> Result<()> {
        if self.trust_all_certs && self.ca_cert_file.is_some() {
            return Err(Error::Config(SSL_CONFLICT_MESSAGE.to_string()));
        }
        Ok(())
    }

    /// Identity of the settings; a cached client is reused while it is unchanged.
    pub fn fingerprint(&self) -> String {
        let cert_file = self
            .ca_cert_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        let proxy = self
            .proxy
            .as_ref()
            .map(|p| p.url.as_str())
            .unwrap_or_default();
        format!(
            "trustAll:{}|certFile:{}|proxy:{}",
            self.trust_all_certs,
            cert_file.trim(),
            proxy
        )
    }

    pub fn build(&self) -> Result<Client> {
        self.validate()?;
        let mut builder = Client::builder().user_agent(&self.user_agent);

        if self.trust_all_certs {
            debug!("SSL certificate verification disabled");
            builder = builder.danger_accept_invalid_certs(true);
        } else if let Some(path) = &self.ca_cert_file {
            match std::fs::read(path).map(|pem| Certificate::from_pem(&pem)) {
                Ok(Ok(cert)) => {
                    debug!(path = %path.display(), "custom CA certificate added to system roots");
                    builder = builder.add_root_certificate(cert);
                }
                Ok(Err(e)) => warn!("Failed to parse custom CA certificate file: {e}"),
                Err(e) => warn!("Failed to read custom CA certificate file: {e}"),
            }
        }

        builder = match &self.proxy {
            Some(settings) => {
                let settings = settings.clone();
                builder.proxy(Proxy::custom(move |target| settings.proxy_for(target)))
            }
            None => builder.no_proxy(),
        };

        builder.build().map_err(Error::ClientBuild)
    }
}

/// Holds the most recently built client together with its settings fingerprint.
///
/// Owned by the run's configuration context instead of living in module state.
#[derive(Debug, Default)]
pub struct ClientCache {
    entry: Mutex<Option<(String, Client)>>,
}

impl ClientCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached client if `settings` match the cached fingerprint,
    /// otherwise build, cache and return a new one.
    pub fn get_or_build(&self, settings: &ClientSettings) -> Result<Client> {
        let fingerprint = settings.fingerprint();
        let mut entry = self.entry.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some((cached, client)) = entry.as_ref()
            && *cached == fingerprint
        {
            debug!("reusing existing HTTP client");
            return Ok(client.clone());
        }

        let client = settings.build()?;
        debug!("created new HTTP client");
        *entry = Some((fingerprint, client.clone()));
        Ok(client)
    }

    pub fn invalidate(&self) {
        *self.entry.lock().unwrap_or_else(PoisonError::into_inner) = None;
        debug!("HTTP client cache cleared");
    }

    pub fn is_cached(&self) -> bool {
        self.entry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}
