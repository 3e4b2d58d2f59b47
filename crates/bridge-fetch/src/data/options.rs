use std::sync::Arc;
use std::time::Duration;

use crate::USER_AGENT;

/// Status codes that end a retry loop immediately, successful or not.
///
/// Client errors in this set will not change by asking again.
pub const NON_RETRY_HTTP_CODES: [u16; 5] = [200, 201, 401, 403, 416];

/// Configuration for retrying GET requests.
///
/// # Examples
///
/// ```
/// use bridge_fetch::FetchOptions;
/// use std::time::Duration;
///
/// let options = FetchOptions::default()
///     .max_retries(5)
///     .retry_backoff(Duration::from_millis(200))
///     .header("Authorization", "Bearer token");
/// ```
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Number of retriable failures tolerated before giving up.
    ///
    /// Default: 3
    pub max_retries: u32,

    /// Wait after the first failure; doubles after every further failure.
    ///
    /// Default: 15s
    pub retry_backoff: Duration,

    /// Hard limit for a single attempt. A timed out attempt counts as a
    /// network error.
    ///
    /// Default: 30s
    pub timeout: Duration,

    /// Status codes that stop the loop. See [`NON_RETRY_HTTP_CODES`].
    pub non_retry_codes: Arc<[u16]>,

    /// Headers sent with every attempt.
    ///
    /// Default: `Accept: text/html` and the action's `User-Agent`.
    pub headers: Arc<[(String, String)]>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_backoff: Duration::from_millis(15_000),
            timeout: Duration::from_secs(30),
            non_retry_codes: Arc::new(NON_RETRY_HTTP_CODES),
            headers: Arc::new([
                ("Accept".to_string(), "text/html".to_string()),
                ("User-Agent".to_string(), USER_AGENT.to_string()),
            ]),
        }
    }
}

impl FetchOptions {
    #[must_use]
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub fn retry_backoff(mut self, retry_backoff: Duration) -> Self {
        self.retry_backoff = retry_backoff;
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn non_retry_codes(mut self, codes: impl Into<Arc<[u16]>>) -> Self {
        self.non_retry_codes = codes.into();
        self
    }

    /// Add a single custom HTTP header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut headers: Vec<_> = self.headers.iter().cloned().collect();
        headers.push((key.into(), value.into()));
        self.headers = headers.into();
        self
    }

    /// Headers for archive downloads: the configured set with `Accept`
    /// replaced by `application/octet-stream`.
    pub fn download_headers(&self) -> Vec<(String, String)> {
        self.headers
            .iter()
            .filter(|(key, _)| !key.eq_ignore_ascii_case("accept"))
            .cloned()
            .chain([("Accept".to_string(), "application/octet-stream".to_string())])
            .collect()
    }

    /// Whether `status` ends the retry loop.
    pub fn is_terminal(&self, status: u16) -> bool {
        self.non_retry_codes.contains(&status)
    }
}
