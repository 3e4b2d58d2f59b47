use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use bytes::Bytes;
use futures_util::Stream;

use crate::data::Response;

/// A boxed stream type for HTTP response bodies.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

/// Asynchronous HTTP client abstraction.
///
/// # Implementations
///
/// - [`ReqwestClient`]: Production implementation using `reqwest`
/// - [`crate::mock::ScriptedClient`]: canned responses for tests
pub trait HttpClient: Send + Sync {
    /// Error type for transport failures. HTTP error statuses are not errors.
    type Error: std::error::Error + Send + Sync + 'static;

    /// GET `url` and read the whole body as text, giving up after `timeout`.
    fn get(
        &self,
        url: &str,
        headers: &[(String, String)],
        timeout: Duration,
    ) -> impl Future<Output = Result<Response, Self::Error>> + Send;

    /// GET `url` and hand back the status with a stream over the body.
    fn stream(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> impl Future<Output = Result<(u16, BoxStream<'static, Result<Bytes, Self::Error>>), Self::Error>> + Send;
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use super::*;
    use crate::client::ClientSettings;
    use crate::error::Result;

    /// Production HTTP client implementation using reqwest.
    #[derive(Debug, Clone)]
    pub struct ReqwestClient {
        client: reqwest::Client,
    }

    impl ReqwestClient {
        pub fn new(settings: &ClientSettings) -> Result<Self> {
            Ok(Self::from_client(settings.build()?))
        }

        pub fn from_client(client: reqwest::Client) -> Self {
            Self { client }
        }

        fn request(&self, url: &str, headers: &[(String, String)]) -> reqwest::RequestBuilder {
            headers
                .iter()
                .fold(self.client.get(url), |request, (key, value)| request.header(key, value))
        }
    }

    impl HttpClient for ReqwestClient {
        type Error = reqwest::Error;

        async fn get(
            &self,
            url: &str,
            headers: &[(String, String)],
            timeout: Duration,
        ) -> std::result::Result<Response, Self::Error> {
            let response = self.request(url, headers).timeout(timeout).send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(Response { status, body })
        }

        async fn stream(
            &self,
            url: &str,
            headers: &[(String, String)],
        ) -> std::result::Result<(u16, BoxStream<'static, std::result::Result<Bytes, Self::Error>>), Self::Error> {
            let response = self.request(url, headers).send().await?;
            let status = response.status().as_u16();
            Ok((status, Box::pin(response.bytes_stream())))
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_impl::ReqwestClient;
