use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};
use url::Url;

use crate::core::RetryState;
use crate::data::{FetchOptions, Response};
use crate::effects::http::HttpClient;
use crate::effects::sleep::{Sleeper, TokioSleeper};
use crate::error::{Error, Result};

/// GETs with bounded retries and exponential backoff, plus archive downloads.
pub struct Fetcher<C: HttpClient, S: Sleeper = TokioSleeper> {
    client:  C,
    sleeper: S,
    options: FetchOptions,
}

impl<C: HttpClient> Fetcher<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            sleeper: TokioSleeper,
            options: FetchOptions::default(),
        }
    }
}

impl<C: HttpClient, S: Sleeper> Fetcher<C, S> {
    pub fn with_sleeper<T: Sleeper>(self, sleeper: T) -> Fetcher<C, T> {
        Fetcher {
            client: self.client,
            sleeper,
            options: self.options,
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: FetchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// GET `url`, retrying until a terminal status arrives or the budget runs out.
    ///
    /// A terminal status (see [`FetchOptions::is_terminal`]) is returned as-is,
    /// success or not. Any other status, a transport error or a timeout costs
    /// one retry and a backoff sleep. On exhaustion the last response seen is
    /// returned, or `None` if every attempt failed at the transport level.
    /// `purpose` names the operation in progress logs.
    pub async fn get(&self, url: &str, purpose: &str) -> Option<Response> {
        let mut state = RetryState::new(self.options.max_retries, self.options.retry_backoff);
        let mut last = None;

        // A zero budget still makes one attempt, without a backoff after it.
        for _ in 0..self.options.max_retries.max(1) {
            match self
                .client
                .get(url, &self.options.headers, self.options.timeout)
                .await
            {
                Ok(response) if self.options.is_terminal(response.status) => {
                    debug!(url, status = response.status, "terminal response");
                    return Some(response);
                }
                Ok(response) => {
                    debug!(url, status = response.status, "retriable response");
                    last = Some(response);
                }
                Err(e) => {
                    debug!(url, error = %e, "request failed");
                }
            }
            if state.is_exhausted() {
                break;
            }

            let retries_left = state.retries_left();
            let delay = state.consume();
            info!(
                "{purpose} has been failed, Retries left: {retries_left}, Waiting: {} Seconds",
                delay.as_secs_f64()
            );
            self.sleeper.sleep(delay).await;
        }

        warn!(url, "{purpose} gave up after {} retries", self.options.max_retries);
        last
    }

    /// Download `url` into `dir`, naming the file after the last URL path segment.
    ///
    /// Not retried. A non-200 status is an error carrying the status code.
    pub async fn download(&self, url: &str, dir: &Path) -> Result<PathBuf> {
        let url = url.trim();
        if url.is_empty() {
            return Err(Error::EmptyUrl);
        }

        let parsed = Url::parse(url).map_err(|e| Error::InvalidUrl(format!("{url}: {e}")))?;
        let file_name = parsed
            .path_segments()
            .and_then(|segments| segments.last())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| Error::InvalidUrl(format!("{url}: no file name in path")))?;
        let destination = dir.join(file_name);

        let (status, mut stream) = self
            .client
            .stream(url, &self.options.download_headers())
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        if status != 200 {
            return Err(Error::HttpStatus {
                status,
                url: url.to_string(),
            });
        }

        let write_err = |source| Error::Write {
            path: destination.clone(),
            source,
        };
        let mut file = tokio::fs::File::create(&destination)
            .await
            .map_err(write_err)?;

        let mut bytes_downloaded = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| Error::Network(e.to_string()))?;
            file.write_all(&chunk).await.map_err(write_err)?;
            bytes_downloaded += chunk.len() as u64;
        }
        file.flush().await.map_err(write_err)?;

        debug!(url, path = %destination.display(), bytes_downloaded, "download complete");
        Ok(destination)
    }
}
