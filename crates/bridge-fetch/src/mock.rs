//! In-memory stand-ins for the network and the clock.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use bytes::Bytes;

use crate::data::Response;
use crate::effects::{BoxStream, HttpClient, Sleeper};

#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct MockError(pub String);

#[derive(Debug, Clone)]
enum Reply {
    Response(Response),
    Fail(String),
}

/// Replies to GETs from per-URL scripts.
///
/// Each request pops the next scripted reply for its URL; the final reply
/// repeats forever. Unknown URLs fail like an unreachable host. Streamed
/// downloads answer 404 unless registered with [`ScriptedClient::file`].
#[derive(Debug, Clone, Default)]
pub struct ScriptedClient {
    replies:  Arc<Mutex<HashMap<String, VecDeque<Reply>>>>,
    files:    Arc<Mutex<HashMap<String, Vec<u8>>>>,
    requests: Arc<Mutex<Vec<String>>>,
    headers:  Arc<Mutex<Vec<Vec<(String, String)>>>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(self, url: &str, reply: Reply) -> Self {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(url.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    pub fn respond(self, url: &str, response: Response) -> Self {
        self.push(url, Reply::Response(response))
    }

    pub fn fail(self, url: &str, message: &str) -> Self {
        self.push(url, Reply::Fail(message.to_string()))
    }

    pub fn file(self, url: &str, content: Vec<u8>) -> Self {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(url.to_string(), content);
        self
    }

    /// Every URL requested so far, GETs and downloads alike, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Headers sent with each request, parallel to [`ScriptedClient::requests`].
    pub fn request_headers(&self) -> Vec<Vec<(String, String)>> {
        self.headers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, url: &str, headers: &[(String, String)]) {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_string());
        self.headers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(headers.to_vec());
    }

    fn next_reply(&self, url: &str) -> Reply {
        let mut replies = self.replies.lock().unwrap_or_else(PoisonError::into_inner);
        match replies.get_mut(url) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or_else(|| unreachable_reply(url)),
            Some(queue) => queue.front().cloned().unwrap_or_else(|| unreachable_reply(url)),
            None => unreachable_reply(url),
        }
    }
}

fn unreachable_reply(url: &str) -> Reply {
    Reply::Fail(format!("connect ECONNREFUSED {url}"))
}

impl HttpClient for ScriptedClient {
    type Error = MockError;

    async fn get(
        &self,
        url: &str,
        headers: &[(String, String)],
        _timeout: Duration,
    ) -> Result<Response, Self::Error> {
        self.record(url, headers);
        match self.next_reply(url) {
            Reply::Response(response) => Ok(response),
            Reply::Fail(message) => Err(MockError(message)),
        }
    }

    async fn stream(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> Result<(u16, BoxStream<'static, Result<Bytes, Self::Error>>), Self::Error> {
        self.record(url, headers);
        let content = self
            .files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(url)
            .cloned();
        let (status, chunks) = match content {
            Some(content) => (200, vec![Ok(Bytes::from(content))]),
            None => (404, Vec::new()),
        };
        Ok((status, Box::pin(futures_util::stream::iter(chunks))))
    }
}

/// Records requested backoff waits and returns immediately.
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    sleeps: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(duration);
    }
}
