//! HTTP fetching for Bridge CLI acquisition.
//!
//! # Architecture
//!
//! Same three-layer split as the rest of the workspace:
//! - [`data`] - fetch options and response values
//! - [`core`] - retry bookkeeping with no I/O
//! - [`effects`] - HTTP client, sleeping and the retrying fetcher
//!
//! Retry loops never fail on transient errors. When the budget is spent the
//! caller gets whatever was last seen and decides what an empty result means.

pub mod core;
pub mod data;
mod effects;
mod error;

#[cfg(feature = "reqwest")]
mod client;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use self::core::{RetryState, retry_delay};
pub use data::{FetchOptions, Response};
pub use effects::{BoxStream, Fetcher, HttpClient, Sleeper, TokioSleeper};
pub use error::{Error, Result};

#[cfg(feature = "reqwest")]
pub use client::{ClientCache, ClientSettings, ProxySettings, SSL_CONFLICT_MESSAGE, bypasses_proxy};
#[cfg(feature = "reqwest")]
pub use effects::ReqwestClient;

/// User agent sent with every request.
pub const USER_AGENT: &str = "BlackDuckSecurityAction";
