mod fetcher;
mod http;
mod sleep;

pub use fetcher::Fetcher;
pub use http::{BoxStream, HttpClient};
pub use sleep::{Sleeper, TokioSleeper};

#[cfg(feature = "reqwest")]
pub use http::ReqwestClient;
