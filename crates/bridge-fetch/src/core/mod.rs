mod retry;

pub use retry::{RetryState, retry_delay};
