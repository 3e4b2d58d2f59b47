use std::time::Duration;

/// Calculate the delay before a retry attempt using exponential backoff.
///
/// The delay formula is: `base * 2^retry_count`
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use bridge_fetch::retry_delay;
///
/// assert_eq!(retry_delay(0, Duration::from_secs(15)), Duration::from_secs(15));
/// assert_eq!(retry_delay(1, Duration::from_secs(15)), Duration::from_secs(30));
/// assert_eq!(retry_delay(2, Duration::from_secs(15)), Duration::from_secs(60));
/// ```
pub fn retry_delay(retry_count: u32, base: Duration) -> Duration {
    let multiplier = 2_u32.saturating_pow(retry_count);
    base.saturating_mul(multiplier)
}

/// Retry budget of a single fetch call.
///
/// Every failed or retriable attempt consumes one retry and doubles the wait
/// before the next one. The state lives only as long as the call that owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryState {
    retries_left: u32,
    consumed:     u32,
    base:         Duration,
}

impl RetryState {
    pub fn new(retries: u32, base: Duration) -> Self {
        Self {
            retries_left: retries,
            consumed: 0,
            base,
        }
    }

    pub fn retries_left(&self) -> u32 {
        self.retries_left
    }

    pub fn is_exhausted(&self) -> bool {
        self.retries_left == 0
    }

    /// Current backoff, i.e. the wait the next failure will cause.
    pub fn delay(&self) -> Duration {
        retry_delay(self.consumed, self.base)
    }

    /// Consume one retry and return how long to wait before trying again.
    pub fn consume(&mut self) -> Duration {
        let delay = self.delay();
        self.retries_left = self.retries_left.saturating_sub(1);
        self.consumed += 1;
        delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_delay_basic() {
        let base = Duration::from_millis(100);

        assert_eq!(retry_delay(0, base), Duration::from_millis(100));
        assert_eq!(retry_delay(1, base), Duration::from_millis(200));
        assert_eq!(retry_delay(2, base), Duration::from_millis(400));
        assert_eq!(retry_delay(3, base), Duration::from_millis(800));
    }

    #[test]
    fn test_retry_delay_zero_base() {
        let base = Duration::from_millis(0);
        assert_eq!(retry_delay(10, base), Duration::from_millis(0));
    }

    #[test]
    fn test_retry_delay_overflow_protection() {
        let base = Duration::from_secs(u64::MAX / 2);
        let delay = retry_delay(40, base);
        assert!(delay > Duration::from_secs(0));
    }

    #[test]
    fn test_retry_state_doubles_and_counts_down() {
        let mut state = RetryState::new(3, Duration::from_millis(15_000));

        assert_eq!(state.consume(), Duration::from_millis(15_000));
        assert_eq!(state.retries_left(), 2);
        assert_eq!(state.consume(), Duration::from_millis(30_000));
        assert_eq!(state.consume(), Duration::from_millis(60_000));
        assert!(state.is_exhausted());
        assert_eq!(state.delay(), Duration::from_millis(120_000));
    }

    #[test]
    fn test_retry_state_zero_budget_is_exhausted() {
        let state = RetryState::new(0, Duration::from_secs(1));
        assert!(state.is_exhausted());
    }
}
