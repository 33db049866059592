//! Jitter for the pause between source fetches

use std::time::Duration;

/// Base delay plus a random jitter in `0..=max_jitter`.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use m3u_aggregator::utils::jitter::jittered_delay;
///
/// let delay = jittered_delay(Duration::from_millis(1000), Duration::from_millis(250));
/// assert!(delay >= Duration::from_millis(1000));
/// assert!(delay <= Duration::from_millis(1250));
/// ```
pub fn jittered_delay(base: Duration, max_jitter: Duration) -> Duration {
    base + Duration::from_millis(generate_jitter_ms(max_jitter.as_millis() as u64))
}

/// Random value between 0 and `max_jitter_ms` (inclusive)
pub fn generate_jitter_ms(max_jitter_ms: u64) -> u64 {
    if max_jitter_ms == 0 {
        return 0;
    }
    fastrand::u64(0..=max_jitter_ms)
}
