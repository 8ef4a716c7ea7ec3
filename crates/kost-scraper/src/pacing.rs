//! Randomized polite pauses between requests.

use kost_core::DelayRange;
use rand::Rng;
use std::time::Duration;

/// Draw a wait uniformly from `range`.
#[must_use]
pub fn random_delay(range: DelayRange) -> Duration {
    if range.max_ms <= range.min_ms {
        return Duration::from_millis(range.min_ms);
    }
    Duration::from_millis(rand::thread_rng().gen_range(range.min_ms..=range.max_ms))
}

/// Sleep for a random duration from `range` and return how long it was.
pub async fn sleep_random(range: DelayRange) -> Duration {
    let delay = random_delay(range);
    pause(delay).await;
    delay
}

/// Sleep for `delay`, skipping the timer entirely when it is zero.
pub async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
