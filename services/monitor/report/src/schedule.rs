//! Tick scheduling for the reporter.

use rand::Rng;
use std::time::Duration;

/// Interval until the next report: the configured period with ±25%
/// uniform jitter, so reporters powered on together do not keep hitting
/// the collector in the same instant.
pub fn jittered_interval(minutes: u32) -> Duration {
    jittered_interval_with(minutes, &mut rand::thread_rng())
}

/// [`jittered_interval`] with a caller-supplied RNG.
pub fn jittered_interval_with<R: Rng>(minutes: u32, rng: &mut R) -> Duration {
    let base_ms = u64::from(minutes.max(1)) * 60_000;
    let low = base_ms - base_ms / 4;
    let spread = base_ms / 2;
    Duration::from_millis(low + rng.gen_range(0..=spread))
}
