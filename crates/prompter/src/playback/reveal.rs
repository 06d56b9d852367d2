use std::time::{Duration, Instant};

use super::settings::MAX_SPEED;

pub const FASTEST_REVEAL_MS: f32 = 400.0;
pub const SLOWEST_REVEAL_MS: f32 = 1400.0;

/// Map a scroll speed to the one-shot reveal transition length.
///
/// Slower reading speeds get a longer, more noticeable fade; the result is
/// always within `[400, 1400]` milliseconds.
pub fn reveal_duration_ms(speed: f32, max_speed: f32) -> u32 {
    let normalized = if max_speed > 0.0 {
        // NaN speed collapses to 0 through f32::max
        speed.max(0.0).min(max_speed) / max_speed
    } else {
        0.0
    };
    let inverted = 1.0 - normalized;
    let ms = FASTEST_REVEAL_MS + (SLOWEST_REVEAL_MS - FASTEST_REVEAL_MS) * inverted;
    ms.round() as u32
}

pub fn reveal_duration(speed: f32) -> Duration {
    Duration::from_millis(reveal_duration_ms(speed, MAX_SPEED) as u64)
}

/// A running reveal transition, started when the countdown ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reveal {
    pub start: Instant,
    pub duration: Duration,
}

impl Reveal {
    pub fn new(start: Instant, duration: Duration) -> Self {
        Self { start, duration }
    }

    /// Linear progress in `[0, 1]` at `now`.
    pub fn progress(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.start).as_secs_f32();
        (elapsed / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    pub fn is_complete(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }
}

pub fn ease_in_out(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}
