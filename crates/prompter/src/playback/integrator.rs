use std::time::Instant;

/// Distance from the end-of-content boundary that already counts as the end.
/// Absorbs float rounding so the last frame never leaves a sub-pixel gap.
pub const END_EPSILON: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    Advanced,
    ReachedEnd,
}

/// Per-frame scroll position updater.
///
/// Position advances by `speed * dt` where `dt` is the wall-clock time since
/// the previous frame of the same run. The first frame of a run has no prior
/// timestamp and advances by nothing, so a restart never jumps.
#[derive(Debug, Clone, Default)]
pub struct ScrollIntegrator {
    position: f32,
    last_frame: Option<Instant>,
}

impl ScrollIntegrator {
    pub fn position(&self) -> f32 {
        self.position
    }

    /// Begin a new run from the current position.
    pub fn start(&mut self) {
        self.last_frame = None;
    }

    pub fn stop(&mut self) {
        self.last_frame = None;
    }

    pub fn reset(&mut self) {
        self.position = 0.0;
        self.last_frame = None;
    }

    /// Pull the position back inside `[0, max_scroll]` after a relayout.
    /// Returns whether it moved.
    pub fn clamp_to(&mut self, max_scroll: f32) -> bool {
        let clamped = self.position.clamp(0.0, max_scroll.max(0.0));
        let moved = clamped != self.position;
        self.position = clamped;
        moved
    }

    /// Advance one frame. Heights are re-read by the caller every frame since
    /// layout can change between frames.
    pub fn advance(
        &mut self,
        now: Instant,
        speed_px_per_sec: f32,
        content_height: f32,
        viewport_height: f32,
    ) -> Step {
        let dt = self
            .last_frame
            .map(|last| now.saturating_duration_since(last).as_secs_f32())
            .unwrap_or(0.0);
        self.last_frame = Some(now);

        let max_scroll = (content_height - viewport_height).max(0.0);
        self.position += speed_px_per_sec.max(0.0) * dt;

        if self.position >= max_scroll - END_EPSILON {
            self.position = max_scroll;
            self.last_frame = None;
            return Step::ReachedEnd;
        }
        Step::Advanced
    }
}
