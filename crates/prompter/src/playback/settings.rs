pub const MIN_FONT_SIZE: u32 = 16;
pub const MAX_FONT_SIZE: u32 = 96;
pub const MAX_SPEED: f32 = 2000.0;
pub const DEFAULT_FONT_SIZE: u32 = 48;
pub const DEFAULT_SPEED: f32 = 100.0;
pub const DEFAULT_COUNTDOWN: u32 = 3;

/// User-adjustable playback settings.
///
/// Mutated directly by the controls at any time, including mid-playback. The
/// integrator reads the current speed every frame, so changes apply on the
/// next frame without a restart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackSettings {
    font_size_px: u32,
    speed_px_per_sec: f32,
    mirrored: bool,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            font_size_px: DEFAULT_FONT_SIZE,
            speed_px_per_sec: DEFAULT_SPEED,
            mirrored: false,
        }
    }
}

impl PlaybackSettings {
    pub fn new(font_size_px: u32, speed_px_per_sec: f32, mirrored: bool) -> Self {
        let mut settings = Self::default();
        settings.set_font_size(font_size_px);
        settings.set_speed(speed_px_per_sec);
        settings.set_mirrored(mirrored);
        settings
    }

    pub fn font_size(&self) -> u32 {
        self.font_size_px
    }

    pub fn speed(&self) -> f32 {
        self.speed_px_per_sec
    }

    pub fn mirrored(&self) -> bool {
        self.mirrored
    }

    pub fn set_font_size(&mut self, px: u32) {
        self.font_size_px = px.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
    }

    /// Non-finite input is treated as zero.
    pub fn set_speed(&mut self, px_per_sec: f32) {
        let speed = if px_per_sec.is_finite() {
            px_per_sec
        } else {
            0.0
        };
        self.speed_px_per_sec = speed.clamp(0.0, MAX_SPEED);
    }

    pub fn set_mirrored(&mut self, mirrored: bool) {
        self.mirrored = mirrored;
    }

    pub fn adjust_font_size(&mut self, delta: i32) {
        let next = (self.font_size_px as i64 + delta as i64).max(0) as u32;
        self.set_font_size(next);
    }

    pub fn adjust_speed(&mut self, delta: f32) {
        self.set_speed(self.speed_px_per_sec + delta);
    }

    pub fn toggle_mirrored(&mut self) {
        self.mirrored = !self.mirrored;
    }
}
