use thiserror::Error;

/// The rendering surface the engine scrolls.
///
/// Heights are owned by whoever lays the text out and may change between
/// frames; the engine re-reads them every frame and only ever writes the
/// scroll offset.
pub trait Surface {
    fn scroll_top(&self) -> f32;
    fn set_scroll_top(&mut self, px: f32);
    fn content_height(&self) -> f32;
    fn viewport_height(&self) -> f32;

    fn max_scroll(&self) -> f32 {
        (self.content_height() - self.viewport_height()).max(0.0)
    }
}

/// Plain surface state: the measured heights of the last layout pass plus
/// the scroll offset the engine wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Viewport {
    pub scroll_top: f32,
    pub content_height: f32,
    pub viewport_height: f32,
}

impl Viewport {
    pub fn new(content_height: f32, viewport_height: f32) -> Self {
        Self {
            scroll_top: 0.0,
            content_height,
            viewport_height,
        }
    }

    /// Record the heights measured during layout.
    pub fn measure(&mut self, content_height: f32, viewport_height: f32) {
        self.content_height = content_height.max(0.0);
        self.viewport_height = viewport_height.max(0.0);
        self.scroll_top = self.scroll_top.min(self.max_scroll());
    }
}

impl Surface for Viewport {
    fn scroll_top(&self) -> f32 {
        self.scroll_top
    }

    fn set_scroll_top(&mut self, px: f32) {
        self.scroll_top = px.max(0.0);
    }

    fn content_height(&self) -> f32 {
        self.content_height
    }

    fn viewport_height(&self) -> f32 {
        self.viewport_height
    }
}

#[derive(Debug, Error)]
pub enum FullscreenError {
    #[error("fullscreen is not supported by this window")]
    Unsupported,
    #[error("fullscreen request rejected: {0}")]
    Rejected(String),
}

/// Presentation-mode control. Requests complete asynchronously; callers
/// observe the outcome through [`Fullscreen::is_fullscreen`] on a later frame.
pub trait Fullscreen {
    fn is_fullscreen(&self) -> bool;
    fn request_fullscreen(&mut self) -> Result<(), FullscreenError>;
    fn exit_fullscreen(&mut self) -> Result<(), FullscreenError>;
}

/// Flip presentation mode. Failures are logged and swallowed; presentation
/// mode is never required for playback.
pub fn toggle_fullscreen(control: &mut impl Fullscreen) {
    let result = if control.is_fullscreen() {
        control.exit_fullscreen()
    } else {
        control.request_fullscreen()
    };
    if let Err(e) = result {
        tracing::debug!("ignoring fullscreen failure: {e}");
    }
}

/// Label for the fullscreen control given the current mode.
pub fn fullscreen_label(is_fullscreen: bool) -> &'static str {
    if is_fullscreen {
        "Exit fullscreen"
    } else {
        "Fullscreen"
    }
}
