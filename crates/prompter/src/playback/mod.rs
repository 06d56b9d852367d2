//! Playback engine: countdown, reveal, autoscroll and stop.

pub mod engine;
pub mod integrator;
pub mod reveal;
pub mod scheduler;
pub mod settings;
pub mod state;

pub use engine::Engine;
pub use reveal::{Reveal, reveal_duration, reveal_duration_ms};
pub use scheduler::{LocalScheduler, Scheduler, Token};
pub use settings::PlaybackSettings;
pub use state::{Intent, PlaybackState};
