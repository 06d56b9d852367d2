use std::time::{Duration, Instant};

use super::integrator::{ScrollIntegrator, Step};
use super::reveal::{Reveal, reveal_duration};
use super::scheduler::{Due, LocalScheduler, Scheduler, Source, Token};
use super::settings::{DEFAULT_COUNTDOWN, PlaybackSettings};
use super::state::{Effect, Intent, PlaybackState, transition};
use crate::surface::Surface;

const COUNTDOWN_STEP: Duration = Duration::from_secs(1);

/// The playback engine: one authoritative state plus the countdown timer and
/// the integrator frame loop, of which at most one is ever armed.
#[derive(Debug, Clone)]
pub struct Engine {
    state: PlaybackState,
    countdown_from: u32,
    integrator: ScrollIntegrator,
    generation: u64,
    armed_tick: Option<Token>,
    armed_frame: Option<Token>,
    text_visible: bool,
    reveal: Option<Reveal>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(DEFAULT_COUNTDOWN)
    }
}

impl Engine {
    pub fn new(countdown_from: u32) -> Self {
        Self {
            state: PlaybackState::Idle,
            countdown_from,
            integrator: ScrollIntegrator::default(),
            generation: 0,
            armed_tick: None,
            armed_frame: None,
            text_visible: true,
            reveal: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn position(&self) -> f32 {
        self.integrator.position()
    }

    pub fn is_text_visible(&self) -> bool {
        self.text_visible
    }

    pub fn reveal(&self) -> Option<Reveal> {
        self.reveal
    }

    pub fn countdown_active(&self) -> bool {
        self.armed_tick.is_some()
    }

    pub fn integrator_active(&self) -> bool {
        self.armed_frame.is_some()
    }

    /// Apply an intent. Returns whether it changed anything.
    pub fn dispatch(
        &mut self,
        intent: Intent,
        now: Instant,
        settings: &PlaybackSettings,
        scheduler: &mut impl Scheduler,
        surface: &mut impl Surface,
    ) -> bool {
        let Some(t) = transition(self.state, intent, self.countdown_from) else {
            tracing::trace!(state = %self.state, ?intent, "intent ignored");
            return false;
        };
        tracing::debug!(from = %self.state, to = %t.next, ?intent, "playback transition");
        self.state = t.next;
        for effect in t.effects {
            self.apply(effect, now, settings, scheduler, surface);
        }
        true
    }

    /// Countdown timer callback. Stale tokens are dropped.
    pub fn on_tick(
        &mut self,
        token: Token,
        now: Instant,
        settings: &PlaybackSettings,
        scheduler: &mut impl Scheduler,
        surface: &mut impl Surface,
    ) {
        if self.armed_tick != Some(token) {
            tracing::trace!(?token, "dropping stale countdown tick");
            return;
        }
        self.armed_tick = None;
        self.dispatch(Intent::CountdownTick, now, settings, scheduler, surface);
    }

    /// Integrator frame callback. Stale tokens are dropped.
    pub fn on_frame(
        &mut self,
        token: Token,
        now: Instant,
        settings: &PlaybackSettings,
        scheduler: &mut impl Scheduler,
        surface: &mut impl Surface,
    ) {
        if self.armed_frame != Some(token) || !self.state.is_playing() {
            tracing::trace!(?token, "dropping stale frame");
            return;
        }
        self.armed_frame = None;

        let step = self.integrator.advance(
            now,
            settings.speed(),
            surface.content_height(),
            surface.viewport_height(),
        );
        surface.set_scroll_top(self.integrator.position());

        match step {
            Step::Advanced => self.arm_frame(scheduler),
            Step::ReachedEnd => {
                tracing::debug!(position = self.integrator.position(), "end of content");
                self.dispatch(Intent::ContentEnd, now, settings, scheduler, surface);
            }
        }
    }

    /// Pump a [`LocalScheduler`]: advance its clock to `now` and deliver
    /// everything that is due. Callbacks armed while delivering wait for the
    /// next pump.
    pub fn drive(
        &mut self,
        now: Instant,
        settings: &PlaybackSettings,
        scheduler: &mut LocalScheduler,
        surface: &mut impl Surface,
    ) {
        scheduler.advance_to(now);
        self.fit_to(surface);
        for due in scheduler.take_due() {
            match due {
                Due::Tick(token) => self.on_tick(token, now, settings, scheduler, surface),
                Due::Frame(token) => self.on_frame(token, now, settings, scheduler, surface),
            }
        }
    }

    /// Keep the held position inside the surface after a relayout. While
    /// playing, the next frame clamps instead.
    pub fn fit_to(&mut self, surface: &mut impl Surface) {
        if self.state.is_playing() {
            return;
        }
        if self.integrator.clamp_to(surface.max_scroll()) {
            tracing::debug!(position = self.integrator.position(), "position clamped after relayout");
        }
        if surface.scroll_top() != self.integrator.position() {
            surface.set_scroll_top(self.integrator.position());
        }
    }

    fn apply(
        &mut self,
        effect: Effect,
        now: Instant,
        settings: &PlaybackSettings,
        scheduler: &mut impl Scheduler,
        surface: &mut impl Surface,
    ) {
        match effect {
            Effect::ResetScroll => {
                self.integrator.reset();
                surface.set_scroll_top(0.0);
            }
            Effect::HideText => {
                self.text_visible = false;
                self.reveal = None;
            }
            Effect::ShowText => {
                self.text_visible = true;
                self.reveal = None;
            }
            Effect::RevealText => {
                self.text_visible = true;
                self.reveal = Some(Reveal::new(now, reveal_duration(settings.speed())));
            }
            Effect::ArmCountdown { immediate } => {
                self.cancel_tick(scheduler);
                let token = self.next_token(Source::Countdown);
                let delay = if immediate {
                    Duration::ZERO
                } else {
                    COUNTDOWN_STEP
                };
                scheduler.schedule_tick(token, delay);
                self.armed_tick = Some(token);
            }
            Effect::CancelCountdown => self.cancel_tick(scheduler),
            Effect::StartIntegrator => {
                self.integrator.start();
                self.arm_frame(scheduler);
            }
            Effect::StopIntegrator => {
                if let Some(token) = self.armed_frame.take() {
                    scheduler.cancel(token);
                }
                self.integrator.stop();
            }
        }
    }

    fn arm_frame(&mut self, scheduler: &mut impl Scheduler) {
        if let Some(old) = self.armed_frame.take() {
            scheduler.cancel(old);
        }
        let token = self.next_token(Source::Frame);
        scheduler.request_frame(token);
        self.armed_frame = Some(token);
    }

    fn cancel_tick(&mut self, scheduler: &mut impl Scheduler) {
        if let Some(token) = self.armed_tick.take() {
            scheduler.cancel(token);
        }
    }

    fn next_token(&mut self, source: Source) -> Token {
        self.generation += 1;
        Token {
            source,
            generation: self.generation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Viewport;

    struct Rig {
        engine: Engine,
        settings: PlaybackSettings,
        sched: LocalScheduler,
        surface: Viewport,
        now: Instant,
    }

    impl Rig {
        fn new() -> Self {
            let now = Instant::now();
            Self {
                engine: Engine::new(3),
                settings: PlaybackSettings::new(48, 100.0, false),
                sched: LocalScheduler::new(now),
                surface: Viewport::new(1000.0, 200.0),
                now,
            }
        }

        fn send(&mut self, intent: Intent) -> bool {
            self.engine.dispatch(
                intent,
                self.now,
                &self.settings,
                &mut self.sched,
                &mut self.surface,
            )
        }

        fn run_for(&mut self, total: Duration, step: Duration) {
            let end = self.now + total;
            while self.now < end {
                self.now += step;
                self.engine
                    .drive(self.now, &self.settings, &mut self.sched, &mut self.surface);
            }
        }

        fn assert_single_source(&self) {
            assert!(
                !(self.engine.countdown_active() && self.engine.integrator_active()),
                "countdown and integrator armed together in {}",
                self.engine.state()
            );
        }
    }

    #[test]
    fn test_play_counts_down_and_starts_scrolling() {
        let mut rig = Rig::new();
        rig.send(Intent::Play);
        assert_eq!(rig.engine.state(), PlaybackState::Counting(3));
        assert!(!rig.engine.is_text_visible());

        rig.run_for(Duration::from_millis(2900), Duration::from_millis(100));
        assert!(rig.engine.state().is_counting());

        rig.run_for(Duration::from_millis(200), Duration::from_millis(100));
        assert_eq!(rig.engine.state(), PlaybackState::Playing);
        assert!(rig.engine.is_text_visible());
        let reveal = rig.engine.reveal().expect("reveal armed");
        assert_eq!(reveal.duration, Duration::from_millis(1350));
        assert!(rig.engine.integrator_active());
        assert!(!rig.engine.countdown_active());
    }

    #[test]
    fn test_cancelled_countdown_leaves_no_tick() {
        let mut rig = Rig::new();
        rig.send(Intent::Play);
        rig.run_for(Duration::from_millis(1500), Duration::from_millis(100));
        rig.send(Intent::PauseOrCancel);
        assert_eq!(rig.engine.state(), PlaybackState::Idle);
        assert!(rig.sched.is_idle());

        rig.run_for(Duration::from_secs(10), Duration::from_millis(100));
        assert_eq!(rig.engine.state(), PlaybackState::Idle);
    }

    #[test]
    fn test_stale_tick_is_ignored() {
        let mut rig = Rig::new();
        rig.send(Intent::Play);
        let stale = rig.sched.pending_tick().unwrap();
        rig.send(Intent::PauseOrCancel);
        rig.send(Intent::Play);
        assert_eq!(rig.engine.state(), PlaybackState::Counting(3));

        // A late delivery of the first run's tick must not advance the second.
        let now = rig.now;
        rig.engine.on_tick(
            stale,
            now,
            &rig.settings,
            &mut rig.sched,
            &mut rig.surface,
        );
        assert_eq!(rig.engine.state(), PlaybackState::Counting(3));
    }

    #[test]
    fn test_stale_frame_is_ignored() {
        let mut rig = Rig::new();
        rig.send(Intent::Play);
        rig.run_for(Duration::from_secs(4), Duration::from_millis(16));
        assert_eq!(rig.engine.state(), PlaybackState::Playing);
        let stale = rig.sched.pending_frame().unwrap();

        rig.send(Intent::PauseOrCancel);
        assert_eq!(rig.sched.pending_frame(), None);
        let held = rig.engine.position();
        rig.now += Duration::from_millis(500);
        let now = rig.now;
        rig.engine
            .on_frame(stale, now, &rig.settings, &mut rig.sched, &mut rig.surface);
        assert_eq!(rig.engine.state(), PlaybackState::Paused);
        assert_eq!(rig.engine.position(), held);

        rig.send(Intent::Play);
        rig.engine
            .on_frame(stale, now, &rig.settings, &mut rig.sched, &mut rig.surface);
        assert_eq!(rig.engine.state(), PlaybackState::Counting(3));
        assert_eq!(rig.engine.position(), 0.0);
        assert_eq!(rig.surface.scroll_top, 0.0);
        assert_eq!(rig.sched.pending_frame(), None);
    }

    #[test]
    fn test_relayout_while_paused_clamps_position() {
        let mut rig = Rig::new();
        rig.surface.measure(2000.0, 200.0);
        rig.send(Intent::Play);
        rig.run_for(Duration::from_secs(16), Duration::from_millis(16));
        rig.send(Intent::PauseOrCancel);
        assert!(rig.engine.position() > 1000.0);

        rig.surface.measure(400.0, 200.0);
        rig.run_for(Duration::from_millis(1600), Duration::from_millis(16));
        assert_eq!(rig.engine.state(), PlaybackState::Paused);
        assert_eq!(rig.engine.position(), 200.0);
        assert_eq!(rig.surface.scroll_top, 200.0);
    }

    #[test]
    fn test_pause_holds_position_and_play_recounts() {
        let mut rig = Rig::new();
        rig.send(Intent::Play);
        rig.run_for(Duration::from_secs(5), Duration::from_millis(16));
        assert_eq!(rig.engine.state(), PlaybackState::Playing);
        rig.send(Intent::PauseOrCancel);
        let held = rig.engine.position();
        assert!(held > 0.0);
        rig.run_for(Duration::from_secs(2), Duration::from_millis(16));
        assert_eq!(rig.engine.position(), held);
        assert!(!rig.engine.integrator_active());

        rig.send(Intent::Play);
        assert_eq!(rig.engine.state(), PlaybackState::Counting(3));
        assert_eq!(rig.engine.position(), 0.0);
        assert_eq!(rig.surface.scroll_top, 0.0);
    }

    #[test]
    fn test_script_change_while_playing_goes_idle() {
        let mut rig = Rig::new();
        rig.send(Intent::Play);
        rig.run_for(Duration::from_secs(5), Duration::from_millis(16));
        assert!(rig.engine.position() > 0.0);

        rig.send(Intent::ScriptChanged);
        assert_eq!(rig.engine.state(), PlaybackState::Idle);
        assert_eq!(rig.engine.position(), 0.0);
        assert_eq!(rig.surface.scroll_top, 0.0);
        assert!(rig.sched.is_idle());
    }

    #[test]
    fn test_reset_during_countdown() {
        let mut rig = Rig::new();
        rig.send(Intent::Play);
        rig.send(Intent::Reset);
        assert_eq!(rig.engine.state(), PlaybackState::Idle);
        assert!(rig.engine.is_text_visible());
        assert!(rig.sched.is_idle());
    }

    #[test]
    fn test_stop_holds_position() {
        let mut rig = Rig::new();
        rig.send(Intent::Play);
        rig.run_for(Duration::from_secs(4), Duration::from_millis(16));
        rig.send(Intent::Stop);
        assert_eq!(rig.engine.state(), PlaybackState::Stopped);
        assert!(rig.engine.position() > 0.0);
        assert!(rig.sched.is_idle());
    }

    #[test]
    fn test_every_short_intent_sequence_keeps_one_source() {
        let intents = [
            Intent::Play,
            Intent::PauseOrCancel,
            Intent::Reset,
            Intent::Stop,
            Intent::ScriptChanged,
        ];
        let len = 4;
        let combos = intents.len().pow(len as u32);
        for mut code in 0..combos {
            let mut rig = Rig::new();
            for _ in 0..len {
                let intent = intents[code % intents.len()];
                code /= intents.len();
                rig.send(intent);
                rig.assert_single_source();
                rig.run_for(Duration::from_millis(1700), Duration::from_millis(100));
                rig.assert_single_source();
                if rig.engine.state().is_counting() {
                    assert!(rig.engine.countdown_active());
                }
            }
        }
    }
}
