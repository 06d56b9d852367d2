use std::time::{Duration, Instant};

use prompter::playback::{Engine, Intent, LocalScheduler, PlaybackSettings, PlaybackState};
use prompter::script::{Script, ScriptCollection};
use prompter::surface::{Surface, Viewport};

const FRAME: Duration = Duration::from_millis(16);

/// Engine, scheduler and surface driven by a synthetic clock.
struct Session {
    engine: Engine,
    settings: PlaybackSettings,
    scheduler: LocalScheduler,
    surface: Viewport,
    now: Instant,
}

impl Session {
    fn new(content_height: f32, viewport_height: f32, speed: f32) -> Self {
        let now = Instant::now();
        Self {
            engine: Engine::new(3),
            settings: PlaybackSettings::new(48, speed, false),
            scheduler: LocalScheduler::new(now),
            surface: Viewport::new(content_height, viewport_height),
            now,
        }
    }

    fn send(&mut self, intent: Intent) {
        self.scheduler.advance_to(self.now);
        self.engine.dispatch(
            intent,
            self.now,
            &self.settings,
            &mut self.scheduler,
            &mut self.surface,
        );
    }

    fn frame(&mut self) {
        self.now += FRAME;
        self.engine
            .drive(self.now, &self.settings, &mut self.scheduler, &mut self.surface);
    }

    fn run_for(&mut self, duration: Duration) {
        let end = self.now + duration;
        while self.now < end {
            self.frame();
        }
    }

    fn run_until_playing(&mut self) {
        for _ in 0..1000 {
            if self.engine.state() == PlaybackState::Playing {
                return;
            }
            self.frame();
        }
        panic!("never reached Playing, stuck in {}", self.engine.state());
    }
}

#[test]
fn autoscroll_stops_at_content_end() {
    let mut s = Session::new(1000.0, 200.0, 100.0);
    s.send(Intent::Play);
    s.run_until_playing();

    s.run_for(Duration::from_millis(7900));
    assert_eq!(s.engine.state(), PlaybackState::Playing);
    assert!(s.surface.scroll_top() < 800.0);

    s.run_for(Duration::from_millis(300));
    assert_eq!(s.engine.state(), PlaybackState::Paused);
    assert!((s.engine.position() - 800.0).abs() <= 1.0);
    assert!(s.surface.scroll_top() <= 800.0);

    // Nothing keeps scheduling once paused at the end.
    assert!(s.scheduler.is_idle());
    s.run_for(Duration::from_secs(2));
    assert!(s.surface.scroll_top() <= 800.0);
}

#[test]
fn position_never_decreases_while_playing() {
    let mut s = Session::new(5000.0, 400.0, 250.0);
    s.send(Intent::Play);
    s.run_until_playing();
    let mut last = s.surface.scroll_top();
    for _ in 0..300 {
        s.frame();
        assert!(s.surface.scroll_top() >= last);
        last = s.surface.scroll_top();
    }
}

#[test]
fn speed_change_mid_playback_applies_without_restart() {
    let mut s = Session::new(100_000.0, 400.0, 100.0);
    s.send(Intent::Play);
    s.run_until_playing();
    s.run_for(Duration::from_secs(1));
    let before = s.engine.position();

    s.settings.set_speed(1000.0);
    s.run_for(Duration::from_secs(1));
    let gained = s.engine.position() - before;
    assert!(gained > 900.0, "gained only {gained}");
    assert_eq!(s.engine.state(), PlaybackState::Playing);
}

#[test]
fn cancel_at_every_count_never_plays() {
    for cancel_after in 0..3u64 {
        let mut s = Session::new(1000.0, 200.0, 100.0);
        s.send(Intent::Play);
        s.run_for(Duration::from_millis(cancel_after * 1000 + 500));
        assert!(s.engine.state().is_counting());
        s.send(Intent::PauseOrCancel);
        assert_eq!(s.engine.state(), PlaybackState::Idle);

        for _ in 0..400 {
            s.frame();
            assert_ne!(s.engine.state(), PlaybackState::Playing);
        }
        assert_eq!(s.surface.scroll_top(), 0.0);
    }
}

#[test]
fn script_change_while_playing_returns_to_idle() {
    let mut collection = ScriptCollection::new(vec![
        Script::new("a", "Alpha", "first"),
        Script::new("b", "Beta", "second"),
    ]);
    let mut s = Session::new(3000.0, 200.0, 200.0);
    s.send(Intent::Play);
    s.run_until_playing();
    s.run_for(Duration::from_secs(2));
    assert!(s.surface.scroll_top() > 0.0);

    assert!(collection.select("b"));
    s.send(Intent::ScriptChanged);
    assert_eq!(s.engine.state(), PlaybackState::Idle);
    assert_eq!(s.surface.scroll_top(), 0.0);

    s.run_for(Duration::from_secs(2));
    assert_eq!(s.engine.state(), PlaybackState::Idle);
    assert_eq!(s.surface.scroll_top(), 0.0);
}

#[test]
fn play_from_paused_restarts_countdown() {
    let mut s = Session::new(3000.0, 200.0, 100.0);
    s.send(Intent::Play);
    s.run_until_playing();
    s.run_for(Duration::from_secs(2));
    s.send(Intent::PauseOrCancel);
    assert_eq!(s.engine.state(), PlaybackState::Paused);

    s.send(Intent::Play);
    assert_eq!(s.engine.state(), PlaybackState::Counting(3));
    assert!(!s.engine.is_text_visible());
    assert_eq!(s.surface.scroll_top(), 0.0);
}

#[test]
fn layout_changes_between_frames_are_respected() {
    let mut s = Session::new(2000.0, 200.0, 100.0);
    s.send(Intent::Play);
    s.run_until_playing();
    s.run_for(Duration::from_secs(3));

    // Font shrinks: content is now shorter than the scrolled distance.
    s.surface.measure(400.0, 200.0);
    s.frame();
    assert_eq!(s.engine.state(), PlaybackState::Paused);
    assert!(s.surface.scroll_top() <= s.surface.max_scroll());
}

#[test]
fn layout_shrink_while_paused_keeps_text_on_screen() {
    let mut s = Session::new(2000.0, 200.0, 100.0);
    s.send(Intent::Play);
    s.run_until_playing();
    s.run_for(Duration::from_secs(13));
    s.send(Intent::PauseOrCancel);
    assert!(s.surface.scroll_top() > 1000.0);

    s.surface.measure(400.0, 200.0);
    for _ in 0..100 {
        s.frame();
        assert!(s.surface.scroll_top() <= s.surface.max_scroll());
    }
    assert_eq!(s.engine.state(), PlaybackState::Paused);
    assert_eq!(s.engine.position(), s.surface.scroll_top());

    // Growing back does not jump the held position.
    s.surface.measure(2000.0, 200.0);
    s.frame();
    assert_eq!(s.surface.scroll_top(), 200.0);
}
