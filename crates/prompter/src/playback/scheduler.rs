use std::time::{Duration, Instant};

/// Which callback source a token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    Countdown,
    Frame,
}

/// Cancellation handle for a scheduled callback. A callback is only honoured
/// when its token still equals the one the engine has armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token {
    pub source: Source,
    pub generation: u64,
}

/// Timer and frame scheduling capability injected into the engine.
pub trait Scheduler {
    /// Deliver `token` once after `delay`.
    fn schedule_tick(&mut self, token: Token, delay: Duration);
    /// Deliver `token` on the next rendered frame.
    fn request_frame(&mut self, token: Token);
    fn cancel(&mut self, token: Token);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Due {
    Tick(Token),
    Frame(Token),
}

/// Cooperative single-threaded scheduler pumped by the frame loop.
///
/// Holds at most one pending tick and one pending frame; scheduling again
/// replaces the previous entry. Time only moves through [`advance_to`], so
/// tests can drive it with synthetic instants.
///
/// [`advance_to`]: LocalScheduler::advance_to
#[derive(Debug, Clone)]
pub struct LocalScheduler {
    clock: Instant,
    tick: Option<(Token, Instant)>,
    frame: Option<Token>,
}

impl LocalScheduler {
    pub fn new(now: Instant) -> Self {
        Self {
            clock: now,
            tick: None,
            frame: None,
        }
    }

    pub fn now(&self) -> Instant {
        self.clock
    }

    /// Move the clock forward. Going backwards is ignored.
    pub fn advance_to(&mut self, now: Instant) {
        if now > self.clock {
            self.clock = now;
        }
    }

    /// Remove and return everything due at the current clock, tick first.
    pub fn take_due(&mut self) -> Vec<Due> {
        let mut due = Vec::new();
        if let Some((token, deadline)) = self.tick {
            if deadline <= self.clock {
                self.tick = None;
                due.push(Due::Tick(token));
            }
        }
        if let Some(token) = self.frame.take() {
            due.push(Due::Frame(token));
        }
        due
    }

    /// Time until something becomes due, `Some(ZERO)` if a frame is pending.
    pub fn next_wakeup(&self) -> Option<Duration> {
        if self.frame.is_some() {
            return Some(Duration::ZERO);
        }
        self.tick
            .map(|(_, deadline)| deadline.saturating_duration_since(self.clock))
    }

    pub fn pending_tick(&self) -> Option<Token> {
        self.tick.map(|(token, _)| token)
    }

    pub fn pending_frame(&self) -> Option<Token> {
        self.frame
    }

    pub fn is_idle(&self) -> bool {
        self.tick.is_none() && self.frame.is_none()
    }
}

impl Scheduler for LocalScheduler {
    fn schedule_tick(&mut self, token: Token, delay: Duration) {
        self.tick = Some((token, self.clock + delay));
    }

    fn request_frame(&mut self, token: Token) {
        self.frame = Some(token);
    }

    fn cancel(&mut self, token: Token) {
        if self.tick.is_some_and(|(t, _)| t == token) {
            self.tick = None;
        }
        if self.frame == Some(token) {
            self.frame = None;
        }
    }
}
