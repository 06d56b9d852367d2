use std::fmt;

/// Discrete playback state. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Idle,
    /// Pre-roll countdown; the value is the number shown on screen.
    Counting(u32),
    Playing,
    Paused,
    Stopped,
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Counting(n) => write!(f, "counting({n})"),
            Self::Playing => write!(f, "playing"),
            Self::Paused => write!(f, "paused"),
            Self::Stopped => write!(f, "stopped"),
        }
    }
}

impl PlaybackState {
    pub fn is_counting(&self) -> bool {
        matches!(self, Self::Counting(_))
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing)
    }
}

/// Everything that can move the state machine, whether it comes from the
/// user or from the countdown timer and the integrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Play,
    PauseOrCancel,
    Reset,
    Stop,
    ScriptChanged,
    CountdownTick,
    ContentEnd,
}

/// Side effects requested by a transition, applied in order by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    ResetScroll,
    HideText,
    ShowText,
    /// Make the text visible with the one-shot reveal transition.
    RevealText,
    /// Arm the countdown timer; `immediate` schedules the tick with no delay.
    ArmCountdown { immediate: bool },
    CancelCountdown,
    StartIntegrator,
    StopIntegrator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: PlaybackState,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn to(next: PlaybackState, effects: &[Effect]) -> Option<Self> {
        Some(Self {
            next,
            effects: effects.to_vec(),
        })
    }
}

/// Pure transition function. `countdown` is the number of seconds a fresh
/// pre-roll starts from. Returns `None` when the intent does not apply in
/// the current state.
pub fn transition(state: PlaybackState, intent: Intent, countdown: u32) -> Option<Transition> {
    use Effect::*;
    use PlaybackState::*;

    let arm = ArmCountdown {
        immediate: countdown == 0,
    };

    match (state, intent) {
        (Idle | Paused | Stopped, Intent::Play) => Transition::to(
            Counting(countdown),
            &[StopIntegrator, ResetScroll, HideText, arm],
        ),

        (Counting(n), Intent::CountdownTick) if n > 0 => Transition::to(
            Counting(n - 1),
            &[ArmCountdown {
                immediate: n - 1 == 0,
            }],
        ),
        (Counting(0), Intent::CountdownTick) => {
            Transition::to(Playing, &[CancelCountdown, RevealText, StartIntegrator])
        }
        (Counting(_), Intent::PauseOrCancel) => Transition::to(Idle, &[CancelCountdown, ShowText]),

        (Playing, Intent::Play | Intent::PauseOrCancel) => {
            Transition::to(Paused, &[StopIntegrator])
        }
        (Playing, Intent::ContentEnd) => Transition::to(Paused, &[StopIntegrator]),
        (Playing | Paused, Intent::Stop) => Transition::to(Stopped, &[StopIntegrator]),

        (_, Intent::Reset | Intent::ScriptChanged) => Transition::to(
            Idle,
            &[CancelCountdown, StopIntegrator, ResetScroll, ShowText],
        ),

        _ => None,
    }
}
