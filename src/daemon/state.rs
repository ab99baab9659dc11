use crate::utils::interval::Interval;

/// Where the daemon believes the user is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum State {
    /// Nothing has been measured yet.
    #[default]
    Unknown,
    Idle,
    Active,
}

/// Outcome of classifying one idle sample against the current [State].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    BecameIdle,
    StillIdle,
    BecameActive,
    StillActive,
}

impl State {
    /// An idle duration of at least `timeout` means idle. Leaving [State::Unknown] always counts
    /// as an edge, so the first sample fires one of the commands.
    pub fn classify(self, idle: Interval, timeout: Interval) -> Transition {
        match (idle >= timeout, self) {
            (true, State::Idle) => Transition::StillIdle,
            (true, _) => Transition::BecameIdle,
            (false, State::Active) => Transition::StillActive,
            (false, _) => Transition::BecameActive,
        }
    }
}

impl Transition {
    /// State after the transition. Never [State::Unknown].
    pub fn state(self) -> State {
        match self {
            Transition::BecameIdle | Transition::StillIdle => State::Idle,
            Transition::BecameActive | Transition::StillActive => State::Active,
        }
    }
}
