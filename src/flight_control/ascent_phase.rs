use serde::Serialize;
use std::collections::HashSet;
use std::sync::LazyLock;
use strum_macros::Display;

#[derive(Debug, Display, PartialEq, Eq, Clone, Copy, Hash, Serialize)]
pub enum AscentPhase {
    Launch,
    Roll,
    PitchProgram,
    Circularization,
    Done,
    Aborted,
}

impl AscentPhase {
    /// Phases after which the controller stops ticking.
    pub fn is_terminal(self) -> bool { matches!(self, AscentPhase::Done | AscentPhase::Aborted) }

    /// Whether moving from `self` to `to` is a legal, forward transition.
    pub fn can_transition_to(self, to: AscentPhase) -> bool {
        PHASE_TRANSITION_LOOKUP.contains(&(self, to))
    }
}

impl From<AscentPhase> for &'static str {
    fn from(value: AscentPhase) -> Self {
        match value {
            AscentPhase::Launch => "launch",
            AscentPhase::Roll => "roll",
            AscentPhase::PitchProgram => "pitch",
            AscentPhase::Circularization => "circ",
            AscentPhase::Done => "done",
            AscentPhase::Aborted => "aborted",
        }
    }
}

pub static PHASE_TRANSITION_LOOKUP: LazyLock<HashSet<(AscentPhase, AscentPhase)>> =
    LazyLock::new(|| {
        let transitions = vec![
            // Nominal ascent
            (AscentPhase::Launch, AscentPhase::Roll),
            (AscentPhase::Roll, AscentPhase::PitchProgram),
            (AscentPhase::PitchProgram, AscentPhase::Circularization),
            (AscentPhase::Circularization, AscentPhase::Done),
            // Aborts
            (AscentPhase::Launch, AscentPhase::Aborted),
            (AscentPhase::Roll, AscentPhase::Aborted),
            (AscentPhase::PitchProgram, AscentPhase::Aborted),
            (AscentPhase::Circularization, AscentPhase::Aborted),
        ];
        transitions.into_iter().collect()
    });
