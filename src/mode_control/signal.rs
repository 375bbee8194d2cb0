use crate::flight_control::AscentPhase;

/// Result of one control tick of the ascent state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseSignal {
    Continue,
    Transition(AscentPhase),
}
