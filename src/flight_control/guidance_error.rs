use super::vessel_link::LinkError;
use strum_macros::Display;

/// Failures that end a guidance operation.
///
/// Transient conditions such as regulator saturation or short attitude drift are corrected inside
/// the control loops and never show up here.
#[derive(Debug, Display)]
pub enum GuidanceError {
    /// A required telemetry value is missing or not finite.
    SensorFault(String),
    /// There is no thrust and no stage left to activate.
    ActuationExhausted,
    /// The fine burn phase ran out of ticks before reaching its tolerance.
    ToleranceNotMet { residual_dv: f64 },
    /// The operator interrupted the flight.
    OperatorAbort,
    /// A regulator was asked to integrate over a non positive time step.
    InvalidInterval(f64),
    Link(LinkError),
}

impl std::error::Error for GuidanceError {}

impl From<LinkError> for GuidanceError {
    fn from(value: LinkError) -> Self { GuidanceError::Link(value) }
}
