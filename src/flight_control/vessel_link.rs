use super::telemetry::{ManeuverNode, Propellant, TelemetrySample};
use crate::http_handler::{HTTPError, RequestError};
use strum_macros::Display;

/// Error raised by a vessel collaborator when a telemetry read or command could not be completed.
#[derive(Debug, Display)]
pub enum LinkError {
    /// The underlying transport failed.
    Http(HTTPError),
    /// The vessel refused the command, e.g. because there is no stage left.
    Rejected(String),
    /// The vessel is no longer reachable.
    Disconnected,
}

impl std::error::Error for LinkError {}

impl From<HTTPError> for LinkError {
    fn from(value: HTTPError) -> Self {
        match value {
            HTTPError::HTTPRequestError(RequestError::NoConnection) => LinkError::Disconnected,
            other => LinkError::Http(other),
        }
    }
}

/// Read side of the vessel boundary.
#[async_trait::async_trait]
pub trait TelemetrySource: Send + Sync {
    /// Returns the latest telemetry snapshot.
    async fn sample(&self) -> Result<TelemetrySample, LinkError>;
    /// Remaining amount of `resource` in the parts decoupled by `stage`.
    async fn stage_propellant(&self, stage: u32, resource: Propellant) -> Result<f64, LinkError>;
    /// The next maneuver node in the vessel's flight plan.
    async fn next_node(&self) -> Result<Option<ManeuverNode>, LinkError>;
}

/// Command side of the vessel boundary.
///
/// Only one component may hold command authority at a time; the ascent controller hands it to
/// the burn executor for the duration of a burn.
#[async_trait::async_trait]
pub trait Actuator: Send + Sync {
    /// Sets the main throttle. Callers keep `throttle` inside `[0, 1]`.
    async fn set_throttle(&self, throttle: f64) -> Result<(), LinkError>;
    async fn set_pitch_and_heading(&self, pitch: f64, heading: f64) -> Result<(), LinkError>;
    async fn set_roll(&self, roll: f64) -> Result<(), LinkError>;
    /// Engages the attitude hold on the commanded pitch and heading.
    async fn engage_autopilot(&self) -> Result<(), LinkError>;
    async fn disengage_autopilot(&self) -> Result<(), LinkError>;
    /// Engages the attitude hold on the burn direction of `node`.
    async fn point_at_node(&self, node: &ManeuverNode) -> Result<(), LinkError>;
    /// Activates the next stage and returns the number of stages left afterwards.
    async fn activate_next_stage(&self) -> Result<u32, LinkError>;
    /// Creates a maneuver node with a prograde delta-v at universal time `ut`.
    async fn add_node(&self, ut: f64, prograde: f64) -> Result<ManeuverNode, LinkError>;
    async fn remove_node(&self, node: &ManeuverNode) -> Result<(), LinkError>;
}

/// Time acceleration used to skip idle coast phases.
#[async_trait::async_trait]
pub trait TimeWarp: Send + Sync {
    /// Advances the simulation to universal time `ut`, returning once it is reached.
    async fn warp_to(&self, ut: f64) -> Result<(), LinkError>;
}
