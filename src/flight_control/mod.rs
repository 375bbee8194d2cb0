//! Flight side of the controller: telemetry and command types, the vessel collaborator
//! boundary, the guidance math and the maneuver burn executor.

pub mod ascent_phase;
pub mod burn;
pub(crate) mod common;
pub mod flight_recorder;
pub mod guidance;
pub mod guidance_error;
pub mod telemetry;
pub mod vessel_link;

pub use ascent_phase::AscentPhase;
pub use guidance_error::GuidanceError;
