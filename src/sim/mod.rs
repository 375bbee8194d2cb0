//! In-process vessel used for offline flights and tests: a planar point mass with staged engine
//! groups, an exponential atmosphere and maneuver node bookkeeping.

mod sim_link;
mod vessel_model;
#[cfg(test)]
mod tests;

pub use sim_link::SimVessel;
pub use vessel_model::{Body, EngineGroup, OrbitElements, Vec2, VesselModel};
