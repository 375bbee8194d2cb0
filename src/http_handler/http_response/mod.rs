pub(crate) mod autopilot;
pub(crate) mod control;
pub(crate) mod node;
pub(crate) mod node_removed;
pub(crate) mod nodes;
pub(crate) mod propellant;
pub(crate) mod response_common;
pub(crate) mod stage;
pub(crate) mod telemetry;
pub(crate) mod warp;
