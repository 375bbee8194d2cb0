use super::http_response::{
    autopilot, control, node, node_removed, nodes, propellant, stage, telemetry, warp,
};

pub(crate) mod autopilot_put;
pub(crate) mod control_put;
pub(crate) mod node_delete;
pub(crate) mod node_post;
pub(crate) mod nodes_get;
pub(crate) mod propellant_get;
pub(crate) mod request_common;
pub(crate) mod stage_post;
pub(crate) mod telemetry_get;
pub(crate) mod warp_put;
