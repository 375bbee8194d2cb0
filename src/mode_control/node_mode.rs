use super::mode_context::ModeContext;
use crate::flight_control::{
    GuidanceError,
    burn::{BurnExecutor, BurnReport},
};
use crate::{info, warn};

/// Executes the next maneuver node already planned on the vessel.
///
/// # Errors
/// [`GuidanceError::SensorFault`] if no node is planned, otherwise whatever the
/// [`BurnExecutor`] reports.
pub async fn execute_next_node(context: &ModeContext) -> Result<BurnReport, GuidanceError> {
    let Some(node) = context.k().telemetry().next_node().await? else {
        warn!("No maneuver node planned");
        return Err(GuidanceError::SensorFault("no maneuver node planned".to_string()));
    };
    info!("Found node {} with {:.2} m/s", node.id, node.prograde_delta_v);
    let mut executor =
        BurnExecutor::new(context.k(), context.profile().burn.clone(), context.c_tok().clone());
    executor.execute(node).await
}
