use crate::flight_control::telemetry::ManeuverNode;
use crate::http_handler::http_response::response_common::SerdeJSONBodyHTTPResponseType;

/// Response type for the /nodes endpoint, the flight plan in execution order.
#[derive(serde::Deserialize, Debug)]
#[serde(transparent)]
pub(crate) struct NodesResponse {
    nodes: Vec<ManeuverNode>,
}

impl SerdeJSONBodyHTTPResponseType for NodesResponse {}

impl NodesResponse {
    pub(crate) fn first(&self) -> Option<ManeuverNode> { self.nodes.first().copied() }
    pub(crate) fn len(&self) -> usize { self.nodes.len() }
}
