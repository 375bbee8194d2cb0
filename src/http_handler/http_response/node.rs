use crate::flight_control::telemetry::ManeuverNode;
use crate::http_handler::http_response::response_common::SerdeJSONBodyHTTPResponseType;

/// Response type for POST /node.
#[derive(serde::Deserialize, Debug)]
pub(crate) struct NodeResponse {
    #[serde(flatten)]
    node: ManeuverNode,
}

impl SerdeJSONBodyHTTPResponseType for NodeResponse {}

impl NodeResponse {
    pub(crate) fn node(&self) -> ManeuverNode { self.node }
}
