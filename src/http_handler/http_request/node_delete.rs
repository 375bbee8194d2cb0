use super::node_removed::NodeRemovedResponse;
use super::request_common::{HTTPRequestMethod, HTTPRequestType, NoBodyHTTPRequestType};

/// Request type for DELETE /node/{id}.
#[derive(Debug)]
pub(crate) struct NodeDeleteRequest {
    path: String,
}

impl NodeDeleteRequest {
    pub(crate) fn new(id: u64) -> Self { Self { path: format!("/node/{id}") } }
}

impl NoBodyHTTPRequestType for NodeDeleteRequest {}

impl HTTPRequestType for NodeDeleteRequest {
    type Response = NodeRemovedResponse;
    fn endpoint(&self) -> &str { &self.path }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Delete }
}
