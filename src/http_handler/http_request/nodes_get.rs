use super::nodes::NodesResponse;
use super::request_common::{HTTPRequestMethod, HTTPRequestType, NoBodyHTTPRequestType};

/// Request type for the /nodes endpoint.
#[derive(Debug)]
pub(crate) struct NodesRequest {}

impl NoBodyHTTPRequestType for NodesRequest {}

impl HTTPRequestType for NodesRequest {
    type Response = NodesResponse;
    fn endpoint(&self) -> &'static str { "/nodes" }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Get }
}
