use super::node::NodeResponse;
use super::request_common::{HTTPRequestMethod, HTTPRequestType, JSONBodyHTTPRequestType};

/// Request type for POST /node.
#[derive(serde::Serialize, Debug)]
pub(crate) struct NodeRequest {
    /// Universal time of the node.
    pub(crate) ut: f64,
    /// Prograde delta-v in m/s.
    pub(crate) prograde: f64,
}

impl JSONBodyHTTPRequestType for NodeRequest {
    type Body = NodeRequest;
    fn body(&self) -> &Self::Body { self }
}

impl HTTPRequestType for NodeRequest {
    type Response = NodeResponse;
    fn endpoint(&self) -> &'static str { "/node" }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Post }
}
