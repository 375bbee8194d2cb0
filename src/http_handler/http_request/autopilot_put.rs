use super::autopilot::AutopilotResponse;
use super::request_common::{HTTPRequestMethod, HTTPRequestType, JSONBodyHTTPRequestType};

/// What the attitude hold points at.
#[derive(serde::Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub(crate) enum AutopilotTarget {
    /// The pitch and heading set through /control.
    Attitude,
    /// The burn vector of a maneuver node.
    Node { id: u64 },
}

/// Request type for the /autopilot endpoint.
#[derive(serde::Serialize, Debug)]
pub(crate) struct AutopilotRequest {
    pub(crate) engaged: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) target: Option<AutopilotTarget>,
}

impl JSONBodyHTTPRequestType for AutopilotRequest {
    type Body = AutopilotRequest;
    fn body(&self) -> &Self::Body { self }
}

impl HTTPRequestType for AutopilotRequest {
    type Response = AutopilotResponse;
    fn endpoint(&self) -> &'static str { "/autopilot" }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Put }
}
