use super::control::ControlResponse;
use super::request_common::{HTTPRequestMethod, HTTPRequestType, JSONBodyHTTPRequestType};

/// Request type for the /control endpoint. Unset fields leave the corresponding control as is.
#[derive(serde::Serialize, Debug, Default)]
pub(crate) struct ControlRequest {
    /// The desired throttle in `[0, 1]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) throttle: Option<f64>,
    /// The desired pitch above the horizon in degrees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) pitch: Option<f64>,
    /// The desired compass heading in degrees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) heading: Option<f64>,
    /// The desired roll in degrees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) roll: Option<f64>,
}

impl JSONBodyHTTPRequestType for ControlRequest {
    type Body = ControlRequest;
    fn body(&self) -> &Self::Body { self }
}

impl HTTPRequestType for ControlRequest {
    type Response = ControlResponse;
    fn endpoint(&self) -> &'static str { "/control" }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Put }
}
