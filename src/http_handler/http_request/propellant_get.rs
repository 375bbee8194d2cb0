use super::propellant::PropellantResponse;
use super::request_common::{HTTPRequestMethod, HTTPRequestType, NoBodyHTTPRequestType};
use crate::flight_control::telemetry::Propellant;

/// Request type for the /stage/{n}/propellant/{resource} endpoint.
#[derive(Debug)]
pub(crate) struct PropellantRequest {
    path: String,
}

impl PropellantRequest {
    pub(crate) fn new(stage: u32, resource: Propellant) -> Self {
        Self { path: format!("/stage/{stage}/propellant/{resource}") }
    }
}

impl NoBodyHTTPRequestType for PropellantRequest {}

impl HTTPRequestType for PropellantRequest {
    type Response = PropellantResponse;
    fn endpoint(&self) -> &str { &self.path }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Get }
}
