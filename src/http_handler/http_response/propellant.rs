use crate::flight_control::telemetry::Propellant;
use crate::http_handler::http_response::response_common::SerdeJSONBodyHTTPResponseType;

/// Response type for the /stage/{n}/propellant/{resource} endpoint.
#[derive(serde::Deserialize, Debug)]
pub(crate) struct PropellantResponse {
    stage: u32,
    resource: Propellant,
    amount: f64,
}

impl SerdeJSONBodyHTTPResponseType for PropellantResponse {}

impl PropellantResponse {
    pub(crate) fn stage(&self) -> u32 { self.stage }
    pub(crate) fn resource(&self) -> Propellant { self.resource }
    pub(crate) fn amount(&self) -> f64 { self.amount }
}
