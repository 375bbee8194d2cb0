use crate::http_handler::http_response::response_common::SerdeJSONBodyHTTPResponseType;

/// Response type for the /control endpoint, echoing the control state after the update.
#[derive(serde::Deserialize, Debug)]
pub(crate) struct ControlResponse {
    throttle: f64,
    pitch: f64,
    heading: f64,
    roll: f64,
}

impl SerdeJSONBodyHTTPResponseType for ControlResponse {}

impl ControlResponse {
    pub(crate) fn throttle(&self) -> f64 { self.throttle }
    pub(crate) fn pitch(&self) -> f64 { self.pitch }
    pub(crate) fn heading(&self) -> f64 { self.heading }
    pub(crate) fn roll(&self) -> f64 { self.roll }
}
