use crate::http_handler::http_response::response_common::SerdeJSONBodyHTTPResponseType;

/// Response type for the /autopilot endpoint.
#[derive(serde::Deserialize, Debug)]
pub(crate) struct AutopilotResponse {
    engaged: bool,
    /// Attitude error in degrees at the time of the update.
    error: f64,
}

impl SerdeJSONBodyHTTPResponseType for AutopilotResponse {}

impl AutopilotResponse {
    pub(crate) fn is_engaged(&self) -> bool { self.engaged }
    pub(crate) fn error(&self) -> f64 { self.error }
}
