use crate::http_handler::http_response::response_common::SerdeJSONBodyHTTPResponseType;

/// Response type for the /stage endpoint.
#[derive(serde::Deserialize, Debug)]
pub(crate) struct StageResponse {
    /// Stages left to activate after this activation.
    current_stage: u32,
}

impl SerdeJSONBodyHTTPResponseType for StageResponse {}

impl StageResponse {
    pub(crate) fn current_stage(&self) -> u32 { self.current_stage }
}
