use crate::http_handler::http_response::response_common::SerdeJSONBodyHTTPResponseType;

/// Response type for the /warp endpoint, sent once the warp has ended.
#[derive(serde::Deserialize, Debug)]
pub(crate) struct WarpResponse {
    ut: f64,
}

impl SerdeJSONBodyHTTPResponseType for WarpResponse {}

impl WarpResponse {
    pub(crate) fn ut(&self) -> f64 { self.ut }
}
