use crate::flight_control::telemetry::TelemetrySample;
use crate::http_handler::http_response::response_common::SerdeJSONBodyHTTPResponseType;

/// Response type for the /telemetry endpoint.
#[derive(serde::Deserialize, Debug)]
pub(crate) struct TelemetryResponse {
    #[serde(flatten)]
    sample: TelemetrySample,
}

impl SerdeJSONBodyHTTPResponseType for TelemetryResponse {}

impl TelemetryResponse {
    pub(crate) fn sample(&self) -> TelemetrySample { self.sample }
}
