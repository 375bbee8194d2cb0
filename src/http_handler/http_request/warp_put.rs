use super::request_common::{HTTPRequestMethod, HTTPRequestType, JSONBodyHTTPRequestType};
use super::warp::WarpResponse;
use std::time::Duration;

/// Request type for the /warp endpoint. The bridge answers once the target time is reached.
#[derive(serde::Serialize, Debug)]
pub(crate) struct WarpRequest {
    /// Universal time to warp to.
    pub(crate) ut: f64,
}

impl WarpRequest {
    const WARP_TIMEOUT: Duration = Duration::from_secs(900);
}

impl JSONBodyHTTPRequestType for WarpRequest {
    type Body = WarpRequest;
    fn body(&self) -> &Self::Body { self }
}

impl HTTPRequestType for WarpRequest {
    type Response = WarpResponse;
    fn endpoint(&self) -> &'static str { "/warp" }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Put }
    fn timeout(&self) -> Option<Duration> { Some(Self::WARP_TIMEOUT) }
}
