//! REST client for a vehicle bridge exposing telemetry, controls, staging, maneuver nodes and
//! time warp over HTTP with JSON bodies.

mod bridge_link;
pub(crate) mod http_client;
mod http_handler_common;
pub(crate) mod http_request;
pub(crate) mod http_response;
#[cfg(test)]
mod tests;

pub use bridge_link::BridgeLink;
pub use http_handler_common::HTTPError;
pub use http_request::request_common::RequestError;
