use crate::http_handler::{
    HTTPError, http_client::HTTPClient, http_response::response_common::HTTPResponseType,
};
use std::time::Duration;
use strum_macros::Display;

/// HTTP methods used by the bridge endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HTTPRequestMethod {
    Get,
    Post,
    Put,
    Delete,
}

/// Common description of a bridge request.
pub(crate) trait HTTPRequestType {
    /// Type of the expected response.
    type Response: HTTPResponseType;
    /// Path of the endpoint relative to the bridge base URL.
    fn endpoint(&self) -> &str;
    /// The corresponding HTTP Request Method.
    fn request_method(&self) -> HTTPRequestMethod;
    /// Additional header parameters.
    fn header_params(&self) -> reqwest::header::HeaderMap { reqwest::header::HeaderMap::new() }
    /// Overrides the client wide timeout for requests that block on the vessel.
    fn timeout(&self) -> Option<Duration> { None }

    fn compose(&self, client: &HTTPClient) -> reqwest::RequestBuilder {
        let url = format!("{}{}", client.url(), self.endpoint());
        let builder = match self.request_method() {
            HTTPRequestMethod::Get => client.client().get(url),
            HTTPRequestMethod::Post => client.client().post(url),
            HTTPRequestMethod::Put => client.client().put(url),
            HTTPRequestMethod::Delete => client.client().delete(url),
        };
        let builder = builder.headers(self.header_params());
        match self.timeout() {
            Some(t) => builder.timeout(t),
            None => builder,
        }
    }
}

type ParsedResponse<T> = <<T as HTTPRequestType>::Response as HTTPResponseType>::ParsedResponseType;

/// Requests without a body.
pub(crate) trait NoBodyHTTPRequestType: HTTPRequestType {
    async fn send_request(&self, client: &HTTPClient) -> Result<ParsedResponse<Self>, HTTPError> {
        let response = self.compose(client).send().await?;
        Ok(Self::Response::read_response(response).await?)
    }
}

/// Requests carrying a JSON body.
pub(crate) trait JSONBodyHTTPRequestType: HTTPRequestType {
    /// The type of the json body.
    type Body: serde::Serialize;
    /// Returns the serializable object.
    fn body(&self) -> &Self::Body;

    async fn send_request(&self, client: &HTTPClient) -> Result<ParsedResponse<Self>, HTTPError> {
        let response = self.compose(client).json(self.body()).send().await?;
        Ok(Self::Response::read_response(response).await?)
    }
}

#[derive(Debug, Display)]
pub enum RequestError {
    /// The bridge could not be reached.
    NoConnection,
    Timeout,
    /// The request could not be built or encoded.
    Malformed,
    Unknown,
}

impl std::error::Error for RequestError {}

impl From<reqwest::Error> for RequestError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_connect() {
            RequestError::NoConnection
        } else if value.is_timeout() {
            RequestError::Timeout
        } else if value.is_builder() || value.is_body() {
            RequestError::Malformed
        } else {
            RequestError::Unknown
        }
    }
}
