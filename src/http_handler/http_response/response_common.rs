use strum_macros::Display;

pub(crate) trait JSONBodyHTTPResponseType: HTTPResponseType {
    async fn parse_json_body(
        response: reqwest::Response,
    ) -> Result<Self::ParsedResponseType, ResponseError>
    where Self::ParsedResponseType: for<'de> serde::Deserialize<'de> {
        Ok(response.json::<Self::ParsedResponseType>().await?)
    }
}

/// Marker for responses that are plain serde JSON documents.
pub(crate) trait SerdeJSONBodyHTTPResponseType {}

impl<T> JSONBodyHTTPResponseType for T
where
    T: SerdeJSONBodyHTTPResponseType,
    for<'de> T: serde::Deserialize<'de>,
{
}

impl<T> HTTPResponseType for T
where
    T: SerdeJSONBodyHTTPResponseType,
    for<'de> T: serde::Deserialize<'de>,
{
    type ParsedResponseType = T;

    async fn read_response(
        response: reqwest::Response,
    ) -> Result<Self::ParsedResponseType, ResponseError> {
        let resp = Self::unwrap_return_code(response).await?;
        Self::parse_json_body(resp).await
    }
}

pub(crate) trait HTTPResponseType {
    type ParsedResponseType;
    async fn read_response(
        response: reqwest::Response,
    ) -> Result<Self::ParsedResponseType, ResponseError>;

    async fn unwrap_return_code(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ResponseError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else if status.is_server_error() {
            Err(ResponseError::InternalServer)
        } else if status.is_client_error() {
            let detail = response.json::<BadRequestReturn>().await.unwrap_or_default();
            Err(ResponseError::BadRequest(detail))
        } else {
            Err(ResponseError::Unknown)
        }
    }
}

/// Error body the bridge sends with 4xx responses.
#[derive(Debug, Default, serde::Deserialize)]
pub struct BadRequestReturn {
    #[serde(default)]
    detail: String,
}

impl BadRequestReturn {
    pub fn detail(&self) -> &str { &self.detail }
}

#[derive(Debug, Display)]
pub enum ResponseError {
    InternalServer,
    BadRequest(BadRequestReturn),
    /// The body did not match the expected document.
    Malformed,
    NoConnection,
    Unknown,
}

impl std::error::Error for ResponseError {}

impl From<reqwest::Error> for ResponseError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            ResponseError::Malformed
        } else if value.is_timeout() || value.is_redirect() {
            ResponseError::InternalServer
        } else if value.is_connect() {
            ResponseError::NoConnection
        } else {
            ResponseError::Unknown
        }
    }
}
