use strum_macros::Display;

pub(crate) trait JSONBodyHTTPResponseType: HTTPResponseType {
    async fn parse_json_body(
        response: reqwest::Response,
    ) -> Result<Self::ParsedResponseType, ResponseError>
    where Self::ParsedResponseType: for<'de> serde::Deserialize<'de> {
        Ok(response.json::<Self::ParsedResponseType>().await?)
    }
}

/// Marker for response types that are parsed straight from a JSON body via
/// their `serde::Deserialize` impl.
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
        if response.status().is_success() {
            Ok(response)
        } else if response.status().is_server_error() {
            Err(ResponseError::InternalServer)
        } else if response.status().is_client_error() {
            Err(ResponseError::BadRequest(response.json().await.unwrap_or_default()))
        } else {
            Err(ResponseError::Unknown)
        }
    }
}

/// FastAPI-style 4xx body: `{"detail": "..."}`.
#[derive(Debug, Default, serde::Deserialize)]
pub struct BadRequestReturn {
    detail: Option<String>,
}

impl std::fmt::Display for BadRequestReturn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.detail.as_deref().unwrap_or("<no detail>"))
    }
}

/// Failure of one remote call. Every variant is treated identically by the
/// resilient client: retry, then fall back to the local computation.
#[derive(Debug, Display)]
pub enum ResponseError {
    InternalServer,
    #[strum(to_string = "BadRequest({0})")]
    BadRequest(BadRequestReturn),
    NoConnection,
    Timeout,
    Unknown,
}

impl std::error::Error for ResponseError {}
impl From<reqwest::Error> for ResponseError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_timeout() {
            ResponseError::Timeout
        } else if value.is_connect() {
            ResponseError::NoConnection
        } else if value.is_redirect() {
            ResponseError::InternalServer
        } else if value.is_request() {
            ResponseError::BadRequest(BadRequestReturn::default())
        } else {
            ResponseError::Unknown
        }
    }
}
