use super::super::http_client::HTTPClient;
use super::super::http_response::response_common::{HTTPResponseType, ResponseError};

#[derive(Debug, Clone, Copy)]
pub(crate) enum HTTPRequestMethod {
    Get,
    Post,
    Put,
    Delete,
}

/// One typed endpoint of the trajectory/compute service: the endpoint path,
/// the HTTP method, optional query parameters and the expected response type.
pub(crate) trait HTTPRequestType {
    type Response: HTTPResponseType<ParsedResponseType = Self::Response>
        + for<'de> serde::Deserialize<'de>;
    fn endpoint(&self) -> String;
    fn request_method(&self) -> HTTPRequestMethod;
    fn query_params(&self) -> Vec<(&'static str, String)> { Vec::new() }
}

/// Requests without a body (plain GETs and parameterless calls).
pub(crate) trait NoBodyHTTPRequestType: HTTPRequestType {
    async fn send_request(&self, client: &HTTPClient) -> Result<Self::Response, ResponseError> {
        let response = prepare(self, client).send().await?;
        Self::Response::read_response(response).await
    }
}

/// Requests carrying a JSON body.
pub(crate) trait JSONBodyHTTPRequestType: HTTPRequestType {
    /// The type of the json body.
    type Body: serde::Serialize;
    /// Returns the serializable body object.
    fn body(&self) -> &Self::Body;

    async fn send_request(&self, client: &HTTPClient) -> Result<Self::Response, ResponseError> {
        let response = prepare(self, client).json(self.body()).send().await?;
        Self::Response::read_response(response).await
    }
}

fn prepare<T: HTTPRequestType + ?Sized>(
    request: &T,
    client: &HTTPClient,
) -> reqwest::RequestBuilder {
    let url = format!("{}{}", client.url(), request.endpoint());
    let builder = match request.request_method() {
        HTTPRequestMethod::Get => client.client().get(url),
        HTTPRequestMethod::Post => client.client().post(url),
        HTTPRequestMethod::Put => client.client().put(url),
        HTTPRequestMethod::Delete => client.client().delete(url),
    };
    let params = request.query_params();
    if params.is_empty() { builder } else { builder.query(&params) }
}
