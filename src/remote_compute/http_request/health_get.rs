use super::super::http_response::health::HealthResponse;
use super::request_common::{HTTPRequestMethod, HTTPRequestType, NoBodyHTTPRequestType};

#[derive(Debug)]
pub(crate) struct HealthRequest {}

impl NoBodyHTTPRequestType for HealthRequest {}

impl HTTPRequestType for HealthRequest {
    type Response = HealthResponse;
    fn endpoint(&self) -> String { "/health".to_string() }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Get }
}
