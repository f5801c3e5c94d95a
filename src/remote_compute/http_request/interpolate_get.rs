use super::super::http_response::interpolate::InterpolateResponse;
use super::request_common::{HTTPRequestMethod, HTTPRequestType, NoBodyHTTPRequestType};

/// Request type for server-side interpolation at one time point. The service
/// answers 4xx when the time lies outside the stored range.
#[derive(Debug)]
pub(crate) struct InterpolateRequest {
    pub(crate) id: String,
    pub(crate) time_s: f64,
}

impl NoBodyHTTPRequestType for InterpolateRequest {}

impl HTTPRequestType for InterpolateRequest {
    type Response = InterpolateResponse;
    fn endpoint(&self) -> String { format!("/trajectory/{}/interpolate", self.id) }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Get }
    fn query_params(&self) -> Vec<(&'static str, String)> {
        vec![("time", self.time_s.to_string())]
    }
}
