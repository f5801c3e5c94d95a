use super::super::http_response::trajectory::TrajectoryResponse;
use super::request_common::{HTTPRequestMethod, HTTPRequestType, NoBodyHTTPRequestType};

/// Request type for fetching one trajectory, optionally a page of it.
#[derive(Debug)]
pub(crate) struct TrajectoryRequest {
    pub(crate) id: String,
    pub(crate) limit: Option<usize>,
    pub(crate) offset: Option<usize>,
}

impl NoBodyHTTPRequestType for TrajectoryRequest {}

impl HTTPRequestType for TrajectoryRequest {
    type Response = TrajectoryResponse;
    fn endpoint(&self) -> String { format!("/trajectory/{}", self.id) }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Get }
    fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            params.push(("offset", offset.to_string()));
        }
        params
    }
}
