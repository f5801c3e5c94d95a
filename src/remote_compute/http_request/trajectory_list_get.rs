use super::super::http_response::trajectory_list::TrajectoryListResponse;
use super::request_common::{HTTPRequestMethod, HTTPRequestType, NoBodyHTTPRequestType};

#[derive(Debug)]
pub(crate) struct TrajectoryListRequest {}

impl NoBodyHTTPRequestType for TrajectoryListRequest {}

impl HTTPRequestType for TrajectoryListRequest {
    type Response = TrajectoryListResponse;
    fn endpoint(&self) -> String { "/trajectories".to_string() }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Get }
}
