use super::super::http_response::modify::ModifyTrajectoryResponse;
use super::request_common::{HTTPRequestMethod, HTTPRequestType, JSONBodyHTTPRequestType};
use crate::entry_dynamics::Sample;
use crate::entry_dynamics::common::vec3d::Vec3D;

/// Request type for the remote bank-angle modification.
#[derive(serde::Serialize, Debug)]
pub(crate) struct ModifyTrajectoryRequest {
    /// Samples at or after this time are re-simulated.
    pub(crate) cutoff_time_s: f64,
    pub(crate) bank_angle_deg: f64,
    /// Caller-supplied lift direction hint.
    pub(crate) lift_direction: Vec3D<f64>,
    /// The working trajectory the modification is based on.
    pub(crate) trajectory: Vec<Sample>,
}

impl JSONBodyHTTPRequestType for ModifyTrajectoryRequest {
    type Body = ModifyTrajectoryRequest;
    fn body(&self) -> &Self::Body { self }
}

impl HTTPRequestType for ModifyTrajectoryRequest {
    type Response = ModifyTrajectoryResponse;
    fn endpoint(&self) -> String { "/trajectory/modify".to_string() }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Post }
}
