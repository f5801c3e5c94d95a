use super::response_common::SerdeJSONBodyHTTPResponseType;
use crate::entry_dynamics::Sample;

/// The full modified trajectory as returned by the remote modify endpoint.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ModifyTrajectoryResponse {
    pub trajectory: Vec<Sample>,
    pub metadata: ModifyMetadata,
}

#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct ModifyMetadata {
    /// Cutoff time the modification was applied at [s].
    pub modification_time_s: f64,
    pub bank_angle_deg: f64,
    pub points_modified: usize,
}

impl SerdeJSONBodyHTTPResponseType for ModifyTrajectoryResponse {}
