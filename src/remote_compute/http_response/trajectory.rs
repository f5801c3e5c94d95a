use super::response_common::SerdeJSONBodyHTTPResponseType;
use crate::entry_dynamics::Sample;

/// One served trajectory, possibly a `limit`/`offset` page of it.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TrajectoryResponse {
    pub id: String,
    /// Total sample count of the stored trajectory, independent of paging.
    pub total_points: usize,
    pub points: Vec<Sample>,
    pub metadata: TrajectoryMetadata,
}

#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct TrajectoryMetadata {
    pub point_count: usize,
    pub time_range: (f64, f64),
    pub altitude_range: (f64, f64),
    pub duration_s: f64,
}

impl SerdeJSONBodyHTTPResponseType for TrajectoryResponse {}
