use super::response_common::SerdeJSONBodyHTTPResponseType;

/// Listing of the trajectories the service can serve.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TrajectoryListResponse {
    pub trajectories: Vec<TrajectoryListEntry>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TrajectoryListEntry {
    pub id: String,
    /// Number of samples in the stored trajectory.
    pub size: usize,
    pub modified_at: chrono::DateTime<chrono::Utc>,
}

impl SerdeJSONBodyHTTPResponseType for TrajectoryListResponse {}
