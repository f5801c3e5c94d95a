use super::response_common::SerdeJSONBodyHTTPResponseType;

/// Health check reply from the compute service.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub port: u16,
}

impl HealthResponse {
    pub fn is_healthy(&self) -> bool { self.status == "healthy" }
}

impl SerdeJSONBodyHTTPResponseType for HealthResponse {}
