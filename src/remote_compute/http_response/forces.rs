use super::response_common::SerdeJSONBodyHTTPResponseType;
use crate::entry_dynamics::ForceVector;

/// Remote force evaluation. The decomposition mirrors the local physics
/// engine exactly; the two must agree within numerical tolerance.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ForcesResponse {
    pub forces: ForceVector,
}

impl SerdeJSONBodyHTTPResponseType for ForcesResponse {}
