use super::response_common::SerdeJSONBodyHTTPResponseType;
use crate::entry_dynamics::Sample;
use crate::entry_dynamics::common::vec3d::Vec3D;

/// Server-side interpolation result: the interpolated position plus the two
/// bracketing samples.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct InterpolateResponse {
    pub time_s: f64,
    pub interpolated_position: Vec3D<f64>,
    pub before: Sample,
    pub after: Sample,
}

impl SerdeJSONBodyHTTPResponseType for InterpolateResponse {}
