use super::response_common::SerdeJSONBodyHTTPResponseType;
use crate::entry_dynamics::Sample;
use crate::entry_dynamics::common::vec3d::Vec3D;

/// Column-oriented output of the remote high-fidelity entry simulation.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HighFidelityResponse {
    pub time_s: Vec<f64>,
    pub x_m: Vec<f64>,
    pub y_m: Vec<f64>,
    pub z_m: Vec<f64>,
    pub vx_m_s: Vec<f64>,
    pub vy_m_s: Vec<f64>,
    pub vz_m_s: Vec<f64>,
}

impl HighFidelityResponse {
    /// Reassembles the column arrays into row-oriented samples, truncating to
    /// the shortest column.
    pub fn into_samples(self) -> Vec<Sample> {
        let n = [
            self.time_s.len(),
            self.x_m.len(),
            self.y_m.len(),
            self.z_m.len(),
            self.vx_m_s.len(),
            self.vy_m_s.len(),
            self.vz_m_s.len(),
        ]
        .into_iter()
        .min()
        .unwrap_or(0);
        (0..n)
            .map(|i| {
                Sample::new(
                    self.time_s[i],
                    Vec3D::new(self.x_m[i], self.y_m[i], self.z_m[i]),
                    Some(Vec3D::new(self.vx_m_s[i], self.vy_m_s[i], self.vz_m_s[i])),
                )
            })
            .collect()
    }
}

impl SerdeJSONBodyHTTPResponseType for HighFidelityResponse {}
