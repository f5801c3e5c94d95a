use super::response_common::SerdeJSONBodyHTTPResponseType;

/// Aggregate statistics over one trajectory window.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct AnalysisReport {
    pub point_count: usize,
    pub time_range: (f64, f64),
    pub altitude_range: (f64, f64),
    pub velocity: ChannelStats,
    pub acceleration: ChannelStats,
}

#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct ChannelStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

impl From<(f64, f64, f64)> for ChannelStats {
    fn from((min, max, avg): (f64, f64, f64)) -> Self { Self { min, max, avg } }
}

impl SerdeJSONBodyHTTPResponseType for AnalysisReport {}
