use super::super::http_response::analyze::AnalysisReport;
use super::request_common::{HTTPRequestMethod, HTTPRequestType, NoBodyHTTPRequestType};

/// Request type for aggregate statistics over one trajectory window.
#[derive(Debug)]
pub(crate) struct AnalyzeRequest {
    pub(crate) id: String,
    pub(crate) start_time_s: Option<f64>,
    pub(crate) end_time_s: Option<f64>,
}

impl NoBodyHTTPRequestType for AnalyzeRequest {}

impl HTTPRequestType for AnalyzeRequest {
    type Response = AnalysisReport;
    fn endpoint(&self) -> String { format!("/trajectory/{}/analyze", self.id) }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Get }
    fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(start) = self.start_time_s {
            params.push(("start_time", start.to_string()));
        }
        if let Some(end) = self.end_time_s {
            params.push(("end_time", end.to_string()));
        }
        params
    }
}
