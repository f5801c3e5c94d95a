use super::super::http_response::high_fidelity::HighFidelityResponse;
use super::request_common::{HTTPRequestMethod, HTTPRequestType, JSONBodyHTTPRequestType};
use crate::entry_dynamics::EntryInterface;

/// Request type for a full remote entry simulation from interface conditions.
#[derive(serde::Serialize, Debug)]
pub(crate) struct HighFidelityRequest {
    pub(crate) planet_name: String,
    pub(crate) vehicle_name: String,
    pub(crate) interface: EntryInterface,
    pub(crate) bank_angle_deg: f64,
    pub(crate) dt_s: f64,
}

impl JSONBodyHTTPRequestType for HighFidelityRequest {
    type Body = HighFidelityRequest;
    fn body(&self) -> &Self::Body { self }
}

impl HTTPRequestType for HighFidelityRequest {
    type Response = HighFidelityResponse;
    fn endpoint(&self) -> String { "/high-fidelity".to_string() }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Post }
}
