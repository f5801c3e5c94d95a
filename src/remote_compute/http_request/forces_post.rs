use super::super::http_response::forces::ForcesResponse;
use super::request_common::{HTTPRequestMethod, HTTPRequestType, JSONBodyHTTPRequestType};
use crate::entry_dynamics::common::vec3d::Vec3D;
use crate::entry_dynamics::{ControlInputs, PlanetModel, VehicleModel, VehicleState};

/// Request type for one remote force evaluation. Carries the full model set
/// so the remote result is a pure function of the request body, exactly like
/// the local physics engine.
#[derive(serde::Serialize, Debug)]
pub(crate) struct ComputeForcesRequest {
    pub(crate) state: VehicleState,
    pub(crate) planet: PlanetModel,
    pub(crate) vehicle: VehicleModel,
    pub(crate) controls: ControlInputs,
    pub(crate) lift_direction: Vec3D<f64>,
}

impl JSONBodyHTTPRequestType for ComputeForcesRequest {
    type Body = ComputeForcesRequest;
    fn body(&self) -> &Self::Body { self }
}

impl HTTPRequestType for ComputeForcesRequest {
    type Response = ForcesResponse;
    fn endpoint(&self) -> String { "/forces".to_string() }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Post }
}
