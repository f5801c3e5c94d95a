use super::common::math::EPS;
use super::common::vec3d::Vec3D;
use super::planet::PlanetModel;
use super::trajectory::VehicleState;
use super::vehicle::VehicleModel;
use crate::warn;

/// CODATA 2018 gravitational constant [m^3 kg^-1 s^-2].
pub const GRAVITATIONAL_CONSTANT: f64 = 6.674_30e-11;

/// Pilot/operator control inputs supplied per force computation.
///
/// Angles are in degrees; `main_thrust_n` is the commanded thrust magnitude in
/// newtons. `roll_deg` has no effect on the point-mass force model and is
/// carried for the wire contract only.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ControlInputs {
    pub bank_angle_deg: f64,
    pub main_thrust_n: f64,
    pub pitch_deg: f64,
    pub yaw_deg: f64,
    pub roll_deg: f64,
}

impl ControlInputs {
    /// Bank-angle-only controls: no thrust, no attitude offsets. This is the
    /// input set used by trajectory re-simulation.
    pub const fn bank_only(bank_angle_deg: f64) -> Self {
        Self { bank_angle_deg, main_thrust_n: 0.0, pitch_deg: 0.0, yaw_deg: 0.0, roll_deg: 0.0 }
    }

    /// Commanded thrust vector in the inertial frame, built from the thrust
    /// magnitude and the pitch/yaw pointing angles.
    pub fn thrust_vector(&self) -> Vec3D<f64> {
        if self.main_thrust_n.abs() < EPS {
            return Vec3D::zero();
        }
        let pitch = self.pitch_deg.to_radians();
        let yaw = self.yaw_deg.to_radians();
        Vec3D::new(pitch.cos() * yaw.cos(), pitch.cos() * yaw.sin(), pitch.sin())
            * self.main_thrust_n
    }
}

/// The decomposed result of one force computation [N]. Transient; never stored.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ForceVector {
    pub gravity: Vec3D<f64>,
    pub drag: Vec3D<f64>,
    pub lift: Vec3D<f64>,
    pub thrust: Vec3D<f64>,
}

impl ForceVector {
    pub fn zero() -> Self {
        Self {
            gravity: Vec3D::zero(),
            drag: Vec3D::zero(),
            lift: Vec3D::zero(),
            thrust: Vec3D::zero(),
        }
    }

    /// Vector sum of the four components.
    pub fn total(&self) -> Vec3D<f64> { self.gravity + self.drag + self.lift + self.thrust }
}

/// Computes the total force acting on the vehicle at the given state.
///
/// Pure function: identical inputs always produce identical output, whether
/// evaluated here or proxied to the remote compute service. Any component
/// whose precondition is violated (zero-length vector needing normalization)
/// contributes exactly zero instead of raising an error, so a degenerate
/// input never aborts a frame.
///
/// # Arguments
/// * `state` - Current vehicle state (position/velocity in the inertial frame).
/// * `planet` - Body the vehicle is entering.
/// * `vehicle` - Aerodynamic and mass properties.
/// * `controls` - Bank angle, thrust and attitude inputs.
/// * `lift_hint` - Caller-supplied lift direction; projected perpendicular to
///   the velocity and rotated about it by the bank angle.
///
/// # Returns
/// The decomposed `ForceVector` [N].
pub fn compute_forces(
    state: &VehicleState,
    planet: &PlanetModel,
    vehicle: &VehicleModel,
    controls: &ControlInputs,
    lift_hint: &Vec3D<f64>,
) -> ForceVector {
    let mut forces = ForceVector::zero();

    // Gravity, directed from the vehicle toward the planet center.
    let distance = state.position.abs();
    if distance < EPS {
        warn!("degenerate position at t={:.3}: |r|=0, gravity dropped", state.time_s);
    } else {
        let magnitude =
            GRAVITATIONAL_CONSTANT * planet.mass_kg * vehicle.mass_kg / (distance * distance);
        forces.gravity = -state.position.normalize() * magnitude;
    }

    let altitude = distance - planet.radius_m;
    let density = planet.atmospheric_density(altitude);
    let speed = state.velocity.abs();
    // Dynamic pressure is zero outside the atmosphere, which in turn zeroes
    // both aerodynamic components.
    let dynamic_pressure = 0.5 * density * speed * speed;

    if dynamic_pressure > 0.0 && speed >= EPS {
        let drag_magnitude =
            dynamic_pressure * vehicle.drag_coefficient * vehicle.reference_area_m2;
        forces.drag = -state.velocity.normalize() * drag_magnitude;

        let perpendicular = lift_hint.reject_from(&state.velocity);
        if perpendicular.abs() < EPS {
            warn!(
                "degenerate lift hint at t={:.3}: parallel to velocity, lift dropped",
                state.time_s
            );
        } else {
            let lift_direction =
                perpendicular.normalize().rotate_about(&state.velocity, controls.bank_angle_deg);
            let lift_magnitude =
                dynamic_pressure * vehicle.lift_coefficient * vehicle.reference_area_m2;
            forces.lift = lift_direction * lift_magnitude;
        }
    }

    // Thrust has no atmospheric gating.
    forces.thrust = controls.thrust_vector();

    forces
}
