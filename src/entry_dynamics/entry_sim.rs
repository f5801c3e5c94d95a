use super::common::vec3d::Vec3D;
use super::planet::PlanetModel;
use super::trajectory::Sample;
use super::vehicle::VehicleModel;

/// Parachute-deploy altitude terminating the propagation [m] (Li & Jiang 2014, MSL).
pub const PARACHUTE_DEPLOY_ALTITUDE_M: f64 = 6_500.0;
/// Hard time limit on one propagation [s].
pub const TIME_LIMIT_S: f64 = 1_000.0;
/// Default integration step [s].
pub const DEFAULT_DT_S: f64 = 0.1;

/// Entry-interface conditions in spherical coordinates.
///
/// Defaults are the MSL reference case: SPICE J2000 initial position, entry
/// velocity 6.0836 km/s, flight path angle -15.5 deg.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EntryInterface {
    /// Altitude at which entry starts [m].
    pub altitude_m: f64,
    /// Inertial velocity magnitude [m/s].
    pub velocity_m_s: f64,
    /// Longitude [rad].
    pub longitude_rad: f64,
    /// Latitude [rad].
    pub latitude_rad: f64,
    /// Flight path angle [rad], negative on entry.
    pub flight_path_angle_rad: f64,
    /// Heading angle [rad].
    pub heading_rad: f64,
}

impl Default for EntryInterface {
    fn default() -> Self {
        Self {
            altitude_m: 124_999.0,
            velocity_m_s: 6_083.6,
            longitude_rad: (-78.8618_f64).to_radians(),
            latitude_rad: 27.1050_f64.to_radians(),
            flight_path_angle_rad: (-15.5_f64).to_radians(),
            heading_rad: 0.0,
        }
    }
}

/// Planar-entry state: [radius, longitude, latitude, velocity, flight path
/// angle, heading].
type EntryState = [f64; 6];

/// Vinh's hypersonic entry equations of motion.
/// Ref: Vinh, "Hypersonic and Planetary Entry Flight Mechanics".
fn entry_eoms(
    x: &EntryState,
    planet: &PlanetModel,
    vehicle: &VehicleModel,
    bank_rad: f64,
) -> EntryState {
    let [r, _theta, phi, v, gamma, psi] = *x;

    let mu = planet.mu();
    let beta = vehicle.ballistic_coefficient();
    let ld = vehicle.lift_to_drag();
    let rho = planet.atmospheric_density(r - planet.radius_m);

    // Kinematics
    let raddot = v * gamma.sin();
    let thetadot = v * gamma.cos() * psi.cos() / (r * phi.cos());
    let phidot = v * gamma.cos() * psi.sin() / r;

    // Dynamics
    let veldot = -rho * v * v / (2.0 * beta) - mu * gamma.sin() / (r * r);
    let gammadot = v * gamma.cos() / r + rho * v * ld * bank_rad.cos() / (2.0 * beta)
        - mu * gamma.cos() / (v * r * r);
    let psidot = rho * v * ld * bank_rad.sin() / (2.0 * beta * gamma.cos())
        - v * gamma.cos() * psi.cos() * phi.tan() / r;

    [raddot, thetadot, phidot, veldot, gammadot, psidot]
}

fn rk4_step(
    x: &EntryState,
    dt: f64,
    planet: &PlanetModel,
    vehicle: &VehicleModel,
    bank_rad: f64,
) -> EntryState {
    let advance = |x: &EntryState, k: &EntryState, h: f64| -> EntryState {
        std::array::from_fn(|i| x[i] + k[i] * h)
    };
    let k1 = entry_eoms(x, planet, vehicle, bank_rad);
    let k2 = entry_eoms(&advance(x, &k1, dt / 2.0), planet, vehicle, bank_rad);
    let k3 = entry_eoms(&advance(x, &k2, dt / 2.0), planet, vehicle, bank_rad);
    let k4 = entry_eoms(&advance(x, &k3, dt), planet, vehicle, bank_rad);
    std::array::from_fn(|i| x[i] + (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]) * dt / 6.0)
}

/// Propagates an entry trajectory from interface conditions down to parachute
/// deploy with fixed-step RK4, then converts the spherical states to
/// planet-centered inertial Cartesian samples.
///
/// Local equivalent of the remote high-fidelity simulation; also the baseline
/// generator when the remote service is unreachable at startup.
///
/// # Arguments
/// * `planet`, `vehicle` - Models to integrate against.
/// * `interface` - Entry-interface conditions.
/// * `bank_angle_deg` - Constant bank angle over the whole entry.
/// * `dt_s` - Integration and output time step [s].
///
/// # Returns
/// Time-ordered samples with central-difference velocities. The first and
/// last grid points are trimmed because their one-sided velocity estimates
/// are an order less accurate.
pub fn propagate_entry(
    planet: &PlanetModel,
    vehicle: &VehicleModel,
    interface: &EntryInterface,
    bank_angle_deg: f64,
    dt_s: f64,
) -> Vec<Sample> {
    let bank_rad = bank_angle_deg.to_radians();
    let mut x: EntryState = [
        planet.radius_m + interface.altitude_m,
        interface.longitude_rad,
        interface.latitude_rad,
        interface.velocity_m_s,
        interface.flight_path_angle_rad,
        interface.heading_rad,
    ];

    let mut times = vec![0.0];
    let mut states = vec![x];
    let mut t = 0.0;
    while x[0] - planet.radius_m > PARACHUTE_DEPLOY_ALTITUDE_M && t < TIME_LIMIT_S {
        x = rk4_step(&x, dt_s, planet, vehicle, bank_rad);
        t += dt_s;
        times.push(t);
        states.push(x);
    }

    let positions: Vec<Vec3D<f64>> = states.iter().map(|s| spherical_to_inertial(s)).collect();
    let velocities = central_difference(&positions, dt_s);

    // Drop both endpoints together with their one-sided velocity estimates.
    let n = positions.len();
    if n < 3 {
        return Vec::new();
    }
    (1..n - 1)
        .map(|i| Sample::new(times[i], positions[i], Some(velocities[i])))
        .collect()
}

/// Converts one spherical entry state to a planet-centered inertial position.
fn spherical_to_inertial(x: &EntryState) -> Vec3D<f64> {
    let [r, theta, phi, ..] = *x;
    let co_latitude = std::f64::consts::FRAC_PI_2 - phi;
    Vec3D::new(
        r * co_latitude.sin() * theta.cos(),
        r * co_latitude.sin() * theta.sin(),
        r * co_latitude.cos(),
    )
}

/// Central-difference velocities over an evenly spaced position grid, with
/// one-sided differences at the endpoints.
fn central_difference(positions: &[Vec3D<f64>], dt: f64) -> Vec<Vec3D<f64>> {
    let n = positions.len();
    let mut velocities = vec![Vec3D::zero(); n];
    if n < 2 {
        return velocities;
    }
    for i in 1..n - 1 {
        velocities[i] = (positions[i + 1] - positions[i - 1]) / (2.0 * dt);
    }
    velocities[0] = (positions[1] - positions[0]) / dt;
    velocities[n - 1] = (positions[n - 1] - positions[n - 2]) / dt;
    velocities
}
