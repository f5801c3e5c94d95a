use super::common::vec3d::Vec3D;
use super::physics::{self, ControlInputs};
use super::planet::PlanetModel;
use super::trajectory::{Sample, TrajectoryStore, VehicleState};
use super::vehicle::VehicleModel;
use crate::probe;
use crate::remote_compute::resilient::ResilientClient;
use std::ops::Range;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;

/// Regenerates the future portion of the working trajectory when the operator
/// changes bank angle mid-flight.
///
/// Modification policy: latest wins. Each request takes a monotonically
/// increasing sequence number and cancels any prior in-flight request; a
/// superseded request's eventual result is discarded at commit time instead
/// of being applied out of order. Forward Euler on the original time grid is
/// the canonical integration scheme; the remote modify endpoint is treated as
/// an approximation of it.
pub struct Resimulator {
    store: Arc<RwLock<TrajectoryStore>>,
    compute: Arc<ResilientClient>,
    planet: PlanetModel,
    vehicle: VehicleModel,
    seq: AtomicU64,
    inflight: Mutex<Option<CancellationToken>>,
}

impl Resimulator {
    pub fn new(
        store: Arc<RwLock<TrajectoryStore>>,
        compute: Arc<ResilientClient>,
        planet: PlanetModel,
        vehicle: VehicleModel,
    ) -> Self {
        Self {
            store,
            compute,
            planet,
            vehicle,
            seq: AtomicU64::new(0),
            inflight: Mutex::new(None),
        }
    }

    /// Applies a bank angle from `cutoff_time_s` onward and commits the
    /// re-integrated tail into the working trajectory.
    ///
    /// Samples before the cutoff are left untouched. A cutoff beyond the last
    /// sample is a no-op. Returns the replaced index range for the
    /// visualization layer to invalidate; an empty range means nothing was
    /// committed (no-op cutoff or superseded request).
    pub async fn apply_bank_angle(
        &self,
        cutoff_time_s: f64,
        lift_hint: Vec3D<f64>,
        bank_angle_deg: f64,
    ) -> Range<usize> {
        let snapshot: Vec<Sample> = {
            let store = self.store.read().await;
            if store.cut_index(cutoff_time_s).is_none() {
                let n = store.working().len();
                return n..n;
            }
            store.working().to_vec()
        };

        // Sequence assignment and token replacement happen under the same
        // lock, so token-replacement order always matches seq order and a
        // newer request can never be cancelled by an older one.
        let (seq, token) = {
            let mut inflight = self.inflight.lock().await;
            let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
            let token = CancellationToken::new();
            if let Some(prev) = inflight.replace(token.clone()) {
                prev.cancel();
            }
            (seq, token)
        };

        let outcome = tokio::select! {
            () = token.cancelled() => None,
            sourced = self.compute.modify_trajectory(
                cutoff_time_s,
                lift_hint,
                bank_angle_deg,
                &snapshot,
            ) => Some(sourced),
        };
        let Some(sourced) = outcome else {
            probe!("modification seq {seq} cancelled before completion");
            return 0..0;
        };

        let mut store = self.store.write().await;
        if self.seq.load(Ordering::SeqCst) != seq {
            probe!("discarding stale modification result (seq {seq})");
            return 0..0;
        }
        let (modified, range) = sourced.value;
        probe!(
            "committing modification seq {seq} from {} ({} samples, {} source)",
            range.start,
            range.len(),
            sourced.source
        );
        store.replace_tail(range.start, modified[range.start..].to_vec());
        range
    }
}

/// Re-simulates the future portion of a sample sequence with the given bank
/// angle. Pure and deterministic: no randomness, no wall-clock dependence.
///
/// # Arguments
/// * `samples` - The sequence whose tail is re-integrated.
/// * `cutoff_time_s` - Samples at or after this time are replaced.
/// * `planet`, `vehicle` - The models the physics engine integrates against.
/// * `lift_hint` - Lift direction hint forwarded to the physics engine.
/// * `bank_angle_deg` - Bank angle applied over the whole re-simulated tail.
///
/// # Returns
/// The modified sequence plus the replaced index range (empty when the cutoff
/// lies beyond the last sample).
pub fn resimulate(
    samples: &[Sample],
    cutoff_time_s: f64,
    planet: &PlanetModel,
    vehicle: &VehicleModel,
    lift_hint: &Vec3D<f64>,
    bank_angle_deg: f64,
) -> (Vec<Sample>, Range<usize>) {
    let cut = samples.partition_point(|s| s.time_s < cutoff_time_s);
    if cut >= samples.len() {
        return (samples.to_vec(), samples.len()..samples.len());
    }

    let mut modified = samples[..cut].to_vec();
    modified.extend(integrate_tail(samples, cut, planet, vehicle, lift_hint, bank_angle_deg));
    let range = cut..samples.len();
    (modified, range)
}

/// Forward-Euler integration of `samples[cut..]` on the original time grid,
/// seeded from `samples[cut]`.
fn integrate_tail(
    samples: &[Sample],
    cut: usize,
    planet: &PlanetModel,
    vehicle: &VehicleModel,
    lift_hint: &Vec3D<f64>,
    bank_angle_deg: f64,
) -> Vec<Sample> {
    let controls = ControlInputs::bank_only(bank_angle_deg);
    let mut position = samples[cut].position;
    let mut velocity = sample_velocity(samples, cut);

    let mut tail = Vec::with_capacity(samples.len() - cut);
    tail.push(Sample::new(samples[cut].time_s, position, Some(velocity)));

    for k in cut..samples.len() - 1 {
        let dt = samples[k + 1].time_s - samples[k].time_s;
        let state = VehicleState {
            time_s: samples[k].time_s,
            position,
            velocity,
            velocity_magnitude: velocity.abs(),
            altitude_m: position.abs() - planet.radius_m,
            distance_to_landing_m: 0.0,
        };
        let force = physics::compute_forces(&state, planet, vehicle, &controls, lift_hint);
        velocity = velocity + force.total() * (dt / vehicle.mass_kg);
        position = position + velocity * dt;
        tail.push(Sample::new(samples[k + 1].time_s, position, Some(velocity)));
    }
    tail
}

/// Velocity at one sample: the stored value when present, otherwise a finite
/// difference against the nearest neighbor.
pub(crate) fn sample_velocity(samples: &[Sample], i: usize) -> Vec3D<f64> {
    if let Some(v) = samples[i].velocity {
        return v;
    }
    if samples.len() < 2 {
        return Vec3D::zero();
    }
    if i + 1 < samples.len() {
        let dt = samples[i + 1].time_s - samples[i].time_s;
        (samples[i + 1].position - samples[i].position) / dt
    } else {
        let dt = samples[i].time_s - samples[i - 1].time_s;
        (samples[i].position - samples[i - 1].position) / dt
    }
}
