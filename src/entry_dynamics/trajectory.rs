use super::common::math;
use super::common::vec3d::Vec3D;
use super::planet::PlanetModel;
use crate::warn;
use strum_macros::Display;

/// One time-stamped record of a trajectory: position in the planet-centered
/// inertial frame [m], optionally with a stored velocity [m/s].
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Sample {
    pub time_s: f64,
    pub position: Vec3D<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub velocity: Option<Vec3D<f64>>,
}

impl Sample {
    pub const fn new(time_s: f64, position: Vec3D<f64>, velocity: Option<Vec3D<f64>>) -> Self {
        Self { time_s, position, velocity }
    }
}

/// Vehicle state derived on demand by interpolation; never stored.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VehicleState {
    pub time_s: f64,
    pub position: Vec3D<f64>,
    pub velocity: Vec3D<f64>,
    pub velocity_magnitude: f64,
    pub altitude_m: f64,
    pub distance_to_landing_m: f64,
}

/// Malformed or insufficient trajectory input. Fatal to `load`, surfaced to
/// the caller and never retried.
#[derive(Debug, Display)]
pub enum DataError {
    #[strum(to_string = "trajectory needs at least 2 samples, got {0}")]
    TooFewSamples(usize),
    #[strum(to_string = "sample times not strictly increasing at index {0}")]
    NonMonotonicTime(usize),
}

impl std::error::Error for DataError {}

/// Exclusive owner of the `baseline` and `working` trajectories.
///
/// `baseline` is loaded once and never mutated afterwards; `working` is the
/// displayed trajectory and changes only through [`TrajectoryStore::reset`]
/// or the re-simulator's tail replacement.
#[derive(Debug)]
pub struct TrajectoryStore {
    planet: PlanetModel,
    landing_site: Vec3D<f64>,
    baseline: Vec<Sample>,
    working: Vec<Sample>,
}

impl TrajectoryStore {
    pub fn new(planet: PlanetModel) -> Self {
        Self {
            planet,
            landing_site: Vec3D::zero(),
            baseline: Vec::new(),
            working: Vec::new(),
        }
    }

    /// Loads a baseline sample sequence, replacing both `baseline` and
    /// `working` with copies of it. The landing site is pinned to the last
    /// baseline position.
    ///
    /// # Errors
    /// [`DataError`] when the sequence has fewer than 2 samples or its times
    /// are not strictly increasing.
    pub fn load(&mut self, samples: Vec<Sample>) -> Result<(), DataError> {
        validate(&samples)?;
        self.landing_site = samples[samples.len() - 1].position;
        self.working = samples.clone();
        self.baseline = samples;
        Ok(())
    }

    pub fn is_loaded(&self) -> bool { !self.baseline.is_empty() }

    pub fn planet(&self) -> &PlanetModel { &self.planet }

    pub fn baseline(&self) -> &[Sample] { &self.baseline }

    pub fn working(&self) -> &[Sample] { &self.working }

    /// Discards all re-simulated modifications: `working := copy(baseline)`.
    pub fn reset(&mut self) { self.working = self.baseline.clone(); }

    /// Replaces samples `[start, n)` of `working` with a freshly integrated
    /// tail. Only the re-simulator calls this.
    pub(crate) fn replace_tail(&mut self, start: usize, tail: Vec<Sample>) {
        self.working.truncate(start);
        self.working.extend(tail);
    }

    /// Interpolated vehicle state at time `t`.
    ///
    /// `t` is clamped to the working time range; out-of-range queries return
    /// the boundary state rather than extrapolating. Never fails: an empty
    /// store yields an all-zero state (logged once per query).
    pub fn state_at_time(&self, t: f64) -> VehicleState {
        if self.working.len() < 2 {
            warn!("state query at t={t:.3} before a trajectory was loaded");
            return VehicleState {
                time_s: t,
                position: Vec3D::zero(),
                velocity: Vec3D::zero(),
                velocity_magnitude: 0.0,
                altitude_m: 0.0,
                distance_to_landing_m: 0.0,
            };
        }
        let (lo, hi, f) = self.bracket(t);
        let a = &self.working[lo];
        let b = &self.working[hi];
        let position = a.position + (b.position - a.position) * f;
        let velocity = self.velocity_between(lo, hi, f);
        let clamped_t = t.clamp(self.working[0].time_s, self.working[self.working.len() - 1].time_s);
        VehicleState {
            time_s: clamped_t,
            position,
            velocity,
            velocity_magnitude: velocity.abs(),
            altitude_m: position.abs() - self.planet.radius_m,
            distance_to_landing_m: position.euclid_distance(&self.landing_site),
        }
    }

    /// Interpolated velocity vector at time `t`, with the same bracketing and
    /// clamping rules as [`TrajectoryStore::state_at_time`].
    pub fn velocity_at_time(&self, t: f64) -> Vec3D<f64> {
        if self.working.len() < 2 {
            return Vec3D::zero();
        }
        let (lo, hi, f) = self.bracket(t);
        self.velocity_between(lo, hi, f)
    }

    /// Index of the first working sample with `time >= cutoff`, or `None`
    /// when the cutoff lies beyond the last sample.
    pub fn cut_index(&self, cutoff_time_s: f64) -> Option<usize> {
        let i = self.working.partition_point(|s| s.time_s < cutoff_time_s);
        (i < self.working.len()).then_some(i)
    }

    /// The two samples bracketing `t` after clamping, or `None` when the
    /// store is not loaded yet.
    pub fn bracketing_samples(&self, t: f64) -> Option<(Sample, Sample)> {
        if self.working.len() < 2 {
            return None;
        }
        let (lo, hi, _) = self.bracket(t);
        Some((self.working[lo], self.working[hi]))
    }

    /// Locates the bracketing pair around `t` via binary search and the
    /// fractional interpolation factor between the two.
    fn bracket(&self, t: f64) -> (usize, usize, f64) {
        let n = self.working.len();
        let t = t.clamp(self.working[0].time_s, self.working[n - 1].time_s);
        let hi = self.working.partition_point(|s| s.time_s < t).clamp(1, n - 1);
        let lo = hi - 1;
        let f = math::normalize(t, self.working[lo].time_s, self.working[hi].time_s)
            .unwrap_or(0.0)
            .clamp(0.0, 1.0);
        (lo, hi, f)
    }

    /// Velocity between two bracketing samples: stored velocities interpolated
    /// when both ends carry one, otherwise the finite difference of the
    /// bracketing positions.
    fn velocity_between(&self, lo: usize, hi: usize, f: f64) -> Vec3D<f64> {
        let a = &self.working[lo];
        let b = &self.working[hi];
        match (a.velocity, b.velocity) {
            (Some(va), Some(vb)) => va + (vb - va) * f,
            // Strict time monotonicity guarantees a nonzero denominator.
            _ => (b.position - a.position) / (b.time_s - a.time_s),
        }
    }
}

/// Checks the `load` precondition: at least two samples, strictly increasing
/// timestamps.
pub fn validate(samples: &[Sample]) -> Result<(), DataError> {
    if samples.len() < 2 {
        return Err(DataError::TooFewSamples(samples.len()));
    }
    for (i, pair) in samples.windows(2).enumerate() {
        if pair[1].time_s <= pair[0].time_s {
            return Err(DataError::NonMonotonicTime(i + 1));
        }
    }
    Ok(())
}
