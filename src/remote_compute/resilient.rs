use super::http_client::HTTPClient;
use super::http_request::analyze_get::AnalyzeRequest;
use super::http_request::forces_post::ComputeForcesRequest;
use super::http_request::health_get::HealthRequest;
use super::http_request::high_fidelity_post::HighFidelityRequest;
use super::http_request::interpolate_get::InterpolateRequest;
use super::http_request::modify_post::ModifyTrajectoryRequest;
use super::http_request::request_common::{JSONBodyHTTPRequestType, NoBodyHTTPRequestType};
use super::http_request::trajectory_get::TrajectoryRequest;
use super::http_request::trajectory_list_get::TrajectoryListRequest;
use super::http_response::analyze::AnalysisReport;
use super::http_response::interpolate::InterpolateResponse;
use super::http_response::modify::ModifyTrajectoryResponse;
use super::http_response::response_common::ResponseError;
use super::http_response::trajectory::{TrajectoryMetadata, TrajectoryResponse};
use super::http_response::trajectory_list::{TrajectoryListEntry, TrajectoryListResponse};
use crate::entry_dynamics::common::math::ChannelAccumulator;
use crate::entry_dynamics::common::vec3d::Vec3D;
use crate::entry_dynamics::{
    self, ControlInputs, EntryInterface, ForceVector, PlanetModel, Sample, TrajectoryStore,
    VehicleModel, VehicleState,
};
use crate::{probe, warn};
use chrono::{DateTime, TimeDelta, Utc};
use itertools::Itertools;
use rand::Rng;
use std::collections::HashMap;
use std::future::Future;
use std::ops::Range;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use strum_macros::Display;
use tokio::sync::RwLock;

/// Bank angle assumed when a baseline has to be synthesized locally [deg].
const DEFAULT_BANK_ANGLE_DEG: f64 = 30.0;
/// Absolute tolerance for matching a remote time grid against ours [s].
const GRID_TOLERANCE_S: f64 = 1e-6;

/// Where a returned value came from. Callers must not branch on this beyond
/// observability: numeric behavior is identical regardless of source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ComputeSource {
    Cache,
    Remote,
    Local,
}

/// A computation result tagged with its origin.
#[derive(Debug, Clone)]
pub struct Sourced<T> {
    pub value: T,
    pub source: ComputeSource,
}

impl<T> Sourced<T> {
    const fn cache(value: T) -> Self { Self { value, source: ComputeSource::Cache } }
    const fn remote(value: T) -> Self { Self { value, source: ComputeSource::Remote } }
    const fn local(value: T) -> Self { Self { value, source: ComputeSource::Local } }
}

/// Shared availability bookkeeping for the remote service. Initialized
/// optimistic; flipped by failed calls and probes, flipped back by successes.
#[derive(Debug, Clone, Copy)]
pub struct AvailabilityState {
    pub is_available: bool,
    pub last_checked_at: DateTime<Utc>,
    pub consecutive_failures: u32,
}

impl AvailabilityState {
    fn optimistic() -> Self {
        Self { is_available: true, last_checked_at: Utc::now(), consecutive_failures: 0 }
    }
}

/// Read-only diagnostics snapshot for UI panels; non-authoritative for
/// behavior.
#[derive(Debug, Clone, Copy)]
pub struct BackendStatus {
    pub availability: AvailabilityState,
    pub remote_attempts: u64,
    pub local_fallbacks: u64,
    pub cached_entries: usize,
}

/// Tuning knobs for the resilient client, overridable from the environment.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    /// Remote attempts per call before falling back (total, not extra retries).
    pub retry_attempts: u32,
    /// First backoff delay; doubles per attempt, plus jitter.
    pub backoff_base: Duration,
    pub cache_ttl: TimeDelta,
    pub probe_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3010".to_string(),
            timeout: Duration::from_secs(5),
            retry_attempts: 3,
            backoff_base: Duration::from_millis(250),
            cache_ttl: TimeDelta::seconds(60),
            probe_interval: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    /// Builds a config from `SIM_BASE_URL`, `EDL_TIMEOUT_S`,
    /// `EDL_RETRY_ATTEMPTS`, `EDL_CACHE_TTL_S` and `EDL_PROBE_INTERVAL_S`,
    /// falling back to defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("SIM_BASE_URL") {
            config.base_url = url;
        }
        if let Some(secs) = env_u64("EDL_TIMEOUT_S") {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(attempts) = env_u64("EDL_RETRY_ATTEMPTS") {
            #[allow(clippy::cast_possible_truncation)]
            {
                config.retry_attempts = (attempts as u32).max(1);
            }
        }
        if let Some(secs) = env_u64("EDL_CACHE_TTL_S") {
            config.cache_ttl = TimeDelta::seconds(i64::try_from(secs).unwrap_or(60));
        }
        if let Some(secs) = env_u64("EDL_PROBE_INTERVAL_S") {
            config.probe_interval = Duration::from_secs(secs);
        }
        config
    }
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

/// One cached remote result; expires `ttl` after `stored_at` and is evicted
/// lazily on lookup.
#[derive(Debug, Clone)]
pub(crate) struct CacheEntry {
    value: CachedValue,
    stored_at: DateTime<Utc>,
    ttl: TimeDelta,
}

impl CacheEntry {
    pub(crate) fn new(value: CachedValue, stored_at: DateTime<Utc>, ttl: TimeDelta) -> Self {
        Self { value, stored_at, ttl }
    }

    pub(crate) fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now - self.stored_at > self.ttl
    }
}

/// Typed union of everything the cache can hold.
#[derive(Debug, Clone)]
pub(crate) enum CachedValue {
    List(TrajectoryListResponse),
    Trajectory(TrajectoryResponse),
    Interpolated(InterpolateResponse),
    Analysis(AnalysisReport),
    Forces(ForceVector),
    Modified(ModifyTrajectoryResponse),
    Simulated(Vec<Sample>),
}

/// Uniform wrapper around every remote computation: cache lookup, availability
/// gate, bounded retries with exponential backoff, then transparent fallback
/// to the equivalent local computation.
///
/// This is the only place that talks to the remote service and the only owner
/// of the response cache and the shared [`AvailabilityState`].
pub struct ResilientClient {
    http: Arc<HTTPClient>,
    config: ClientConfig,
    planet: PlanetModel,
    vehicle: VehicleModel,
    /// Local fallback source for trajectory fetch/interpolate/analyze.
    store: Arc<RwLock<TrajectoryStore>>,
    cache: RwLock<HashMap<String, CacheEntry>>,
    availability: RwLock<AvailabilityState>,
    remote_attempts: AtomicU64,
    local_fallbacks: AtomicU64,
}

impl ResilientClient {
    pub fn new(
        http: Arc<HTTPClient>,
        store: Arc<RwLock<TrajectoryStore>>,
        planet: PlanetModel,
        vehicle: VehicleModel,
        config: ClientConfig,
    ) -> Self {
        Self {
            http,
            config,
            planet,
            vehicle,
            store,
            cache: RwLock::new(HashMap::new()),
            availability: RwLock::new(AvailabilityState::optimistic()),
            remote_attempts: AtomicU64::new(0),
            local_fallbacks: AtomicU64::new(0),
        }
    }

    pub async fn availability(&self) -> AvailabilityState { *self.availability.read().await }

    pub async fn status(&self) -> BackendStatus {
        BackendStatus {
            availability: self.availability().await,
            remote_attempts: self.remote_attempts.load(Ordering::Relaxed),
            local_fallbacks: self.local_fallbacks.load(Ordering::Relaxed),
            cached_entries: self.cache.read().await.len(),
        }
    }

    /// Lists the trajectories the service can serve; locally this degrades to
    /// the single loaded baseline.
    pub async fn list_trajectories(&self) -> Sourced<TrajectoryListResponse> {
        let key = "list".to_string();
        if let Some(CachedValue::List(list)) = self.cache_lookup(&key).await {
            return Sourced::cache(list);
        }
        let request = TrajectoryListRequest {};
        if let Some(list) = self.try_remote("list", || request.send_request(&self.http)).await {
            self.cache_store(key, CachedValue::List(list.clone())).await;
            return Sourced::remote(list);
        }
        self.count_fallback("list");
        let store = self.store.read().await;
        let trajectories = if store.is_loaded() {
            vec![TrajectoryListEntry {
                id: "local-baseline".to_string(),
                size: store.baseline().len(),
                modified_at: Utc::now(),
            }]
        } else {
            Vec::new()
        };
        Sourced::local(TrajectoryListResponse { trajectories })
    }

    /// Fetches a trajectory by id, optionally a `limit`/`offset` page of it.
    /// Falls back to the previously loaded baseline, or to a synthetic
    /// propagated entry when nothing was loaded yet.
    pub async fn fetch_trajectory(
        &self,
        id: &str,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Sourced<TrajectoryResponse> {
        let key = format!("fetch:{id}:{limit:?}:{offset:?}");
        if let Some(CachedValue::Trajectory(t)) = self.cache_lookup(&key).await {
            return Sourced::cache(t);
        }
        let request = TrajectoryRequest { id: id.to_string(), limit, offset };
        if let Some(t) = self.try_remote("fetch", || request.send_request(&self.http)).await {
            self.cache_store(key, CachedValue::Trajectory(t.clone())).await;
            return Sourced::remote(t);
        }
        self.count_fallback("fetch");
        Sourced::local(self.local_fetch(limit, offset).await)
    }

    /// Interpolated position at one time point; locally answered from the
    /// committed working trajectory.
    pub async fn interpolate(&self, id: &str, time_s: f64) -> Sourced<InterpolateResponse> {
        let key = format!("interp:{id}:{}", canon(time_s));
        if let Some(CachedValue::Interpolated(r)) = self.cache_lookup(&key).await {
            return Sourced::cache(r);
        }
        let request = InterpolateRequest { id: id.to_string(), time_s };
        if let Some(r) = self.try_remote("interpolate", || request.send_request(&self.http)).await {
            self.cache_store(key, CachedValue::Interpolated(r.clone())).await;
            return Sourced::remote(r);
        }
        self.count_fallback("interpolate");
        let store = self.store.read().await;
        let state = store.state_at_time(time_s);
        let (before, after) = store.bracketing_samples(time_s).unwrap_or((
            Sample::new(time_s, state.position, None),
            Sample::new(time_s, state.position, None),
        ));
        Sourced::local(InterpolateResponse {
            time_s: state.time_s,
            interpolated_position: state.position,
            before,
            after,
        })
    }

    /// Aggregate statistics over a trajectory window.
    pub async fn analyze(
        &self,
        id: &str,
        start_time_s: Option<f64>,
        end_time_s: Option<f64>,
    ) -> Sourced<AnalysisReport> {
        let key = format!(
            "analyze:{id}:{}:{}",
            start_time_s.map_or_else(|| "-".to_string(), canon),
            end_time_s.map_or_else(|| "-".to_string(), canon),
        );
        if let Some(CachedValue::Analysis(report)) = self.cache_lookup(&key).await {
            return Sourced::cache(report);
        }
        let request = AnalyzeRequest { id: id.to_string(), start_time_s, end_time_s };
        if let Some(report) = self.try_remote("analyze", || request.send_request(&self.http)).await {
            self.cache_store(key, CachedValue::Analysis(report)).await;
            return Sourced::remote(report);
        }
        self.count_fallback("analyze");
        let store = self.store.read().await;
        let window: Vec<Sample> = store
            .working()
            .iter()
            .filter(|s| {
                start_time_s.is_none_or(|t| s.time_s >= t)
                    && end_time_s.is_none_or(|t| s.time_s <= t)
            })
            .copied()
            .collect();
        Sourced::local(analyze_samples(&window, &self.planet))
    }

    /// One remote force evaluation, falling back to the local physics engine.
    /// The local and remote paths are numerically interchangeable.
    pub async fn compute_forces(
        &self,
        state: &VehicleState,
        controls: &ControlInputs,
        lift_hint: &Vec3D<f64>,
    ) -> Sourced<ForceVector> {
        let key = format!(
            "forces:{}:{}:{}:{}:{}",
            canon(state.time_s),
            canon_vec(&state.position),
            canon_vec(&state.velocity),
            canon(controls.bank_angle_deg),
            canon_vec(lift_hint),
        );
        if let Some(CachedValue::Forces(f)) = self.cache_lookup(&key).await {
            return Sourced::cache(f);
        }
        let request = ComputeForcesRequest {
            state: *state,
            planet: self.planet,
            vehicle: self.vehicle,
            controls: *controls,
            lift_direction: *lift_hint,
        };
        if let Some(r) = self.try_remote("forces", || request.send_request(&self.http)).await {
            self.cache_store(key, CachedValue::Forces(r.forces)).await;
            return Sourced::remote(r.forces);
        }
        self.count_fallback("forces");
        Sourced::local(entry_dynamics::compute_forces(
            state,
            &self.planet,
            &self.vehicle,
            controls,
            lift_hint,
        ))
    }

    /// Bank-angle modification of a trajectory tail. The remote result is
    /// only accepted when it preserves our time grid; anything else is
    /// treated as a failure and the canonical local re-simulation runs
    /// instead.
    pub async fn modify_trajectory(
        &self,
        cutoff_time_s: f64,
        lift_hint: Vec3D<f64>,
        bank_angle_deg: f64,
        trajectory: &[Sample],
    ) -> Sourced<(Vec<Sample>, Range<usize>)> {
        let cut = trajectory.partition_point(|s| s.time_s < cutoff_time_s);
        if cut >= trajectory.len() {
            return Sourced::local((trajectory.to_vec(), trajectory.len()..trajectory.len()));
        }
        let seed = &trajectory[cut];
        let key = format!(
            "modify:{}:{}:{}:{}:{}:{}",
            canon(cutoff_time_s),
            canon(bank_angle_deg),
            canon_vec(&lift_hint),
            trajectory.len(),
            canon(seed.time_s),
            canon_vec(&seed.position),
        );
        if let Some(CachedValue::Modified(m)) = self.cache_lookup(&key).await {
            return Sourced::cache((m.trajectory, cut..trajectory.len()));
        }
        let request = ModifyTrajectoryRequest {
            cutoff_time_s,
            bank_angle_deg,
            lift_direction: lift_hint,
            trajectory: trajectory.to_vec(),
        };
        if let Some(m) = self.try_remote("modify", || request.send_request(&self.http)).await {
            if grid_matches(&m.trajectory, trajectory) {
                self.cache_store(key, CachedValue::Modified(m.clone())).await;
                return Sourced::remote((m.trajectory, cut..trajectory.len()));
            }
            warn!("remote modification returned a foreign time grid, using local re-simulation");
        }
        self.count_fallback("modify");
        let (modified, range) = entry_dynamics::resimulate(
            trajectory,
            cutoff_time_s,
            &self.planet,
            &self.vehicle,
            &lift_hint,
            bank_angle_deg,
        );
        Sourced::local((modified, range))
    }

    /// Full entry simulation from interface conditions, falling back to the
    /// local RK4 propagator.
    pub async fn high_fidelity(
        &self,
        interface: &EntryInterface,
        bank_angle_deg: f64,
        dt_s: f64,
    ) -> Sourced<Vec<Sample>> {
        let key = format!(
            "highfi:{}:{}:{}:{}",
            canon(interface.altitude_m),
            canon(interface.velocity_m_s),
            canon(bank_angle_deg),
            canon(dt_s),
        );
        if let Some(CachedValue::Simulated(samples)) = self.cache_lookup(&key).await {
            return Sourced::cache(samples);
        }
        let request = HighFidelityRequest {
            planet_name: self.planet.name.to_string(),
            vehicle_name: self.vehicle.name.to_string(),
            interface: *interface,
            bank_angle_deg,
            dt_s,
        };
        if let Some(r) = self.try_remote("high-fidelity", || request.send_request(&self.http)).await
        {
            let samples = r.into_samples();
            self.cache_store(key, CachedValue::Simulated(samples.clone())).await;
            return Sourced::remote(samples);
        }
        self.count_fallback("high-fidelity");
        Sourced::local(entry_dynamics::propagate_entry(
            &self.planet,
            &self.vehicle,
            interface,
            bank_angle_deg,
            dt_s,
        ))
    }

    /// One best-effort health check. A single attempt, no retries; flips the
    /// availability state in either direction.
    pub async fn health_probe(&self) -> bool {
        self.remote_attempts.fetch_add(1, Ordering::Relaxed);
        match (HealthRequest {}.send_request(&self.http)).await {
            Ok(health) if health.is_healthy() => {
                self.mark_available().await;
                true
            }
            Ok(health) => {
                probe!("service reports status '{}', keeping unavailable", health.status);
                self.mark_unavailable().await;
                false
            }
            Err(e) => {
                probe!("health probe failed: {e}");
                self.mark_unavailable().await;
                false
            }
        }
    }

    /// Spawns the periodic health probe loop. Runs until the returned handle
    /// is aborted or the runtime shuts down.
    pub fn spawn_health_probe(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let client = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(client.config.probe_interval).await;
                let healthy = client.health_probe().await;
                probe!("periodic health probe: healthy={healthy}");
            }
        })
    }

    /// The uniform remote attempt: availability gate, then up to
    /// `retry_attempts` tries with exponential backoff and jitter. Returns
    /// `None` when the remote path is skipped or exhausted, after flipping
    /// the availability state.
    async fn try_remote<T, F, Fut>(&self, op: &str, call: F) -> Option<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, ResponseError>>,
    {
        if !self.availability.read().await.is_available {
            probe!("{op}: service marked unavailable, using local path");
            return None;
        }
        for attempt in 0..self.config.retry_attempts {
            self.remote_attempts.fetch_add(1, Ordering::Relaxed);
            match call().await {
                Ok(value) => {
                    self.mark_available().await;
                    return Some(value);
                }
                Err(e) => {
                    warn!("{op}: remote attempt {} failed: {e}", attempt + 1);
                    if attempt + 1 < self.config.retry_attempts {
                        tokio::time::sleep(self.backoff_delay(attempt)).await;
                    }
                }
            }
        }
        self.mark_unavailable().await;
        None
    }

    fn backoff_delay(&self, attempt: u32) -> Duration {
        let backoff = self.config.backoff_base * 2_u32.saturating_pow(attempt);
        #[allow(clippy::cast_possible_truncation)]
        let jitter_cap = (backoff.as_millis() as u64 / 2).max(1);
        backoff + Duration::from_millis(rand::rng().random_range(0..=jitter_cap))
    }

    async fn mark_available(&self) {
        let mut availability = self.availability.write().await;
        availability.is_available = true;
        availability.last_checked_at = Utc::now();
        availability.consecutive_failures = 0;
    }

    pub(crate) async fn mark_unavailable(&self) {
        let mut availability = self.availability.write().await;
        availability.is_available = false;
        availability.last_checked_at = Utc::now();
        availability.consecutive_failures += 1;
    }

    async fn cache_lookup(&self, key: &str) -> Option<CachedValue> {
        let now = Utc::now();
        let mut cache = self.cache.write().await;
        match cache.get(key) {
            Some(entry) if entry.is_expired_at(now) => {
                cache.remove(key);
                probe!("cache entry '{key}' expired");
                None
            }
            Some(entry) => Some(entry.value.clone()),
            None => None,
        }
    }

    async fn cache_store(&self, key: String, value: CachedValue) {
        let entry = CacheEntry::new(value, Utc::now(), self.config.cache_ttl);
        self.cache.write().await.insert(key, entry);
    }

    fn count_fallback(&self, op: &str) {
        self.local_fallbacks.fetch_add(1, Ordering::Relaxed);
        probe!("{op}: answered locally");
    }

    async fn local_fetch(&self, limit: Option<usize>, offset: Option<usize>) -> TrajectoryResponse {
        let samples: Vec<Sample> = {
            let store = self.store.read().await;
            if store.is_loaded() {
                store.baseline().to_vec()
            } else {
                probe!("no baseline loaded, propagating a synthetic entry");
                entry_dynamics::propagate_entry(
                    &self.planet,
                    &self.vehicle,
                    &EntryInterface::default(),
                    DEFAULT_BANK_ANGLE_DEG,
                    entry_dynamics::DEFAULT_DT_S,
                )
            }
        };
        let total = samples.len();
        let start = offset.unwrap_or(0).min(total);
        let end = limit.map_or(total, |l| start.saturating_add(l).min(total));
        let points = samples[start..end].to_vec();
        TrajectoryResponse {
            id: "local-baseline".to_string(),
            total_points: total,
            metadata: metadata_of(&points, &self.planet),
            points,
        }
    }
}

/// Canonical text form of a parameter for cache keying.
pub(crate) fn canon(v: f64) -> String { format!("{v:.9e}") }

pub(crate) fn canon_vec(v: &Vec3D<f64>) -> String {
    format!("{},{},{}", canon(v.x()), canon(v.y()), canon(v.z()))
}

/// Checks that two sample sequences share the same time grid.
pub(crate) fn grid_matches(a: &[Sample], b: &[Sample]) -> bool {
    a.len() == b.len()
        && a.iter().zip(b).all(|(x, y)| (x.time_s - y.time_s).abs() <= GRID_TOLERANCE_S)
}

/// Descriptive metadata over a sample page.
pub(crate) fn metadata_of(samples: &[Sample], planet: &PlanetModel) -> TrajectoryMetadata {
    let mut altitude = ChannelAccumulator::new();
    for s in samples {
        altitude.push(s.position.abs() - planet.radius_m);
    }
    let (alt_min, alt_max, _) = altitude.finish().unwrap_or((0.0, 0.0, 0.0));
    let time_range = match samples {
        [] => (0.0, 0.0),
        [first, .., last] => (first.time_s, last.time_s),
        [only] => (only.time_s, only.time_s),
    };
    TrajectoryMetadata {
        point_count: samples.len(),
        time_range,
        altitude_range: (alt_min, alt_max),
        duration_s: time_range.1 - time_range.0,
    }
}

/// Locally computed counterpart of the remote analysis endpoint.
pub(crate) fn analyze_samples(samples: &[Sample], planet: &PlanetModel) -> AnalysisReport {
    let metadata = metadata_of(samples, planet);
    let velocities: Vec<Vec3D<f64>> =
        (0..samples.len()).map(|i| entry_dynamics::sample_velocity(samples, i)).collect();

    let mut velocity = ChannelAccumulator::new();
    for v in &velocities {
        velocity.push(v.abs());
    }
    let mut acceleration = ChannelAccumulator::new();
    for ((ta, va), (tb, vb)) in
        samples.iter().map(|s| s.time_s).zip(velocities.iter().copied()).tuple_windows()
    {
        acceleration.push(((vb - va) / (tb - ta)).abs());
    }

    AnalysisReport {
        point_count: metadata.point_count,
        time_range: metadata.time_range,
        altitude_range: metadata.altitude_range,
        velocity: velocity.finish().unwrap_or((0.0, 0.0, 0.0)).into(),
        acceleration: acceleration.finish().unwrap_or((0.0, 0.0, 0.0)).into(),
    }
}
