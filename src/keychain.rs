use crate::entry_dynamics::common::vec3d::Vec3D;
use crate::entry_dynamics::{
    DataError, PlanetModel, Resimulator, TrajectoryStore, VehicleModel, VehicleState,
};
use crate::remote_compute::http_client::HTTPClient;
use crate::remote_compute::resilient::{
    BackendStatus, ClientConfig, ComputeSource, ResilientClient,
};
use std::ops::Range;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Struct representing the key components of the trajectory subsystem,
/// bundled for the visualization layer: the HTTP client, the resilient
/// compute client, the trajectory store and the re-simulator.
///
/// Per-frame state queries are answered locally from the latest committed
/// working trajectory and never wait on an in-flight remote call; the
/// resilient client is consulted for loads, force evaluations and
/// modifications.
#[derive(Clone)]
pub struct Keychain {
    /// The HTTP client for performing network requests.
    client: Arc<HTTPClient>,
    /// The resilient remote-compute client.
    compute: Arc<ResilientClient>,
    /// Exclusive owner of the baseline and working trajectories.
    store: Arc<RwLock<TrajectoryStore>>,
    /// The bank-angle re-simulator.
    resim: Arc<Resimulator>,
}

impl Keychain {
    /// Creates a new instance of `Keychain` for one planet/vehicle pairing.
    ///
    /// # Arguments
    /// - `planet`, `vehicle`: The models every computation runs against.
    /// - `config`: Remote-client tuning (base URL, timeout, retries, TTL).
    ///
    /// # Returns
    /// A new instance of `Keychain` containing initialized subsystems.
    pub fn new(planet: PlanetModel, vehicle: VehicleModel, config: ClientConfig) -> Self {
        let client = Arc::new(HTTPClient::new(&config.base_url, config.timeout));
        let store = Arc::new(RwLock::new(TrajectoryStore::new(planet)));
        let compute = Arc::new(ResilientClient::new(
            Arc::clone(&client),
            Arc::clone(&store),
            planet,
            vehicle,
            config,
        ));
        let resim =
            Arc::new(Resimulator::new(Arc::clone(&store), Arc::clone(&compute), planet, vehicle));
        Self { client, compute, store, resim }
    }

    /// Provides a cloned reference to the HTTP client.
    pub fn client(&self) -> Arc<HTTPClient> { Arc::clone(&self.client) }

    /// Provides a cloned reference to the resilient compute client.
    pub fn compute(&self) -> Arc<ResilientClient> { Arc::clone(&self.compute) }

    /// Provides a cloned reference to the trajectory store.
    pub fn store(&self) -> Arc<RwLock<TrajectoryStore>> { Arc::clone(&self.store) }

    /// Fetches the baseline trajectory (remote-first, local fallback) and
    /// loads it into the store.
    ///
    /// # Errors
    /// [`DataError`] when the fetched sample set is unusable; there is no
    /// fallback for an empty or unsorted baseline.
    pub async fn load_baseline(&self, id: &str) -> Result<ComputeSource, DataError> {
        let fetched = self.compute.fetch_trajectory(id, None, None).await;
        let source = fetched.source;
        self.store.write().await.load(fetched.value.points)?;
        Ok(source)
    }

    /// Spawns the periodic backend health probe.
    pub fn spawn_health_probe(&self) -> tokio::task::JoinHandle<()> {
        self.compute.spawn_health_probe()
    }

    /// Interpolated vehicle state at time `t`, clamped to the trajectory span.
    pub async fn vehicle_state_at(&self, t: f64) -> VehicleState {
        self.store.read().await.state_at_time(t)
    }

    /// Interpolated velocity vector at time `t`.
    pub async fn velocity_vector_at(&self, t: f64) -> Vec3D<f64> {
        self.store.read().await.velocity_at_time(t)
    }

    /// Applies a bank angle from time `t` onward; returns the replaced sample
    /// range for redraw invalidation.
    pub async fn apply_bank_angle_offset(
        &self,
        t: f64,
        lift_hint: Vec3D<f64>,
        bank_angle_deg: f64,
    ) -> Range<usize> {
        self.resim.apply_bank_angle(t, lift_hint, bank_angle_deg).await
    }

    /// Discards all modifications: `working := copy(baseline)`.
    pub async fn reset_trajectory(&self) { self.store.write().await.reset(); }

    /// Read-only availability/diagnostics snapshot.
    pub async fn backend_status(&self) -> BackendStatus { self.compute.status().await }

    /// Time span `[first, last]` of the working trajectory, `(0, 0)` before a
    /// baseline was loaded.
    pub async fn time_range(&self) -> (f64, f64) {
        let store = self.store.read().await;
        match store.working() {
            [] => (0.0, 0.0),
            [only] => (only.time_s, only.time_s),
            [first, .., last] => (first.time_s, last.time_s),
        }
    }
}
