use super::common::math::EPS;
use super::common::vec3d::Vec3D;
use super::entry_sim::PARACHUTE_DEPLOY_ALTITUDE_M;
use super::{
    ControlInputs, DataError, EntryInterface, GRAVITATIONAL_CONSTANT, MARS, MSL_CLASS, PlanetModel,
    Resimulator, Sample, TrajectoryStore, VehicleState, compute_forces, propagate_entry,
    resimulate, sample_velocity,
};
use crate::remote_compute::http_client::HTTPClient;
use crate::remote_compute::resilient::{ClientConfig, ResilientClient};
use chrono::TimeDelta;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

fn assert_close(a: f64, b: f64, tol: f64) {
    assert!((a - b).abs() <= tol, "expected {a} ~ {b} (tol {tol})");
}

fn line_samples() -> Vec<Sample> {
    vec![
        Sample::new(0.0, Vec3D::new(0.0, 0.0, 0.0), None),
        Sample::new(1.0, Vec3D::new(1.0, 0.0, 0.0), None),
        Sample::new(2.0, Vec3D::new(2.0, 0.0, 0.0), None),
    ]
}

fn loaded_store() -> TrajectoryStore {
    let mut store = TrajectoryStore::new(MARS);
    store.load(line_samples()).unwrap();
    store
}

fn state_at(position: Vec3D<f64>, velocity: Vec3D<f64>) -> VehicleState {
    VehicleState {
        time_s: 0.0,
        position,
        velocity,
        velocity_magnitude: velocity.abs(),
        altitude_m: position.abs() - MARS.radius_m,
        distance_to_landing_m: 0.0,
    }
}

#[test]
fn test_mars_density_profile() {
    assert_close(MARS.atmospheric_density(0.0), 0.02, EPS);
    // One scale height up: surface density over e.
    assert_close(MARS.atmospheric_density(11_100.0), 0.02 / std::f64::consts::E, 1e-12);
    // Above the atmosphere shell the density cuts to exactly zero.
    assert_close(MARS.atmospheric_density(132_001.0), 0.0, 0.0);
    // Below-surface altitudes clamp to the surface value.
    assert_close(MARS.atmospheric_density(-500.0), 0.02, EPS);
}

#[test]
fn test_planet_catalog_lookup() {
    assert_eq!(PlanetModel::by_name("Mars").unwrap(), MARS);
    assert!(PlanetModel::by_name("earth").unwrap().surface_density > 1.0);
    assert!(PlanetModel::by_name("JUPITER").unwrap().radius_m > MARS.radius_m);
    assert!(PlanetModel::by_name("venus").is_none());
}

#[test]
fn test_msl_aero_ratios() {
    assert_close(MSL_CLASS.ballistic_coefficient(), 114.78, 0.01);
    assert_close(MSL_CLASS.lift_to_drag(), 0.24, EPS);
    assert_close(MARS.mu(), 4.2828e13, 5e10);
}

#[test]
fn test_gravity_points_at_planet_center() {
    let r = MARS.radius_m + 50_000.0;
    let state = state_at(Vec3D::new(r, 0.0, 0.0), Vec3D::zero());
    let forces =
        compute_forces(&state, &MARS, &MSL_CLASS, &ControlInputs::bank_only(0.0), &Vec3D::zero());
    let expected = GRAVITATIONAL_CONSTANT * MARS.mass_kg * MSL_CLASS.mass_kg / (r * r);
    assert_close(forces.gravity.abs(), expected, expected * 1e-12);
    assert!(forces.gravity.x() < 0.0);
    assert_close(forces.gravity.y(), 0.0, EPS);
}

#[test]
fn test_drag_opposes_velocity_and_lift_is_perpendicular() {
    let position = Vec3D::new(MARS.radius_m + 20_000.0, 0.0, 0.0);
    let velocity = Vec3D::new(-4_000.0, 1_000.0, 0.0);
    let state = state_at(position, velocity);
    let hint = Vec3D::new(0.0, 0.0, 1.0);
    let forces = compute_forces(&state, &MARS, &MSL_CLASS, &ControlInputs::bank_only(0.0), &hint);

    assert!(forces.drag.abs() > 0.0);
    assert!(forces.drag.dot(&velocity) < 0.0);
    assert_close(forces.drag.cross(&velocity).abs(), 0.0, 1e-3);

    assert!(forces.lift.abs() > 0.0);
    assert_close(forces.lift.dot(&velocity) / forces.lift.abs(), 0.0, 1e-6);
    assert_close(forces.lift.abs() / forces.drag.abs(), MSL_CLASS.lift_to_drag(), 1e-9);
}

#[test]
fn test_bank_angle_rolls_lift_about_velocity() {
    let position = Vec3D::new(MARS.radius_m + 20_000.0, 0.0, 0.0);
    let velocity = Vec3D::new(-4_000.0, 0.0, 0.0);
    let state = state_at(position, velocity);
    let hint = Vec3D::new(0.0, 0.0, 1.0);
    let upright =
        compute_forces(&state, &MARS, &MSL_CLASS, &ControlInputs::bank_only(0.0), &hint).lift;
    let banked =
        compute_forces(&state, &MARS, &MSL_CLASS, &ControlInputs::bank_only(60.0), &hint).lift;
    assert_close(banked.abs(), upright.abs(), upright.abs() * 1e-12);
    let cos_roll = banked.dot(&upright) / (banked.abs() * upright.abs());
    assert_close(cos_roll, 60.0_f64.to_radians().cos(), 1e-9);
}

#[test]
fn test_degenerate_inputs_zero_the_affected_component() {
    // No position: gravity dropped, everything else still evaluated.
    let state = state_at(Vec3D::zero(), Vec3D::new(100.0, 0.0, 0.0));
    let forces =
        compute_forces(&state, &MARS, &MSL_CLASS, &ControlInputs::bank_only(0.0), &Vec3D::zero());
    assert_eq!(forces.gravity, Vec3D::zero());

    // Lift hint parallel to velocity: lift dropped, drag kept.
    let position = Vec3D::new(MARS.radius_m + 20_000.0, 0.0, 0.0);
    let velocity = Vec3D::new(-4_000.0, 0.0, 0.0);
    let forces = compute_forces(
        &state_at(position, velocity),
        &MARS,
        &MSL_CLASS,
        &ControlInputs::bank_only(0.0),
        &velocity.normalize(),
    );
    assert_eq!(forces.lift, Vec3D::zero());
    assert!(forces.drag.abs() > 0.0);
}

#[test]
fn test_no_aero_forces_above_the_atmosphere() {
    let position = Vec3D::new(MARS.radius_m + 200_000.0, 0.0, 0.0);
    let velocity = Vec3D::new(-5_000.0, 0.0, 0.0);
    let forces = compute_forces(
        &state_at(position, velocity),
        &MARS,
        &MSL_CLASS,
        &ControlInputs::bank_only(30.0),
        &Vec3D::new(0.0, 0.0, 1.0),
    );
    assert_eq!(forces.drag, Vec3D::zero());
    assert_eq!(forces.lift, Vec3D::zero());
    assert!(forces.gravity.abs() > 0.0);
}

#[test]
fn test_thrust_vector_from_pointing_angles() {
    let coast = ControlInputs::bank_only(30.0);
    assert_eq!(coast.thrust_vector(), Vec3D::zero());
    let burn = ControlInputs { main_thrust_n: 100.0, ..ControlInputs::bank_only(0.0) };
    assert_close(burn.thrust_vector().x(), 100.0, 1e-9);
    let pitched = ControlInputs { pitch_deg: 90.0, ..burn };
    assert_close(pitched.thrust_vector().z(), 100.0, 1e-9);
}

#[test]
fn test_load_rejects_malformed_input() {
    let mut store = TrajectoryStore::new(MARS);
    assert!(matches!(store.load(Vec::new()), Err(DataError::TooFewSamples(0))));
    assert!(matches!(
        store.load(vec![Sample::new(0.0, Vec3D::zero(), None)]),
        Err(DataError::TooFewSamples(1))
    ));
    let mut unsorted = line_samples();
    unsorted[2].time_s = 1.0;
    assert!(matches!(store.load(unsorted), Err(DataError::NonMonotonicTime(2))));
    assert!(!store.is_loaded());
}

#[test]
fn test_state_query_before_load_is_zero() {
    let store = TrajectoryStore::new(MARS);
    let state = store.state_at_time(3.0);
    assert_eq!(state.position, Vec3D::zero());
    assert_close(state.velocity_magnitude, 0.0, EPS);
    assert!(store.bracketing_samples(3.0).is_none());
}

#[test]
fn test_state_interpolation_between_samples() {
    let store = loaded_store();
    let state = store.state_at_time(0.5);
    assert_close(state.position.x(), 0.5, EPS);
    assert_close(state.time_s, 0.5, EPS);
    // Continuity at a sample point: the query reproduces it exactly.
    assert_close(store.state_at_time(1.0).position.x(), 1.0, EPS);
    // Landing site is the last baseline position.
    assert_close(state.distance_to_landing_m, 1.5, EPS);
    // No stored velocities, so the bracketing finite difference applies.
    assert_close(store.velocity_at_time(0.5).x(), 1.0, EPS);
}

#[test]
fn test_state_query_clamps_to_trajectory_span() {
    let store = loaded_store();
    let before = store.state_at_time(-5.0);
    assert_close(before.time_s, 0.0, EPS);
    assert_close(before.position.x(), 0.0, EPS);
    let after = store.state_at_time(10.0);
    assert_close(after.time_s, 2.0, EPS);
    assert_close(after.position.x(), 2.0, EPS);
}

#[test]
fn test_stored_velocities_are_interpolated() {
    let mut store = TrajectoryStore::new(MARS);
    store
        .load(vec![
            Sample::new(0.0, Vec3D::zero(), Some(Vec3D::new(2.0, 0.0, 0.0))),
            Sample::new(1.0, Vec3D::new(1.0, 0.0, 0.0), Some(Vec3D::new(4.0, 0.0, 0.0))),
        ])
        .unwrap();
    assert_close(store.velocity_at_time(0.5).x(), 3.0, EPS);
}

#[test]
fn test_cut_index() {
    let store = loaded_store();
    assert_eq!(store.cut_index(-1.0), Some(0));
    assert_eq!(store.cut_index(0.5), Some(1));
    assert_eq!(store.cut_index(1.0), Some(1));
    assert_eq!(store.cut_index(2.0), Some(2));
    assert_eq!(store.cut_index(2.5), None);
}

#[test]
fn test_reset_restores_baseline() {
    let mut store = loaded_store();
    store.replace_tail(1, vec![Sample::new(1.0, Vec3D::new(9.0, 9.0, 9.0), None)]);
    assert_eq!(store.working().len(), 2);
    store.reset();
    assert_eq!(store.working(), store.baseline());
    assert_eq!(store.working().len(), 3);
}

#[test]
fn test_sample_velocity_fallbacks() {
    let samples = line_samples();
    // Forward difference in the middle, backward at the end.
    assert_close(sample_velocity(&samples, 0).x(), 1.0, EPS);
    assert_close(sample_velocity(&samples, 2).x(), 1.0, EPS);
    let stored =
        vec![Sample::new(0.0, Vec3D::zero(), Some(Vec3D::new(7.0, 0.0, 0.0))), samples[1]];
    assert_close(sample_velocity(&stored, 0).x(), 7.0, EPS);
    assert_eq!(sample_velocity(&[samples[0]], 0), Vec3D::zero());
}

fn reference_entry() -> Vec<Sample> {
    propagate_entry(&MARS, &MSL_CLASS, &EntryInterface::default(), 30.0, 1.0)
}

#[test]
fn test_propagate_entry_descends_to_parachute_deploy() {
    let samples = reference_entry();
    assert!(samples.len() > 10);
    for pair in samples.windows(2) {
        assert!(pair[1].time_s > pair[0].time_s);
        assert_close(pair[1].time_s - pair[0].time_s, 1.0, 1e-9);
    }
    let first_altitude = samples[0].position.abs() - MARS.radius_m;
    let last_altitude = samples[samples.len() - 1].position.abs() - MARS.radius_m;
    assert!(first_altitude > 100_000.0);
    assert!(last_altitude < first_altitude);
    assert!(last_altitude > 0.0);
    // The trimmed last sample sits at most a couple of steps above deploy.
    assert!(last_altitude < PARACHUTE_DEPLOY_ALTITUDE_M + 20_000.0);
    // Every sample carries an integrated velocity.
    assert!(samples.iter().all(|s| s.velocity.is_some()));
}

#[test]
fn test_resimulate_is_deterministic() {
    let samples = reference_entry();
    let cutoff = samples[samples.len() / 2].time_s;
    let hint = samples[0].position.normalize();
    let (a, range_a) = resimulate(&samples, cutoff, &MARS, &MSL_CLASS, &hint, 45.0);
    let (b, range_b) = resimulate(&samples, cutoff, &MARS, &MSL_CLASS, &hint, 45.0);
    assert_eq!(a, b);
    assert_eq!(range_a, range_b);
}

#[test]
fn test_resimulate_replaces_only_the_tail_on_the_same_grid() {
    let samples = reference_entry();
    let cut = samples.len() / 2;
    let cutoff = samples[cut].time_s;
    let hint = samples[0].position.normalize();
    let (modified, range) = resimulate(&samples, cutoff, &MARS, &MSL_CLASS, &hint, 60.0);

    assert_eq!(range, cut..samples.len());
    assert_eq!(modified.len(), samples.len());
    assert_eq!(&modified[..cut], &samples[..cut]);
    for (m, s) in modified.iter().zip(&samples) {
        assert_close(m.time_s, s.time_s, 1e-9);
    }
    // The seed sample keeps its position; later samples feel the new bank.
    assert_eq!(modified[cut].position, samples[cut].position);
    let last = modified.len() - 1;
    assert!(modified[last].position.euclid_distance(&samples[last].position) > 1.0);
}

#[test]
fn test_resimulate_cutoff_beyond_last_sample_is_a_noop() {
    let samples = line_samples();
    let (modified, range) =
        resimulate(&samples, 99.0, &MARS, &MSL_CLASS, &Vec3D::new(0.0, 0.0, 1.0), 30.0);
    assert_eq!(modified, samples);
    assert!(range.is_empty());
    assert_eq!(range.start, samples.len());
}

/// Store, compute client and re-simulator wired together against the given
/// endpoint.
fn resimulator_rig(
    base_url: &str,
) -> (Arc<Resimulator>, Arc<RwLock<TrajectoryStore>>, Arc<ResilientClient>) {
    let config = ClientConfig {
        base_url: base_url.to_string(),
        timeout: Duration::from_secs(10),
        retry_attempts: 1,
        backoff_base: Duration::from_millis(1),
        cache_ttl: TimeDelta::seconds(60),
        probe_interval: Duration::from_secs(30),
    };
    let http = Arc::new(HTTPClient::new(&config.base_url, config.timeout));
    let store = Arc::new(RwLock::new(TrajectoryStore::new(MARS)));
    let compute =
        Arc::new(ResilientClient::new(http, Arc::clone(&store), MARS, MSL_CLASS, config));
    let resim =
        Arc::new(Resimulator::new(Arc::clone(&store), Arc::clone(&compute), MARS, MSL_CLASS));
    (resim, store, compute)
}

#[tokio::test]
async fn test_apply_bank_angle_commits_the_resimulated_tail() {
    let (resim, store, compute) = resimulator_rig("http://127.0.0.1:9");
    compute.mark_unavailable().await;
    let samples = reference_entry();
    store.write().await.load(samples.clone()).unwrap();

    let cut = samples.len() / 2;
    let cutoff = samples[cut].time_s;
    let hint = samples[0].position.normalize();
    let range = resim.apply_bank_angle(cutoff, hint, 45.0).await;
    assert_eq!(range, cut..samples.len());

    let (expected, _) = resimulate(&samples, cutoff, &MARS, &MSL_CLASS, &hint, 45.0);
    let guard = store.read().await;
    assert_eq!(guard.working(), &expected[..]);
    assert_eq!(&guard.working()[..cut], &samples[..cut]);
    // The baseline is untouched by the commit.
    assert_eq!(guard.baseline(), &samples[..]);
}

#[tokio::test]
async fn test_apply_bank_angle_beyond_last_sample_commits_nothing() {
    let (resim, store, compute) = resimulator_rig("http://127.0.0.1:9");
    compute.mark_unavailable().await;
    let samples = reference_entry();
    let last = samples[samples.len() - 1].time_s;
    store.write().await.load(samples.clone()).unwrap();

    let range = resim.apply_bank_angle(last + 1.0, samples[0].position.normalize(), 45.0).await;
    assert!(range.is_empty());
    assert_eq!(range.start, samples.len());
    assert_eq!(store.read().await.working(), &samples[..]);
}

#[tokio::test]
async fn test_superseded_modification_is_cancelled_and_newest_commits() {
    // A silent server: accepts connections and never answers, so the first
    // request stays in flight until it is superseded.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let _server = tokio::spawn(async move {
        let mut held = Vec::new();
        loop {
            if let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        }
    });

    let (resim, store, compute) = resimulator_rig(&format!("http://{addr}"));
    let samples = reference_entry();
    store.write().await.load(samples.clone()).unwrap();
    let cut = samples.len() / 2;
    let cutoff = samples[cut].time_s;
    let hint = samples[0].position.normalize();

    let first = tokio::spawn({
        let resim = Arc::clone(&resim);
        async move { resim.apply_bank_angle(cutoff, hint, 20.0).await }
    });
    // Let the first request register itself and block on the silent server.
    tokio::time::sleep(Duration::from_millis(100)).await;

    compute.mark_unavailable().await;
    let second = resim.apply_bank_angle(cutoff, hint, 70.0).await;
    assert_eq!(second, cut..samples.len());

    let superseded = first.await.unwrap();
    assert!(superseded.is_empty());

    let (expected, _) = resimulate(&samples, cutoff, &MARS, &MSL_CLASS, &hint, 70.0);
    assert_eq!(store.read().await.working(), &expected[..]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_modifications_latest_wins() {
    let (resim, store, compute) = resimulator_rig("http://127.0.0.1:9");
    compute.mark_unavailable().await;
    let samples = reference_entry();
    store.write().await.load(samples.clone()).unwrap();

    let cut = samples.len() / 2;
    let cutoff = samples[cut].time_s;
    let hint = samples[0].position.normalize();
    // Tail integration depends only on the seed sample and the time grid,
    // both invariant under commits, so the two possible outcomes are fixed.
    let (shallow, _) = resimulate(&samples, cutoff, &MARS, &MSL_CLASS, &hint, 15.0);
    let (steep, _) = resimulate(&samples, cutoff, &MARS, &MSL_CLASS, &hint, 75.0);

    for _ in 0..50 {
        store.write().await.reset();
        let a = tokio::spawn({
            let resim = Arc::clone(&resim);
            async move { resim.apply_bank_angle(cutoff, hint, 15.0).await }
        });
        let b = tokio::spawn({
            let resim = Arc::clone(&resim);
            async move { resim.apply_bank_angle(cutoff, hint, 75.0).await }
        });
        let (range_a, range_b) = (a.await.unwrap(), b.await.unwrap());

        // The later of the two requests always commits, so both modifications
        // can never be dropped together.
        assert!(!(range_a.is_empty() && range_b.is_empty()));
        let guard = store.read().await;
        let committed = guard.working();
        assert!(committed == &shallow[..] || committed == &steep[..]);
        assert_eq!(&committed[..cut], &samples[..cut]);
    }
}

#[test]
fn test_resimulate_bank_angle_steers_the_tail() {
    let samples = reference_entry();
    let cutoff = samples[samples.len() / 2].time_s;
    let hint = samples[0].position.normalize();
    let (shallow, _) = resimulate(&samples, cutoff, &MARS, &MSL_CLASS, &hint, 0.0);
    let (steep, _) = resimulate(&samples, cutoff, &MARS, &MSL_CLASS, &hint, 90.0);
    let last = samples.len() - 1;
    assert!(shallow[last].position.euclid_distance(&steep[last].position) > 1.0);
}
