#![allow(dead_code, clippy::similar_names)]
#![warn(clippy::shadow_reuse, clippy::shadow_same, clippy::builtin_type_shadow)]
mod entry_dynamics;
mod keychain;
mod logger;
mod remote_compute;

use crate::entry_dynamics::{MARS, MSL_CLASS, PlanetModel, VehicleModel};
use crate::keychain::Keychain;
use crate::remote_compute::resilient::ClientConfig;
use std::env;

#[tokio::main(flavor = "multi_thread", worker_threads = 4)]
async fn main() {
    let config = ClientConfig::from_env();
    let planet = env::var("EDL_PLANET").ok().map_or(MARS, |name| {
        PlanetModel::by_name(&name).unwrap_or_else(|| fatal!("unknown planet '{name}'"))
    });
    let vehicle = env::var("EDL_VEHICLE").ok().map_or(MSL_CLASS, |name| {
        VehicleModel::by_name(&name).unwrap_or_else(|| fatal!("unknown vehicle '{name}'"))
    });
    info!("entry core starting against {} ({}, {})", config.base_url, planet.name, vehicle.name);

    let keychain = Keychain::new(planet, vehicle, config);
    let _probe_task = keychain.spawn_health_probe();

    let trajectory_id = env::var("EDL_TRAJECTORY_ID").unwrap_or_else(|_| "baseline".to_string());
    match keychain.load_baseline(&trajectory_id).await {
        Ok(source) => info!("baseline '{trajectory_id}' loaded ({source})"),
        Err(e) => fatal!("unusable baseline trajectory: {e}"),
    }

    let (t_first, t_last) = keychain.time_range().await;
    for k in 0..=4 {
        let t = t_first + (t_last - t_first) * f64::from(k) / 4.0;
        let state = keychain.vehicle_state_at(t).await;
        info!(
            "t={:8.2} s  alt={:9.1} m  |v|={:8.1} m/s  to-landing={:9.1} m",
            state.time_s, state.altitude_m, state.velocity_magnitude, state.distance_to_landing_m
        );
    }

    let t_mid = t_first + (t_last - t_first) / 2.0;
    let up = keychain.vehicle_state_at(t_mid).await.position.normalize();
    let replaced = keychain.apply_bank_angle_offset(t_mid, up, 30.0).await;
    log!("bank maneuver at t={t_mid:.2} s re-simulated {} samples", replaced.len());
    let terminal = keychain.vehicle_state_at(t_last).await;
    log!("terminal altitude after maneuver: {:.1} m", terminal.altitude_m);
    keychain.reset_trajectory().await;

    let status = keychain.backend_status().await;
    info!(
        "backend available={} consecutive_failures={} remote_attempts={} local_fallbacks={} cached={}",
        status.availability.is_available,
        status.availability.consecutive_failures,
        status.remote_attempts,
        status.local_fallbacks,
        status.cached_entries
    );
}
