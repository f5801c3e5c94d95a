pub(crate) mod common;
mod entry_sim;
pub(crate) mod physics;
mod planet;
mod resimulator;
mod trajectory;
mod vehicle;
#[cfg(test)]
mod tests;

pub use entry_sim::{DEFAULT_DT_S, EntryInterface, propagate_entry};
pub use physics::{ControlInputs, ForceVector, GRAVITATIONAL_CONSTANT, compute_forces};
pub use planet::{MARS, PlanetModel};
pub use resimulator::{Resimulator, resimulate};
pub(crate) use resimulator::sample_velocity;
pub use trajectory::{DataError, Sample, TrajectoryStore, VehicleState};
pub use vehicle::{MSL_CLASS, VehicleModel};
