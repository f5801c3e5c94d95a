pub mod analyze;
pub mod forces;
pub mod health;
pub mod high_fidelity;
pub mod interpolate;
pub mod modify;
pub mod response_common;
pub mod trajectory;
pub mod trajectory_list;
