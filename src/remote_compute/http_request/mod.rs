pub mod analyze_get;
pub mod forces_post;
pub mod health_get;
pub mod high_fidelity_post;
pub mod interpolate_get;
pub mod modify_post;
pub mod request_common;
pub mod trajectory_get;
pub mod trajectory_list_get;
