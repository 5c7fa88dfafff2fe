pub mod angles;
pub mod utils;

pub use angles::{joint_angle_deg, tolerance_confidence};
pub use utils::{median, round_to, EPSILON};
