pub mod analysis;
pub mod json;

pub use analysis::*;
pub use json::*;
