pub mod parser;

pub use parser::*;

use shotform_core::landmarks::LandmarkSet;

/// One row of a landmark trace: the detector's output for a single frame
#[derive(Debug, Clone, PartialEq)]
pub struct TraceFrame {
    pub frame_index: u64,
    /// `None` when the detector found no person in this frame
    pub landmarks: Option<LandmarkSet>,
}
