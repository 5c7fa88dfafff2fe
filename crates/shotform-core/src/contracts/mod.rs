//! Boundaries to the collaborators this crate does not implement: the frame
//! source, the pose detector and the shot-quality classifier.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::landmarks::LandmarkSet;

/// Opaque decoded pixels of one sampled frame.
#[derive(Clone, PartialEq, Eq)]
pub struct FrameImage {
    pub width: u32,
    pub height: u32,
    pub bytes_per_row: usize,
    pub data: Arc<[u8]>,
}

impl FrameImage {
    pub fn new(width: u32, height: u32, bytes_per_row: usize, data: Arc<[u8]>) -> Self {
        Self {
            width,
            height,
            bytes_per_row,
            data,
        }
    }

    /// A zero-sized image for sources that only carry landmarks.
    pub fn empty() -> Self {
        Self::new(0, 0, 0, Arc::from(Vec::new()))
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl fmt::Debug for FrameImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes_per_row", &self.bytes_per_row)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// A frame as delivered by the frame source.
#[derive(Debug, Clone)]
pub struct FramePacket {
    pub frame_index: u64,
    pub image: FrameImage,
}

impl FramePacket {
    pub fn new(frame_index: u64, image: FrameImage) -> Self {
        Self { frame_index, image }
    }
}

/// Maps a frame to its nine named keypoints, or `None` when nothing was detected.
pub trait PoseDetector {
    fn detect(&mut self, frame: &FramePacket) -> Option<LandmarkSet>;
}

/// Pass/fail judgement of shot form at one phase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityVerdict {
    pub passed: bool,
    /// Confidence of the reported label, in [0, 1].
    pub probability: f64,
}

/// Judges a keypoint vector followed by a one-hot phase indicator.
pub trait QualityClassifier {
    fn classify(&self, input: &[f32]) -> QualityVerdict;
}
