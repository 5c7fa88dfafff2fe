//! Temporal signals: trailing confidence smoothing, frame-to-frame motion and
//! the session-wide dominant hand tally.

use std::collections::VecDeque;

use log::debug;
use nalgebra::SVector;
use serde::{Deserialize, Serialize};

use crate::landmarks::Side;
use crate::math::median;
use crate::normalize::{NormalizedMetrics, SideMetrics};

/// Default trailing window for confidence smoothing, in frames.
pub const DEFAULT_SMOOTHING_WINDOW: usize = 5;

/// Minimum number of detected frames before the dominant hand is inferred.
const MIN_DOMINANT_HAND_FRAMES: usize = 3;

/// Trailing moving average of raw per-frame phase confidence.
#[derive(Debug, Clone)]
pub struct ConfidenceSmoother {
    window: VecDeque<f64>,
    capacity: usize,
}

impl ConfidenceSmoother {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0);
        Self {
            window: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Pushes a raw confidence and returns the mean over the current window.
    ///
    /// Until the window fills, the mean covers whatever has been seen so far.
    pub fn update(&mut self, confidence: f64) -> f64 {
        if self.window.len() == self.capacity {
            self.window.pop_front();
        }
        self.window.push_back(confidence);
        self.window.iter().sum::<f64>() / self.window.len() as f64
    }

    pub fn window_size(&self) -> usize {
        self.window.len()
    }

    pub fn reset(&mut self) {
        self.window.clear();
    }
}

impl Default for ConfidenceSmoother {
    fn default() -> Self {
        Self::new(DEFAULT_SMOOTHING_WINDOW)
    }
}

/// Motion of one arm between two consecutive frames.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MotionSignals {
    /// Wrist y delta over current torso length (negative is upward).
    pub velocity_y: f64,
    /// Wrist x delta over current shoulder width.
    pub velocity_x: f64,
    /// Displacement norm across wrist, elbow and shoulder-centre positions.
    pub pose_delta: f64,
}

/// Motion signals for both arms; the dominant one is picked later.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameMotion {
    pub right: MotionSignals,
    pub left: MotionSignals,
}

impl FrameMotion {
    pub fn side(&self, side: Side) -> MotionSignals {
        match side {
            Side::Right => self.right,
            Side::Left => self.left,
        }
    }
}

/// Computes motion between the previous frame's metrics and the current ones.
///
/// Without a previous detected frame every signal is zero.
pub fn estimate_motion(
    previous: Option<&NormalizedMetrics>,
    current: &NormalizedMetrics,
) -> FrameMotion {
    let Some(previous) = previous else {
        return FrameMotion::default();
    };

    let signals = |side: Side| {
        let prev = previous.side(side);
        let cur = current.side(side);
        let pose = |arm: &SideMetrics, center_x: f64| {
            SVector::<f64, 6>::from([
                arm.wrist.x,
                arm.wrist.y,
                arm.elbow.x,
                arm.elbow.y,
                center_x,
                0.0,
            ])
        };
        let delta = pose(cur, current.shoulder_center_x) - pose(prev, previous.shoulder_center_x);

        MotionSignals {
            velocity_y: (cur.wrist.y - prev.wrist.y) / current.torso_length,
            velocity_x: (cur.wrist.x - prev.wrist.x) / current.shoulder_width,
            pose_delta: delta.norm(),
        }
    };

    FrameMotion {
        right: signals(Side::Right),
        left: signals(Side::Left),
    }
}

/// Accumulates per-side wrist heights to infer the shooting hand.
#[derive(Debug, Clone, Default)]
pub struct DominantHandTally {
    right_wrist_heights: Vec<f64>,
    left_wrist_heights: Vec<f64>,
}

impl DominantHandTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, metrics: &NormalizedMetrics) {
        self.right_wrist_heights.push(metrics.right.wrist_y_norm);
        self.left_wrist_heights.push(metrics.left.wrist_y_norm);
    }

    pub fn frame_count(&self) -> usize {
        self.right_wrist_heights.len()
    }

    /// The side whose median wrist height is higher in the image (numerically
    /// lower). Defaults to the right hand with fewer than three frames.
    pub fn resolve(&self) -> Side {
        if self.frame_count() < MIN_DOMINANT_HAND_FRAMES {
            return Side::Right;
        }
        let (Some(right), Some(left)) = (
            median(&self.right_wrist_heights),
            median(&self.left_wrist_heights),
        ) else {
            return Side::Right;
        };
        let side = if right < left { Side::Right } else { Side::Left };
        debug!(target: "shotform_core::temporal",
            "dominant hand {:?} (right median {:.3}, left median {:.3})",
            side, right, left
        );
        side
    }
}
