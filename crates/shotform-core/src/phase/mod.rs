//! Per-frame shot phase labelling from joint angles and normalized positions.

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::landmarks::LandmarkSet;
use crate::math::{joint_angle_deg, round_to, tolerance_confidence};
use crate::normalize::NormalizedMetrics;

/// Biomechanical stages of a jump shot, in chronological order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShotPhase {
    Pocket,
    Set,
    FollowThrough,
}

impl ShotPhase {
    pub const ALL: [ShotPhase; 3] = [ShotPhase::Pocket, ShotPhase::Set, ShotPhase::FollowThrough];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Human-readable phase name.
    pub fn display_name(self) -> &'static str {
        match self {
            ShotPhase::Pocket => "shot pocket",
            ShotPhase::Set => "set point",
            ShotPhase::FollowThrough => "follow through",
        }
    }
}

impl fmt::Display for ShotPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseLabel {
    Phase(ShotPhase),
    Undefined,
}

impl PhaseLabel {
    pub fn phase(self) -> Option<ShotPhase> {
        match self {
            PhaseLabel::Phase(phase) => Some(phase),
            PhaseLabel::Undefined => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseEstimate {
    pub label: PhaseLabel,
    pub confidence: f64,
}

impl PhaseEstimate {
    pub fn undefined() -> Self {
        Self {
            label: PhaseLabel::Undefined,
            confidence: 0.0,
        }
    }
}

const ELBOW_ANGLE_TOLERANCE: f64 = 30.0;

const POCKET_ELBOW_IDEAL: f64 = 90.0;
const POCKET_ELBOW_RANGE: (f64, f64) = (70.0, 120.0);
const POCKET_WRIST_IDEAL: f64 = -0.02;
const POCKET_WRIST_TOLERANCE: f64 = 0.25;

const SET_ELBOW_IDEAL: f64 = 60.0;
const SET_ELBOW_RANGE: (f64, f64) = (35.0, 80.0);
const SET_ELBOW_OUT_OF_RANGE: f64 = 0.2;
const SET_WRIST_HEAD_IDEAL: f64 = -0.05;
const SET_WRIST_HEAD_TOLERANCE: f64 = 0.15;
const SET_WRIST_X_IDEAL: f64 = 0.15;
const SET_WRIST_X_TOLERANCE: f64 = 0.35;

const FT_ELBOW_IDEAL: f64 = 170.0;
const FT_ELBOW_RANGE: (f64, f64) = (150.0, 185.0);
const FT_WRIST_HEAD_IDEAL: f64 = -0.1;
const FT_WRIST_HEAD_TOLERANCE: f64 = 0.25;
const FT_ELBOW_HEAD_IDEAL: f64 = -0.2;
const FT_ELBOW_HEAD_TOLERANCE: f64 = 0.1;
const FT_FORWARD_IDEAL: f64 = -0.05;
const FT_FORWARD_TOLERANCE: f64 = 0.15;

/// Scores a single frame against the three phase templates.
///
/// Deterministic and stateless; the arm is resolved per frame with
/// [`LandmarkSet::leading_side`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseScorer {
    /// Winning confidences below this are reported as undefined.
    pub min_confidence: f64,
}

impl Default for PhaseScorer {
    fn default() -> Self {
        Self {
            min_confidence: 0.3,
        }
    }
}

impl PhaseScorer {
    pub fn new(min_confidence: f64) -> Self {
        Self { min_confidence }
    }

    /// Returns the per-phase sub-confidences in [`ShotPhase::ALL`] order.
    pub fn phase_confidences(&self, landmarks: &LandmarkSet, metrics: &NormalizedMetrics) -> [f64; 3] {
        let side = landmarks.leading_side();
        let wrist = landmarks.get(side.wrist());
        let elbow = landmarks.get(side.elbow());
        let shoulder = landmarks.get(side.shoulder());

        let elbow_angle =
            joint_angle_deg(wrist.position(), elbow.position(), shoulder.position());
        let elbow_score = |ideal: f64, range: (f64, f64), outside: f64| match elbow_angle {
            Some(angle) if angle >= range.0 && angle <= range.1 => {
                tolerance_confidence(angle, ideal, ELBOW_ANGLE_TOLERANCE)
            }
            _ => outside,
        };

        let arm = metrics.side(side);
        let wrist_to_head = metrics.wrist_to_head(side);

        let pocket = elbow_score(POCKET_ELBOW_IDEAL, POCKET_ELBOW_RANGE, 0.0) * 0.6
            + tolerance_confidence(arm.wrist_y_norm, POCKET_WRIST_IDEAL, POCKET_WRIST_TOLERANCE)
                * 0.4;

        let set = elbow_score(SET_ELBOW_IDEAL, SET_ELBOW_RANGE, SET_ELBOW_OUT_OF_RANGE) * 0.25
            + tolerance_confidence(wrist_to_head, SET_WRIST_HEAD_IDEAL, SET_WRIST_HEAD_TOLERANCE)
                * 0.55
            + tolerance_confidence(arm.wrist_x_offset, SET_WRIST_X_IDEAL, SET_WRIST_X_TOLERANCE)
                * 0.2;

        let follow_through = if wrist_to_head > 0.0 {
            0.0
        } else {
            let forward = wrist.x - elbow.x;
            elbow_score(FT_ELBOW_IDEAL, FT_ELBOW_RANGE, 0.0) * 0.4
                + tolerance_confidence(wrist_to_head, FT_WRIST_HEAD_IDEAL, FT_WRIST_HEAD_TOLERANCE)
                    * 0.2
                + tolerance_confidence(
                    metrics.elbow_to_head(side),
                    FT_ELBOW_HEAD_IDEAL,
                    FT_ELBOW_HEAD_TOLERANCE,
                ) * 0.2
                + tolerance_confidence(forward, FT_FORWARD_IDEAL, FT_FORWARD_TOLERANCE) * 0.2
        };

        [pocket, set, follow_through]
    }

    /// Labels a frame with its most likely phase.
    pub fn classify(&self, landmarks: &LandmarkSet, metrics: &NormalizedMetrics) -> PhaseEstimate {
        let confidences = self.phase_confidences(landmarks, metrics);

        let mut best = ShotPhase::Pocket;
        for phase in ShotPhase::ALL {
            if confidences[phase.index()] > confidences[best.index()] {
                best = phase;
            }
        }

        let confidence = round_to(confidences[best.index()], 2);
        debug!(target: "shotform_core::phase",
            "phase confidences pocket={:.3} set={:.3} follow_through={:.3} -> {:?}",
            confidences[0], confidences[1], confidences[2], best
        );

        if confidence < self.min_confidence {
            return PhaseEstimate::undefined();
        }

        PhaseEstimate {
            label: PhaseLabel::Phase(best),
            confidence,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::landmarks::{BodyPoint, Landmark};
    use approx::assert_relative_eq;

    /// Upright body with torso 0.3 tall and shoulders 0.1 wide; only the right
    /// arm varies. The left arm hangs at the hip so the right side leads.
    pub(crate) fn body_with_right_arm(elbow: (f64, f64), wrist: (f64, f64)) -> LandmarkSet {
        let mut set = LandmarkSet::from_points([Landmark::default(); BodyPoint::COUNT]);
        set.set(BodyPoint::RightShoulder, Landmark::new(0.45, 0.4, 1.0));
        set.set(BodyPoint::LeftShoulder, Landmark::new(0.55, 0.4, 1.0));
        set.set(BodyPoint::RightHip, Landmark::new(0.45, 0.7, 1.0));
        set.set(BodyPoint::LeftHip, Landmark::new(0.55, 0.7, 1.0));
        set.set(BodyPoint::Nose, Landmark::new(0.5, 0.3, 1.0));
        set.set(BodyPoint::LeftElbow, Landmark::new(0.6, 0.55, 1.0));
        set.set(BodyPoint::LeftWrist, Landmark::new(0.62, 0.7, 1.0));
        set.set(BodyPoint::RightElbow, Landmark::new(elbow.0, elbow.1, 1.0));
        set.set(BodyPoint::RightWrist, Landmark::new(wrist.0, wrist.1, 1.0));
        set
    }

    pub(crate) fn pocket_pose() -> LandmarkSet {
        body_with_right_arm((0.45, 0.6), (0.30, 0.6))
    }

    pub(crate) fn set_pose() -> LandmarkSet {
        // Forearm 0.13 long at 60 degrees from the horizontal upper arm.
        let rise = 0.13 * 60f64.to_radians().sin();
        body_with_right_arm((0.40, 0.40), (0.465, 0.40 - rise))
    }

    pub(crate) fn follow_through_pose() -> LandmarkSet {
        body_with_right_arm((0.45, 0.25), (0.45, 0.1))
    }

    fn classify(set: &LandmarkSet) -> PhaseEstimate {
        PhaseScorer::default().classify(set, &NormalizedMetrics::from_landmarks(set))
    }

    #[test]
    fn bent_arm_at_hip_is_pocket() {
        let estimate = classify(&pocket_pose());
        assert_eq!(estimate.label, PhaseLabel::Phase(ShotPhase::Pocket));
        assert_relative_eq!(estimate.confidence, 0.9, epsilon = 1e-12);
    }

    #[test]
    fn raised_bent_arm_is_set_point() {
        let estimate = classify(&set_pose());
        assert_eq!(estimate.label, PhaseLabel::Phase(ShotPhase::Set));
        assert!(estimate.confidence >= 0.95);
    }

    #[test]
    fn straight_raised_arm_is_follow_through() {
        let estimate = classify(&follow_through_pose());
        assert_eq!(estimate.label, PhaseLabel::Phase(ShotPhase::FollowThrough));
        assert_relative_eq!(estimate.confidence, 0.8, epsilon = 1e-12);
    }

    #[test]
    fn follow_through_needs_wrist_above_head() {
        let set = pocket_pose();
        let metrics = NormalizedMetrics::from_landmarks(&set);
        let confidences = PhaseScorer::default().phase_confidences(&set, &metrics);
        assert_eq!(confidences[ShotPhase::FollowThrough.index()], 0.0);
    }

    #[test]
    fn ambiguous_pose_is_undefined() {
        // Arm hanging straight down: no template matches well.
        let estimate = classify(&body_with_right_arm((0.45, 0.55), (0.45, 0.9)));
        assert_eq!(estimate.label, PhaseLabel::Undefined);
        assert_eq!(estimate.confidence, 0.0);
    }
}
