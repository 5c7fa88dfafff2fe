//! Body-relative, scale-invariant measurements derived from one landmark set.
//!
//! Vertical positions are expressed relative to the hip centre and divided by
//! torso length, so negative values sit above the hips. Horizontal offsets are
//! divided by shoulder width.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::landmarks::{BodyPoint, LandmarkSet, Side};
use crate::math::EPSILON;

/// Arm measurements for one body side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SideMetrics {
    pub wrist_y_norm: f64,
    pub elbow_y_norm: f64,
    /// Absolute wrist distance from the shoulder centre, in shoulder widths.
    pub wrist_x_offset: f64,
    /// Raw image-normalized wrist position, kept for motion estimation.
    pub wrist: Vector2<f64>,
    /// Raw image-normalized elbow position, kept for motion estimation.
    pub elbow: Vector2<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedMetrics {
    /// Shoulder-midpoint to hip-midpoint distance, epsilon guarded.
    pub torso_length: f64,
    /// Shoulder-to-shoulder distance, epsilon guarded.
    pub shoulder_width: f64,
    pub shoulder_center_x: f64,
    pub hip_center_y: f64,
    pub nose_y_norm: f64,
    pub right: SideMetrics,
    pub left: SideMetrics,
}

impl NormalizedMetrics {
    pub fn from_landmarks(landmarks: &LandmarkSet) -> Self {
        let rs = landmarks.get(BodyPoint::RightShoulder);
        let ls = landmarks.get(BodyPoint::LeftShoulder);
        let rh = landmarks.get(BodyPoint::RightHip);
        let lh = landmarks.get(BodyPoint::LeftHip);
        let nose = landmarks.get(BodyPoint::Nose);

        let shoulder_y = 0.5 * (rs.y + ls.y);
        let hip_center_y = 0.5 * (rh.y + lh.y);
        let torso_length = (shoulder_y - hip_center_y).abs() + EPSILON;
        let shoulder_width = (rs.x - ls.x).abs() + EPSILON;
        let shoulder_center_x = 0.5 * (rs.x + ls.x);

        let side = |side: Side| {
            let wrist = landmarks.get(side.wrist());
            let elbow = landmarks.get(side.elbow());
            SideMetrics {
                wrist_y_norm: (wrist.y - hip_center_y) / torso_length,
                elbow_y_norm: (elbow.y - hip_center_y) / torso_length,
                wrist_x_offset: (wrist.x - shoulder_center_x).abs() / shoulder_width,
                wrist: wrist.position(),
                elbow: elbow.position(),
            }
        };

        Self {
            torso_length,
            shoulder_width,
            shoulder_center_x,
            hip_center_y,
            nose_y_norm: (nose.y - hip_center_y) / torso_length,
            right: side(Side::Right),
            left: side(Side::Left),
        }
    }

    pub fn side(&self, side: Side) -> &SideMetrics {
        match side {
            Side::Right => &self.right,
            Side::Left => &self.left,
        }
    }

    /// Wrist height relative to the nose, in torso lengths (negative is above the head).
    pub fn wrist_to_head(&self, side: Side) -> f64 {
        self.side(side).wrist_y_norm - self.nose_y_norm
    }

    /// Elbow height relative to the nose, in torso lengths.
    pub fn elbow_to_head(&self, side: Side) -> f64 {
        self.side(side).elbow_y_norm - self.nose_y_norm
    }
}

/// Normalizes a frame's landmarks; a detection miss yields no metrics.
pub fn normalize(landmarks: Option<&LandmarkSet>) -> Option<NormalizedMetrics> {
    landmarks.map(NormalizedMetrics::from_landmarks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::Landmark;
    use approx::assert_relative_eq;

    fn upright_body() -> LandmarkSet {
        let mut set = LandmarkSet::from_points([Landmark::default(); BodyPoint::COUNT]);
        set.set(BodyPoint::RightShoulder, Landmark::new(0.45, 0.4, 1.0));
        set.set(BodyPoint::LeftShoulder, Landmark::new(0.55, 0.4, 1.0));
        set.set(BodyPoint::RightHip, Landmark::new(0.45, 0.7, 1.0));
        set.set(BodyPoint::LeftHip, Landmark::new(0.55, 0.7, 1.0));
        set.set(BodyPoint::Nose, Landmark::new(0.5, 0.3, 1.0));
        set.set(BodyPoint::RightWrist, Landmark::new(0.35, 0.55, 1.0));
        set.set(BodyPoint::RightElbow, Landmark::new(0.4, 0.6, 1.0));
        set.set(BodyPoint::LeftWrist, Landmark::new(0.6, 0.7, 1.0));
        set.set(BodyPoint::LeftElbow, Landmark::new(0.58, 0.55, 1.0));
        set
    }

    #[test]
    fn metrics_are_hip_relative_and_torso_scaled() {
        let metrics = NormalizedMetrics::from_landmarks(&upright_body());

        assert_relative_eq!(metrics.torso_length, 0.3, epsilon = 1e-5);
        assert_relative_eq!(metrics.shoulder_width, 0.1, epsilon = 1e-5);
        assert_relative_eq!(metrics.shoulder_center_x, 0.5, epsilon = 1e-12);
        assert_relative_eq!(metrics.right.wrist_y_norm, -0.5, epsilon = 1e-4);
        assert_relative_eq!(metrics.left.wrist_y_norm, 0.0, epsilon = 1e-9);
        assert_relative_eq!(metrics.right.wrist_x_offset, 1.5, epsilon = 1e-4);
        assert_relative_eq!(metrics.nose_y_norm, -4.0 / 3.0, epsilon = 1e-4);
        assert_relative_eq!(metrics.wrist_to_head(Side::Right), 0.8333, epsilon = 1e-3);
    }

    #[test]
    fn degenerate_pose_stays_finite() {
        let collapsed = LandmarkSet::from_points([Landmark::new(0.5, 0.5, 1.0); BodyPoint::COUNT]);
        let metrics = NormalizedMetrics::from_landmarks(&collapsed);

        assert!(metrics.torso_length > 0.0);
        assert!(metrics.shoulder_width > 0.0);
        assert!(metrics.right.wrist_y_norm.is_finite());
        assert!(metrics.right.wrist_x_offset.is_finite());
    }

    #[test]
    fn missing_landmarks_have_no_metrics() {
        assert!(normalize(None).is_none());
        assert!(normalize(Some(&upright_body())).is_some());
    }
}
