use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Body points tracked for jump-shot analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyPoint {
    RightWrist,
    LeftWrist,
    RightElbow,
    LeftElbow,
    RightShoulder,
    LeftShoulder,
    RightHip,
    LeftHip,
    Nose,
}

impl BodyPoint {
    pub const COUNT: usize = 9;

    /// Canonical ordering used for storage, CSV columns and classifier input.
    pub const ALL: [BodyPoint; Self::COUNT] = [
        BodyPoint::RightWrist,
        BodyPoint::LeftWrist,
        BodyPoint::RightElbow,
        BodyPoint::LeftElbow,
        BodyPoint::RightShoulder,
        BodyPoint::LeftShoulder,
        BodyPoint::RightHip,
        BodyPoint::LeftHip,
        BodyPoint::Nose,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            BodyPoint::RightWrist => "right_wrist",
            BodyPoint::LeftWrist => "left_wrist",
            BodyPoint::RightElbow => "right_elbow",
            BodyPoint::LeftElbow => "left_elbow",
            BodyPoint::RightShoulder => "right_shoulder",
            BodyPoint::LeftShoulder => "left_shoulder",
            BodyPoint::RightHip => "right_hip",
            BodyPoint::LeftHip => "left_hip",
            BodyPoint::Nose => "nose",
        }
    }
}

/// Body side used to pick the shooting arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    #[default]
    Right,
    Left,
}

impl Side {
    pub fn wrist(self) -> BodyPoint {
        match self {
            Side::Right => BodyPoint::RightWrist,
            Side::Left => BodyPoint::LeftWrist,
        }
    }

    pub fn elbow(self) -> BodyPoint {
        match self {
            Side::Right => BodyPoint::RightElbow,
            Side::Left => BodyPoint::LeftElbow,
        }
    }

    pub fn shoulder(self) -> BodyPoint {
        match self {
            Side::Right => BodyPoint::RightShoulder,
            Side::Left => BodyPoint::LeftShoulder,
        }
    }
}

/// A single keypoint in image-normalized coordinates (0..1, y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    pub visibility: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64, visibility: f64) -> Self {
        Self { x, y, visibility }
    }

    pub fn position(&self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }
}

/// The nine named keypoints produced by the pose detector for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandmarkSet {
    points: [Landmark; BodyPoint::COUNT],
}

impl LandmarkSet {
    /// Builds a set from landmarks given in [`BodyPoint::ALL`] order.
    pub fn from_points(points: [Landmark; BodyPoint::COUNT]) -> Self {
        Self { points }
    }

    pub fn get(&self, point: BodyPoint) -> Landmark {
        self.points[point.index()]
    }

    pub fn set(&mut self, point: BodyPoint, landmark: Landmark) {
        self.points[point.index()] = landmark;
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyPoint, Landmark)> + '_ {
        BodyPoint::ALL.iter().map(move |p| (*p, self.points[p.index()]))
    }

    /// Side whose wrist sits further left in the image for this frame.
    ///
    /// The per-frame scorer uses this as its shooting arm because the
    /// session-wide dominant hand is only known after every frame is seen.
    pub fn leading_side(&self) -> Side {
        if self.get(BodyPoint::RightWrist).x < self.get(BodyPoint::LeftWrist).x {
            Side::Right
        } else {
            Side::Left
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_point_order_matches_indices() {
        for (i, point) in BodyPoint::ALL.iter().enumerate() {
            assert_eq!(point.index(), i);
        }
        assert_eq!(BodyPoint::Nose.name(), "nose");
    }

    #[test]
    fn leading_side_follows_wrist_x() {
        let mut set = LandmarkSet::from_points([Landmark::default(); BodyPoint::COUNT]);
        set.set(BodyPoint::RightWrist, Landmark::new(0.3, 0.5, 1.0));
        set.set(BodyPoint::LeftWrist, Landmark::new(0.6, 0.5, 1.0));
        assert_eq!(set.leading_side(), Side::Right);

        set.set(BodyPoint::RightWrist, Landmark::new(0.7, 0.5, 1.0));
        assert_eq!(set.leading_side(), Side::Left);
    }
}
