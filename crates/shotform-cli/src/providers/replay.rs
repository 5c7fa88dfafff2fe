use std::collections::HashMap;

use shotform_core::contracts::{FrameImage, FramePacket, PoseDetector};
use shotform_core::landmarks::LandmarkSet;

use crate::landmarks::TraceFrame;

/// Pose detector that replays landmarks recorded in a trace
///
/// Frames are looked up by index, so the frame source may skip rows of the
/// trace freely.
#[derive(Debug, Default)]
pub struct ReplayPoseDetector {
    landmarks: HashMap<u64, LandmarkSet>,
}

impl ReplayPoseDetector {
    pub fn new(frames: &[TraceFrame]) -> Self {
        let landmarks = frames
            .iter()
            .filter_map(|f| f.landmarks.map(|set| (f.frame_index, set)))
            .collect();
        Self { landmarks }
    }

    /// Frame packets for the recorded frames, keeping every `sample_rate`-th
    /// frame index and at most `max_frames` of them.
    pub fn packets(
        frames: &[TraceFrame],
        sample_rate: usize,
        max_frames: Option<usize>,
    ) -> Vec<FramePacket> {
        let sample_rate = sample_rate.max(1) as u64;
        frames
            .iter()
            .filter(|f| f.frame_index % sample_rate == 0)
            .take(max_frames.unwrap_or(usize::MAX))
            .map(|f| FramePacket::new(f.frame_index, FrameImage::empty()))
            .collect()
    }
}

impl PoseDetector for ReplayPoseDetector {
    fn detect(&mut self, frame: &FramePacket) -> Option<LandmarkSet> {
        self.landmarks.get(&frame.frame_index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shotform_core::landmarks::{BodyPoint, Landmark};

    fn trace() -> Vec<TraceFrame> {
        let set = LandmarkSet::from_points([Landmark::new(0.5, 0.5, 1.0); BodyPoint::COUNT]);
        (0..10)
            .map(|i| TraceFrame {
                frame_index: i,
                landmarks: (i % 3 != 0).then_some(set),
            })
            .collect()
    }

    #[test]
    fn replays_recorded_landmarks() {
        let frames = trace();
        let mut detector = ReplayPoseDetector::new(&frames);

        assert!(detector
            .detect(&FramePacket::new(0, FrameImage::empty()))
            .is_none());
        assert!(detector
            .detect(&FramePacket::new(4, FrameImage::empty()))
            .is_some());
        assert!(detector
            .detect(&FramePacket::new(42, FrameImage::empty()))
            .is_none());
    }

    #[test]
    fn packets_are_sampled_then_capped() {
        let frames = trace();
        let indices: Vec<u64> = ReplayPoseDetector::packets(&frames, 2, Some(3))
            .iter()
            .map(|p| p.frame_index)
            .collect();
        assert_eq!(indices, vec![0, 2, 4]);

        assert_eq!(ReplayPoseDetector::packets(&frames, 1, None).len(), 10);
    }
}
