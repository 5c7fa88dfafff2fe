pub mod candidate;
pub mod contracts;
pub mod error;
pub mod landmarks;
pub mod logs;
pub mod math;
pub mod normalize;
pub mod phase;
pub mod quality;
pub mod scoring;
pub mod sequence;
pub mod session;
pub mod temporal;

pub use error::{Result, SessionError};
pub use session::{run_session, SessionConfig, ShotSession};

#[cfg(test)]
mod tests {
    use crate::contracts::{FrameImage, FramePacket, PoseDetector};
    use crate::landmarks::LandmarkSet;
    use crate::phase::tests::{follow_through_pose, pocket_pose, set_pose};
    use crate::sequence::Sequence;
    use crate::session::{run_session, SessionConfig};

    #[test]
    fn three_phase_shot_selects_ordered_triplet() {
        struct Shot;

        impl PoseDetector for Shot {
            fn detect(&mut self, frame: &FramePacket) -> Option<LandmarkSet> {
                Some(match frame.frame_index {
                    0..=9 => pocket_pose(),
                    10..=19 => set_pose(),
                    _ => follow_through_pose(),
                })
            }
        }

        let frames = (0..30).map(|i| FramePacket::new(i, FrameImage::empty()));
        let selected = run_session(frames, &mut Shot, SessionConfig::default())
            .unwrap()
            .unwrap();

        let Sequence::Triplet {
            pocket,
            set,
            follow_through,
            score,
        } = selected
        else {
            panic!("expected a triplet");
        };
        assert!(pocket.frame_index < set.frame_index);
        assert!(set.frame_index < follow_through.frame_index);
        assert!(score > 20.0);
    }
}
