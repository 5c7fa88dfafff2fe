//! Groups detected frames into per-phase candidate pools.

use log::debug;

use crate::contracts::FrameImage;
use crate::landmarks::{LandmarkSet, Side};
use crate::phase::{PhaseLabel, ShotPhase};
use crate::session::{FrameObservation, FrameRecord};

/// Smoothed confidence an undefined frame needs to be reconsidered.
const FALLBACK_MIN_CONFIDENCE: f64 = 0.7;
/// Fallback wrist-height buckets (hip-relative, torso-normalized).
const FALLBACK_POCKET_ABOVE: f64 = 0.2;
const FALLBACK_SET_FLOOR: f64 = -0.1;

/// A frame nominated as a representative of one phase.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Pool the candidate was collected into.
    pub phase: ShotPhase,
    pub frame_index: u64,
    pub timestamp_seconds: f64,
    /// Smoothed phase confidence.
    pub confidence: f64,
    pub wrist_y_norm: f64,
    pub elbow_y_norm: f64,
    pub wrist_x_offset: f64,
    pub velocity_y: f64,
    pub velocity_x: f64,
    pub pose_delta: f64,
    pub landmarks: LandmarkSet,
    pub image: FrameImage,
}

/// Candidates for each phase, sorted by descending confidence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidatePools {
    pub pocket: Vec<Candidate>,
    pub set: Vec<Candidate>,
    pub follow_through: Vec<Candidate>,
}

impl CandidatePools {
    pub fn pool(&self, phase: ShotPhase) -> &[Candidate] {
        match phase {
            ShotPhase::Pocket => &self.pocket,
            ShotPhase::Set => &self.set,
            ShotPhase::FollowThrough => &self.follow_through,
        }
    }

    fn pool_mut(&mut self, phase: ShotPhase) -> &mut Vec<Candidate> {
        match phase {
            ShotPhase::Pocket => &mut self.pocket,
            ShotPhase::Set => &mut self.set,
            ShotPhase::FollowThrough => &mut self.follow_through,
        }
    }

    /// Adds a candidate to the pool named by its phase.
    pub fn push(&mut self, candidate: Candidate) {
        self.pool_mut(candidate.phase).push(candidate);
    }

    /// Sorts every pool by descending confidence; equal confidences keep frame order.
    pub fn sort(&mut self) {
        for phase in ShotPhase::ALL {
            self.pool_mut(phase)
                .sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        }
    }

    /// Keeps only the `max` most confident candidates of each pool.
    pub fn truncate(&mut self, max: usize) {
        for phase in ShotPhase::ALL {
            self.pool_mut(phase).truncate(max);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn len(&self) -> usize {
        self.pocket.len() + self.set.len() + self.follow_through.len()
    }

    /// All candidates, pocket pool first, then set, then follow-through.
    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.pocket
            .iter()
            .chain(self.set.iter())
            .chain(self.follow_through.iter())
    }
}

/// Buckets an undefined frame by wrist height alone.
pub fn fallback_phase(wrist_y_norm: f64) -> ShotPhase {
    if wrist_y_norm > FALLBACK_POCKET_ABOVE {
        ShotPhase::Pocket
    } else if wrist_y_norm >= FALLBACK_SET_FLOOR {
        ShotPhase::Set
    } else {
        ShotPhase::FollowThrough
    }
}

/// Builds sorted candidate pools from a session's frames using the dominant arm.
///
/// Frames without landmarks never become candidates. Undefined frames are
/// kept only when their smoothed confidence exceeds 0.7, bucketed with
/// [`fallback_phase`].
pub fn collect_candidates(records: &[FrameRecord], dominant: Side) -> CandidatePools {
    let mut pools = CandidatePools::default();
    let mut recovered = 0usize;

    for record in records {
        let FrameObservation::Detected(detected) = &record.observation else {
            continue;
        };
        let arm = detected.metrics.side(dominant);
        let motion = detected.motion.side(dominant);

        let phase = match detected.estimate.label {
            PhaseLabel::Phase(phase) => phase,
            PhaseLabel::Undefined if record.smoothed_confidence > FALLBACK_MIN_CONFIDENCE => {
                recovered += 1;
                fallback_phase(arm.wrist_y_norm)
            }
            PhaseLabel::Undefined => continue,
        };

        pools.push(Candidate {
            phase,
            frame_index: record.frame_index,
            timestamp_seconds: record.timestamp_seconds,
            confidence: record.smoothed_confidence,
            wrist_y_norm: arm.wrist_y_norm,
            elbow_y_norm: arm.elbow_y_norm,
            wrist_x_offset: arm.wrist_x_offset,
            velocity_y: motion.velocity_y,
            velocity_x: motion.velocity_x,
            pose_delta: motion.pose_delta,
            landmarks: detected.landmarks,
            image: record.image.clone(),
        });
    }

    pools.sort();
    debug!(target: "shotform_core::candidate",
        "collected pocket={} set={} follow_through={} ({} recovered from undefined)",
        pools.pocket.len(),
        pools.set.len(),
        pools.follow_through.len(),
        recovered
    );
    pools
}
