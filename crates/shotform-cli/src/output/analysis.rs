use shotform_core::candidate::CandidatePools;
use shotform_core::phase::ShotPhase;
use shotform_core::quality::ShotReport;
use shotform_core::scoring::score_candidate;
use shotform_core::sequence::Sequence;
use shotform_core::ShotSession;

use crate::output::{CandidateCounts, Metadata, ProcessingOutput, SelectedFrame, Selection};
use crate::types::SessionData;

/// Collects the results of one session into the output document
pub struct AnalysisCollector {
    session: SessionData,
    frame_rate: f64,
    report: Option<ShotReport>,
    include_trace: bool,
}

impl AnalysisCollector {
    pub fn new(session: SessionData, frame_rate: f64) -> Self {
        Self {
            session,
            frame_rate,
            report: None,
            include_trace: false,
        }
    }

    pub fn set_report(&mut self, report: ShotReport) {
        self.report = Some(report);
    }

    pub fn include_trace(&mut self, include: bool) {
        self.include_trace = include;
    }

    pub fn finalize(self, shot: &ShotSession, sequence: Option<&Sequence>) -> ProcessingOutput {
        let AnalysisCollector {
            session,
            frame_rate,
            report,
            include_trace,
        } = self;

        let pools = shot.candidate_pools();

        ProcessingOutput {
            metadata: Metadata {
                session_name: session.name.clone(),
                trace_file: session.trace_file.display().to_string(),
                processing_timestamp: chrono::Utc::now().to_rfc3339(),
                frame_count: shot.frames().len(),
                detected_frame_count: shot.detected_frame_count(),
                frame_rate,
                dominant_hand: shot.dominant_hand(),
            },
            selection: sequence.map(selection),
            candidates: candidate_counts(&pools),
            report,
            trace: include_trace.then(|| shot.trace().entries().to_vec()),
        }
    }
}

fn selection(sequence: &Sequence) -> Selection {
    let pair_type = match sequence {
        Sequence::Pair { kind, .. } => Some(*kind),
        _ => None,
    };

    Selection {
        kind: sequence.kind_name().to_string(),
        pair_type,
        score: sequence.score(),
        frames: sequence
            .frames()
            .into_iter()
            .map(|(phase, candidate)| SelectedFrame {
                phase,
                frame_index: candidate.frame_index,
                timestamp_seconds: candidate.timestamp_seconds,
                confidence: candidate.confidence,
                candidate_score: score_candidate(candidate, phase, None),
            })
            .collect(),
    }
}

fn candidate_counts(pools: &CandidatePools) -> CandidateCounts {
    CandidateCounts {
        pocket: pools.pool(ShotPhase::Pocket).len(),
        set: pools.pool(ShotPhase::Set).len(),
        follow_through: pools.pool(ShotPhase::FollowThrough).len(),
    }
}
