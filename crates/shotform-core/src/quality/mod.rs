//! Shot-form grading of a selected sequence.
//!
//! Each selected phase frame is flattened into the classifier's input layout
//! and judged by a [`QualityClassifier`]; passing phases earn points toward a
//! 9-point score.

use log::info;
use serde::{Deserialize, Serialize};

use crate::contracts::{QualityClassifier, QualityVerdict};
use crate::landmarks::{BodyPoint, LandmarkSet};
use crate::phase::ShotPhase;
use crate::sequence::Sequence;

/// Nine landmarks as (x, y, visibility) followed by a one-hot phase.
pub const CLASSIFIER_INPUT_LEN: usize = BodyPoint::COUNT * 3 + ShotPhase::ALL.len();

pub const MAX_SCORE: u32 = 9;

/// Builds the classifier input vector for one frame labelled `phase`.
pub fn classifier_input(landmarks: &LandmarkSet, phase: ShotPhase) -> Vec<f32> {
    let mut input = Vec::with_capacity(CLASSIFIER_INPUT_LEN);
    for (_, landmark) in landmarks.iter() {
        input.push(landmark.x as f32);
        input.push(landmark.y as f32);
        input.push(landmark.visibility as f32);
    }
    for candidate in ShotPhase::ALL {
        input.push(if candidate == phase { 1.0 } else { 0.0 });
    }
    input
}

fn phase_points(phase: ShotPhase) -> u32 {
    match phase {
        ShotPhase::Pocket => 2,
        ShotPhase::Set => 3,
        ShotPhase::FollowThrough => 4,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseGrade {
    pub phase: ShotPhase,
    /// Selected frame for this phase, if the sequence covers it.
    pub frame_index: Option<u64>,
    pub phase_confidence: Option<f64>,
    pub verdict: Option<QualityVerdict>,
}

impl PhaseGrade {
    pub fn passed(&self) -> bool {
        self.verdict.is_some_and(|v| v.passed)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotReport {
    pub score: u32,
    pub max_score: u32,
    pub is_broke: bool,
    pub message: String,
    /// One grade per phase in pocket, set, follow-through order.
    pub phases: Vec<PhaseGrade>,
}

/// Grades every phase of `sequence`; phases it does not cover fail.
pub fn grade_sequence<C>(sequence: Option<&Sequence>, classifier: &C) -> ShotReport
where
    C: QualityClassifier + ?Sized,
{
    let frames = sequence.map(Sequence::frames).unwrap_or_default();

    let phases: Vec<PhaseGrade> = ShotPhase::ALL
        .iter()
        .map(|&phase| match frames.iter().find(|(p, _)| *p == phase) {
            Some((_, candidate)) => PhaseGrade {
                phase,
                frame_index: Some(candidate.frame_index),
                phase_confidence: Some(candidate.confidence),
                verdict: Some(classifier.classify(&classifier_input(&candidate.landmarks, phase))),
            },
            None => PhaseGrade {
                phase,
                frame_index: None,
                phase_confidence: None,
                verdict: None,
            },
        })
        .collect();

    let score: u32 = phases
        .iter()
        .filter(|g| g.passed())
        .map(|g| phase_points(g.phase))
        .sum();
    let is_broke = score < MAX_SCORE;

    let message = if !is_broke {
        format!("Shot is BUTTER! Score: {score}/{MAX_SCORE}. Good form!")
    } else {
        let failing: Vec<&str> = phases
            .iter()
            .filter(|g| !g.passed())
            .map(|g| g.phase.display_name())
            .collect();
        let advice = if failing.len() == ShotPhase::ALL.len() {
            "All phases need improvement.".to_string()
        } else {
            format!("Improve: {}.", failing.join(", "))
        };
        format!("Shot is BROKE. Score: {score}/{MAX_SCORE}. {advice}")
    };

    info!(target: "shotform_core::quality", "{}", message);

    ShotReport {
        score,
        max_score: MAX_SCORE,
        is_broke,
        message,
        phases,
    }
}
