//! Phase-specific fitness of a single candidate.
//!
//! Scores are unbounded; only their relative order matters.

use crate::candidate::Candidate;
use crate::phase::ShotPhase;

const CONFIDENCE_WEIGHT: f64 = 50.0;

const POCKET_WRIST_IDEAL: f64 = 0.15;
const POCKET_WRIST_TOLERANCE: f64 = 0.25;
const POCKET_WRIST_WEIGHT: f64 = 20.0;
const POCKET_RISE_WEIGHT: f64 = 10.0;

const SET_WRIST_IDEAL: f64 = -0.05;
const SET_WRIST_TOLERANCE: f64 = 0.20;
const SET_WRIST_WEIGHT: f64 = 50.0;
const SET_VELOCITY_LIMIT: f64 = 0.3;
const SET_VELOCITY_WEIGHT: f64 = 35.0;
const SET_POSE_DELTA_LIMIT: f64 = 0.25;
const SET_POSE_DELTA_WEIGHT: f64 = 25.0;
const SET_OFFSET_LIMIT: f64 = 0.6;
const SET_OFFSET_WEIGHT: f64 = 15.0;

const FT_WRIST_IDEAL: f64 = -0.08;
const FT_WRIST_TOLERANCE: f64 = 0.28;
const FT_WRIST_WEIGHT: f64 = 50.0;
const FT_VELOCITY_LIMIT: f64 = 0.15;
const FT_VELOCITY_WEIGHT: f64 = 30.0;
const FT_FORWARD_WEIGHT: f64 = 10.0;
const FT_POSE_DELTA_LIMIT: f64 = 0.2;
const FT_POSE_DELTA_WEIGHT: f64 = 20.0;

const NOISE_PENALTY_WEIGHT: f64 = 10.0;
const NOISE_PENALTY_CAP: f64 = 10.0;

/// Bonus for being within `tolerance` of `ideal`, shrinking linearly to zero at the edge.
fn closeness(measured: f64, ideal: f64, tolerance: f64, weight: f64) -> f64 {
    (tolerance - (measured - ideal).abs()).max(0.0) * weight
}

/// Bonus for `measured` staying under `limit`, larger the further under it is.
fn below(measured: f64, limit: f64, weight: f64) -> f64 {
    (limit - measured).max(0.0) * weight
}

/// Scores `candidate` as a representative of `phase`.
///
/// `_reference` is the neighbouring candidate in a sequence (pocket for a set,
/// set for a follow-through); it is accepted for relative scoring but the
/// current formula scores each frame on its own.
pub fn score_candidate(
    candidate: &Candidate,
    phase: ShotPhase,
    _reference: Option<&Candidate>,
) -> f64 {
    let wrist = candidate.wrist_y_norm;
    let velocity = candidate.velocity_y;
    let pose_delta = candidate.pose_delta;
    let offset = candidate.wrist_x_offset;

    let mut score = candidate.confidence * CONFIDENCE_WEIGHT;

    score += match phase {
        ShotPhase::Pocket => {
            closeness(wrist, POCKET_WRIST_IDEAL, POCKET_WRIST_TOLERANCE, POCKET_WRIST_WEIGHT)
                // Upward motion out of the pocket has negative velocity.
                + (-velocity).max(0.0) * POCKET_RISE_WEIGHT
        }
        ShotPhase::Set => {
            closeness(wrist, SET_WRIST_IDEAL, SET_WRIST_TOLERANCE, SET_WRIST_WEIGHT)
                + below(velocity.abs(), SET_VELOCITY_LIMIT, SET_VELOCITY_WEIGHT)
                + below(pose_delta, SET_POSE_DELTA_LIMIT, SET_POSE_DELTA_WEIGHT)
                + below(offset, SET_OFFSET_LIMIT, SET_OFFSET_WEIGHT)
        }
        ShotPhase::FollowThrough => {
            closeness(wrist, FT_WRIST_IDEAL, FT_WRIST_TOLERANCE, FT_WRIST_WEIGHT)
                + below(velocity.abs(), FT_VELOCITY_LIMIT, FT_VELOCITY_WEIGHT)
                + offset * FT_FORWARD_WEIGHT
                + below(pose_delta, FT_POSE_DELTA_LIMIT, FT_POSE_DELTA_WEIGHT)
        }
    };

    score - (pose_delta * NOISE_PENALTY_WEIGHT).min(NOISE_PENALTY_CAP)
}
