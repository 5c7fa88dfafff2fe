//! Best temporally-ordered combination of phase candidates.
//!
//! Selection is a strict cascade: a triplet clearing its threshold always
//! wins, otherwise the best pair clearing its own threshold, otherwise the
//! single most confident candidate. Empty pools yield no sequence.

use std::fmt;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::candidate::{Candidate, CandidatePools};
use crate::phase::ShotPhase;
use crate::scoring::score_candidate;

/// Time gap (seconds, exclusive bounds) that earns a chronology bonus.
const GAP_MIN_SECONDS: f64 = 0.03;
const GAP_MAX_SECONDS: f64 = 2.5;
const POCKET_SET_GAP_BONUS: f64 = 15.0;
const SET_FT_GAP_BONUS: f64 = 20.0;
const POCKET_SET_HEIGHT_BONUS: f64 = 10.0;
const SET_FT_HEIGHT_BONUS: f64 = 12.0;
const SET_PAUSE_VELOCITY: f64 = 0.06;
const SET_PAUSE_POSE_DELTA: f64 = 0.12;
const SET_PAUSE_BONUS: f64 = 20.0;
const FT_HOLD_VELOCITY: f64 = 0.05;
const FT_HOLD_BONUS: f64 = 12.0;
const MIN_FRAME_GAP: u64 = 2;
const NEAR_DUPLICATE_PENALTY: f64 = 10.0;

const PAIR_POCKET_SET_HEIGHT_BONUS: f64 = 12.0;
const PAIR_POCKET_SET_PAUSE_VELOCITY: f64 = 0.1;
const PAIR_POCKET_SET_PAUSE_BONUS: f64 = 12.0;
const PAIR_SET_FT_HEIGHT_BONUS: f64 = 8.0;
const PAIR_SET_FT_HOLD_BONUS: f64 = 8.0;
const PAIR_POCKET_FT_HEIGHT_BONUS: f64 = 5.0;

/// Which two phases a pair covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairKind {
    PocketSet,
    SetFollowThrough,
    PocketFollowThrough,
}

impl PairKind {
    pub const ALL: [PairKind; 3] = [
        PairKind::PocketSet,
        PairKind::SetFollowThrough,
        PairKind::PocketFollowThrough,
    ];

    /// The earlier and later phase of the pair.
    pub fn phases(self) -> (ShotPhase, ShotPhase) {
        match self {
            PairKind::PocketSet => (ShotPhase::Pocket, ShotPhase::Set),
            PairKind::SetFollowThrough => (ShotPhase::Set, ShotPhase::FollowThrough),
            PairKind::PocketFollowThrough => (ShotPhase::Pocket, ShotPhase::FollowThrough),
        }
    }
}

impl fmt::Display for PairKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PairKind::PocketSet => "pocket_set",
            PairKind::SetFollowThrough => "set_follow_through",
            PairKind::PocketFollowThrough => "pocket_follow_through",
        })
    }
}

/// The frames chosen to represent a shot.
#[derive(Debug, Clone, PartialEq)]
pub enum Sequence {
    Triplet {
        pocket: Candidate,
        set: Candidate,
        follow_through: Candidate,
        score: f64,
    },
    Pair {
        kind: PairKind,
        first: Candidate,
        second: Candidate,
        score: f64,
    },
    /// Score is the candidate's smoothed confidence.
    Single { candidate: Candidate, score: f64 },
}

impl Sequence {
    pub fn score(&self) -> f64 {
        match self {
            Sequence::Triplet { score, .. }
            | Sequence::Pair { score, .. }
            | Sequence::Single { score, .. } => *score,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Sequence::Triplet { .. } => "triplet",
            Sequence::Pair { .. } => "pair",
            Sequence::Single { .. } => "single",
        }
    }

    /// Selected frames with the phase each one represents, in chronological order.
    pub fn frames(&self) -> Vec<(ShotPhase, &Candidate)> {
        match self {
            Sequence::Triplet {
                pocket,
                set,
                follow_through,
                ..
            } => vec![
                (ShotPhase::Pocket, pocket),
                (ShotPhase::Set, set),
                (ShotPhase::FollowThrough, follow_through),
            ],
            Sequence::Pair {
                kind,
                first,
                second,
                ..
            } => {
                let (a, b) = kind.phases();
                vec![(a, first), (b, second)]
            }
            Sequence::Single { candidate, .. } => vec![(candidate.phase, candidate)],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Per-pool cap applied before the combinatorial search.
    pub max_candidates: usize,
    /// A triplet must score strictly above this to be accepted.
    pub triplet_threshold: f64,
    /// A pair must score strictly above this to be accepted.
    pub pair_threshold: f64,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            max_candidates: 8,
            triplet_threshold: 20.0,
            pair_threshold: 15.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SequenceSelector {
    config: SelectorConfig,
}

impl SequenceSelector {
    pub fn new(config: SelectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// Runs the triplet → pair → single cascade over `pools`.
    pub fn select(&self, pools: &CandidatePools) -> Option<Sequence> {
        if pools.is_empty() {
            info!("no phase candidates, nothing to select");
            return None;
        }

        let mut pools = pools.clone();
        pools.sort();
        pools.truncate(self.config.max_candidates);

        if let Some(triplet) = best_triplet(&pools) {
            if triplet.score() > self.config.triplet_threshold {
                info!("selected triplet with score {:.2}", triplet.score());
                return Some(triplet);
            }
            debug!(target: "shotform_core::sequence",
                "best triplet score {:.2} below threshold {:.2}",
                triplet.score(), self.config.triplet_threshold
            );
        }

        if let Some(pair) = best_pair(&pools) {
            if pair.score() > self.config.pair_threshold {
                info!("selected pair with score {:.2}", pair.score());
                return Some(pair);
            }
            debug!(target: "shotform_core::sequence",
                "best pair score {:.2} below threshold {:.2}",
                pair.score(), self.config.pair_threshold
            );
        }

        let single = best_single(&pools)?;
        info!(
            "fell back to single frame {} ({:?}, confidence {:.2})",
            single.frame_index, single.phase, single.confidence
        );
        Some(Sequence::Single {
            score: single.confidence,
            candidate: single.clone(),
        })
    }
}

fn gap_is_realistic(earlier: &Candidate, later: &Candidate) -> bool {
    let gap = later.timestamp_seconds - earlier.timestamp_seconds;
    gap > GAP_MIN_SECONDS && gap < GAP_MAX_SECONDS
}

fn is_higher(later: &Candidate, earlier: &Candidate) -> bool {
    later.wrist_y_norm < earlier.wrist_y_norm
}

fn triplet_score(pocket: &Candidate, set: &Candidate, follow_through: &Candidate) -> f64 {
    let mut total = score_candidate(pocket, ShotPhase::Pocket, None)
        + score_candidate(set, ShotPhase::Set, Some(pocket))
        + score_candidate(follow_through, ShotPhase::FollowThrough, Some(set));

    if gap_is_realistic(pocket, set) {
        total += POCKET_SET_GAP_BONUS;
    }
    if gap_is_realistic(set, follow_through) {
        total += SET_FT_GAP_BONUS;
    }
    if is_higher(set, pocket) {
        total += POCKET_SET_HEIGHT_BONUS;
    }
    if is_higher(follow_through, set) {
        total += SET_FT_HEIGHT_BONUS;
    }
    if set.velocity_y.abs() < SET_PAUSE_VELOCITY && set.pose_delta < SET_PAUSE_POSE_DELTA {
        total += SET_PAUSE_BONUS;
    }
    if follow_through.velocity_y.abs() < FT_HOLD_VELOCITY {
        total += FT_HOLD_BONUS;
    }
    if set.frame_index - pocket.frame_index < MIN_FRAME_GAP {
        total -= NEAR_DUPLICATE_PENALTY;
    }
    if follow_through.frame_index - set.frame_index < MIN_FRAME_GAP {
        total -= NEAR_DUPLICATE_PENALTY;
    }
    total
}

/// Exhaustive search over chronologically ordered (pocket, set, follow-through) triples.
fn best_triplet(pools: &CandidatePools) -> Option<Sequence> {
    let mut best: Option<(f64, &Candidate, &Candidate, &Candidate)> = None;

    for pocket in &pools.pocket {
        for set in &pools.set {
            if set.frame_index <= pocket.frame_index {
                continue;
            }
            for follow_through in &pools.follow_through {
                if follow_through.frame_index <= set.frame_index {
                    continue;
                }
                let total = triplet_score(pocket, set, follow_through);
                if best.map_or(true, |(score, ..)| total > score) {
                    best = Some((total, pocket, set, follow_through));
                }
            }
        }
    }

    best.map(|(score, pocket, set, follow_through)| Sequence::Triplet {
        pocket: pocket.clone(),
        set: set.clone(),
        follow_through: follow_through.clone(),
        score,
    })
}

fn pair_score(kind: PairKind, first: &Candidate, second: &Candidate) -> f64 {
    let (a, b) = kind.phases();
    let mut total = score_candidate(first, a, None) + score_candidate(second, b, None);

    match kind {
        PairKind::PocketSet => {
            if is_higher(second, first) {
                total += PAIR_POCKET_SET_HEIGHT_BONUS;
            }
            if second.velocity_y.abs() < PAIR_POCKET_SET_PAUSE_VELOCITY {
                total += PAIR_POCKET_SET_PAUSE_BONUS;
            }
        }
        PairKind::SetFollowThrough => {
            if is_higher(second, first) {
                total += PAIR_SET_FT_HEIGHT_BONUS;
            }
            if second.velocity_y.abs() < FT_HOLD_VELOCITY {
                total += PAIR_SET_FT_HOLD_BONUS;
            }
        }
        PairKind::PocketFollowThrough => {
            if is_higher(second, first) {
                total += PAIR_POCKET_FT_HEIGHT_BONUS;
            }
        }
    }
    total
}

/// Best chronologically ordered pair across all three pair kinds.
fn best_pair(pools: &CandidatePools) -> Option<Sequence> {
    let mut best: Option<(f64, PairKind, &Candidate, &Candidate)> = None;

    for kind in PairKind::ALL {
        let (a, b) = kind.phases();
        for first in pools.pool(a) {
            for second in pools.pool(b) {
                if second.frame_index <= first.frame_index {
                    continue;
                }
                let total = pair_score(kind, first, second);
                if best.map_or(true, |(score, ..)| total > score) {
                    best = Some((total, kind, first, second));
                }
            }
        }
    }

    best.map(|(score, kind, first, second)| Sequence::Pair {
        kind,
        first: first.clone(),
        second: second.clone(),
        score,
    })
}

fn best_single(pools: &CandidatePools) -> Option<&Candidate> {
    pools.iter().fold(None, |best: Option<&Candidate>, candidate| match best {
        Some(b) if candidate.confidence <= b.confidence => Some(b),
        _ => Some(candidate),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::tests::candidate;
    use approx::assert_relative_eq;

    fn pools(candidates: Vec<Candidate>) -> CandidatePools {
        let mut pools = CandidatePools::default();
        for c in candidates {
            pools.push(c);
        }
        pools.sort();
        pools
    }

    fn at(phase: ShotPhase, frame_index: u64, confidence: f64, wrist_y_norm: f64) -> Candidate {
        let mut c = candidate(phase, frame_index, confidence);
        c.wrist_y_norm = wrist_y_norm;
        c
    }

    #[test]
    fn empty_pools_select_nothing() {
        assert!(SequenceSelector::default().select(&CandidatePools::default()).is_none());
    }

    #[test]
    fn lone_pocket_falls_back_to_single() {
        let selected = SequenceSelector::default()
            .select(&pools(vec![at(ShotPhase::Pocket, 12, 0.8, 0.1)]))
            .unwrap();
        match selected {
            Sequence::Single { candidate, score } => {
                assert_eq!(candidate.frame_index, 12);
                assert_relative_eq!(score, 0.8);
            }
            other => panic!("expected single, got {:?}", other),
        }
    }

    #[test]
    fn well_spaced_ordered_phases_form_a_triplet() {
        let selected = SequenceSelector::default()
            .select(&pools(vec![
                at(ShotPhase::Pocket, 10, 0.9, 0.15),
                at(ShotPhase::Set, 30, 0.95, -0.05),
                at(ShotPhase::FollowThrough, 50, 0.92, -0.08),
            ]))
            .unwrap();

        match &selected {
            Sequence::Triplet {
                pocket,
                set,
                follow_through,
                score,
            } => {
                assert_eq!(
                    (pocket.frame_index, set.frame_index, follow_through.frame_index),
                    (10, 30, 50)
                );
                assert!(*score > 20.0);
            }
            other => panic!("expected triplet, got {:?}", other),
        }
        let phases: Vec<ShotPhase> = selected.frames().iter().map(|(p, _)| *p).collect();
        assert_eq!(phases, ShotPhase::ALL.to_vec());
    }

    #[test]
    fn triplet_bonuses_add_up() {
        let pocket = at(ShotPhase::Pocket, 0, 0.0, 5.0);
        let set = at(ShotPhase::Set, 1, 0.0, 4.0);
        let follow_through = at(ShotPhase::FollowThrough, 2, 0.0, 3.0);
        // Set base: velocity 10.5 + pose 6.25 + offset 9. FT base: velocity 4.5 + pose 4.
        // Bonuses: gaps 15 + 20, heights 10 + 12, pause 20, hold 12, duplicates -20.
        let expected = 25.75 + 8.5 + 35.0 + 22.0 + 32.0 - 20.0;
        assert_relative_eq!(triplet_score(&pocket, &set, &follow_through), expected, epsilon = 1e-9);
    }

    #[test]
    fn triplet_wins_over_a_larger_pair() {
        // A low-scoring triplet that still clears its threshold must beat the
        // pair tier even though a pair would score higher on its own.
        let selected = SequenceSelector::default()
            .select(&pools(vec![
                at(ShotPhase::Pocket, 10, 0.0, 5.0),
                at(ShotPhase::Set, 30, 0.0, 5.0),
                at(ShotPhase::FollowThrough, 50, 0.0, 5.0),
                at(ShotPhase::Set, 5, 1.0, -0.05),
                at(ShotPhase::FollowThrough, 8, 1.0, -0.08),
            ]))
            .unwrap();
        assert_eq!(selected.kind_name(), "triplet");
    }

    #[test]
    fn out_of_order_pair_is_never_formed() {
        let selected = SequenceSelector::default()
            .select(&pools(vec![
                at(ShotPhase::Pocket, 100, 0.9, 0.15),
                at(ShotPhase::Set, 99, 0.9, -0.05),
            ]))
            .unwrap();
        match selected {
            Sequence::Single { candidate, .. } => assert_eq!(candidate.frame_index, 100),
            other => panic!("expected single, got {:?}", other),
        }
    }

    #[test]
    fn missing_phase_degrades_to_pair() {
        let selected = SequenceSelector::default()
            .select(&pools(vec![
                at(ShotPhase::Set, 30, 0.9, -0.05),
                at(ShotPhase::FollowThrough, 45, 0.85, -0.08),
            ]))
            .unwrap();
        match selected {
            Sequence::Pair {
                kind,
                first,
                second,
                score,
            } => {
                assert_eq!(kind, PairKind::SetFollowThrough);
                assert!(first.frame_index < second.frame_index);
                assert!(score > 15.0);
            }
            other => panic!("expected pair, got {:?}", other),
        }
    }

    #[test]
    fn candidates_beyond_the_cap_are_ignored() {
        let mut candidates: Vec<Candidate> = (0..8)
            .map(|i| at(ShotPhase::Pocket, 20 + i, 0.9, 0.15))
            .collect();
        // Only chronologically valid pocket, but least confident: capped away.
        candidates.push(at(ShotPhase::Pocket, 1, 0.1, 0.15));
        candidates.push(at(ShotPhase::Set, 10, 0.9, -0.05));
        candidates.push(at(ShotPhase::FollowThrough, 15, 0.9, -0.08));

        let selected = SequenceSelector::default().select(&pools(candidates)).unwrap();
        assert_eq!(selected.kind_name(), "pair");
        match selected {
            Sequence::Pair { kind, .. } => assert_eq!(kind, PairKind::SetFollowThrough),
            _ => unreachable!(),
        }
    }
}
