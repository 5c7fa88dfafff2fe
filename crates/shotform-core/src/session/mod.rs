//! One video's analysis session: owns every per-video accumulator and drives
//! frames through normalization, phase scoring, smoothing and motion
//! estimation, then candidate collection and sequence selection.

use log::{debug, info};

use crate::candidate::{collect_candidates, CandidatePools};
use crate::contracts::{FrameImage, FramePacket, PoseDetector};
use crate::error::{Result, SessionError};
use crate::landmarks::{LandmarkSet, Side};
use crate::logs::{DiagnosticTrace, FrameTraceEntry};
use crate::normalize::NormalizedMetrics;
use crate::phase::{PhaseEstimate, PhaseLabel, PhaseScorer};
use crate::sequence::{SelectorConfig, Sequence, SequenceSelector};
use crate::temporal::{
    estimate_motion, ConfidenceSmoother, DominantHandTally, FrameMotion, DEFAULT_SMOOTHING_WINDOW,
};

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Source frame rate used to derive timestamps from frame indices.
    pub frame_rate: f64,
    pub smoothing_window: usize,
    pub scorer: PhaseScorer,
    pub selector: SelectorConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            frame_rate: 30.0,
            smoothing_window: DEFAULT_SMOOTHING_WINDOW,
            scorer: PhaseScorer::default(),
            selector: SelectorConfig::default(),
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.frame_rate.is_finite() && self.frame_rate > 0.0) {
            return Err(SessionError::InvalidConfig(format!(
                "frame rate must be positive, got {}",
                self.frame_rate
            )));
        }
        if self.smoothing_window == 0 {
            return Err(SessionError::InvalidConfig(
                "smoothing window must hold at least one frame".to_string(),
            ));
        }
        if self.selector.max_candidates == 0 {
            return Err(SessionError::InvalidConfig(
                "candidate cap must be at least one".to_string(),
            ));
        }
        Ok(())
    }
}

/// Everything derived from a frame whose landmarks were detected.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedFrame {
    pub landmarks: LandmarkSet,
    pub metrics: NormalizedMetrics,
    pub estimate: PhaseEstimate,
    /// Motion against the immediately preceding frame, zero if it was missed.
    pub motion: FrameMotion,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FrameObservation {
    Missed,
    Detected(DetectedFrame),
}

/// One sampled frame and everything measured on it.
#[derive(Debug, Clone)]
pub struct FrameRecord {
    pub frame_index: u64,
    pub timestamp_seconds: f64,
    pub image: FrameImage,
    pub observation: FrameObservation,
    pub smoothed_confidence: f64,
}

impl FrameRecord {
    pub fn detected(&self) -> Option<&DetectedFrame> {
        match &self.observation {
            FrameObservation::Detected(detected) => Some(detected),
            FrameObservation::Missed => None,
        }
    }

    pub fn raw_confidence(&self) -> f64 {
        self.detected().map_or(0.0, |d| d.estimate.confidence)
    }
}

/// Analysis state for a single video. Not shared between videos.
#[derive(Debug)]
pub struct ShotSession {
    config: SessionConfig,
    selector: SequenceSelector,
    smoother: ConfidenceSmoother,
    tally: DominantHandTally,
    records: Vec<FrameRecord>,
    trace: DiagnosticTrace,
}

impl ShotSession {
    pub fn new(config: SessionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            selector: SequenceSelector::new(config.selector),
            smoother: ConfidenceSmoother::new(config.smoothing_window),
            tally: DominantHandTally::new(),
            records: Vec::new(),
            trace: DiagnosticTrace::default(),
            config,
        })
    }

    /// Runs a whole frame source through a new session.
    ///
    /// A source that yields no frames is an error; frames without detections are not.
    pub fn run<I, D>(frames: I, detector: &mut D, config: SessionConfig) -> Result<Self>
    where
        I: IntoIterator<Item = FramePacket>,
        D: PoseDetector + ?Sized,
    {
        let mut session = Self::new(config)?;
        for packet in frames {
            session.ingest_detected(packet, detector)?;
        }
        if session.records.is_empty() {
            return Err(SessionError::NoFrames);
        }
        info!(target: "shotform_core::session",
            "session ingested {} frames ({} with landmarks)",
            session.records.len(),
            session.detected_frame_count()
        );
        Ok(session)
    }

    /// Detects landmarks on `packet` and ingests the result.
    pub fn ingest_detected<D>(&mut self, packet: FramePacket, detector: &mut D) -> Result<&FrameRecord>
    where
        D: PoseDetector + ?Sized,
    {
        let landmarks = detector.detect(&packet);
        self.ingest(packet, landmarks)
    }

    /// Appends one frame with its (possibly missing) landmarks.
    pub fn ingest(
        &mut self,
        packet: FramePacket,
        landmarks: Option<LandmarkSet>,
    ) -> Result<&FrameRecord> {
        if let Some(last) = self.records.last() {
            if packet.frame_index <= last.frame_index {
                return Err(SessionError::NonMonotonicFrame {
                    previous: last.frame_index,
                    index: packet.frame_index,
                });
            }
        }

        let timestamp_seconds = packet.frame_index as f64 / self.config.frame_rate;
        let previous_metrics = self
            .records
            .last()
            .and_then(FrameRecord::detected)
            .map(|d| d.metrics);

        let observation = match landmarks {
            Some(landmarks) => {
                let metrics = NormalizedMetrics::from_landmarks(&landmarks);
                let estimate = self.config.scorer.classify(&landmarks, &metrics);
                let motion = estimate_motion(previous_metrics.as_ref(), &metrics);
                self.tally.record(&metrics);
                debug!(target: "shotform_core::session",
                    "frame {}: {:?} confidence {:.2}",
                    packet.frame_index, estimate.label, estimate.confidence
                );
                FrameObservation::Detected(DetectedFrame {
                    landmarks,
                    metrics,
                    estimate,
                    motion,
                })
            }
            None => {
                debug!(target: "shotform_core::session",
                    "frame {}: no landmarks detected", packet.frame_index
                );
                FrameObservation::Missed
            }
        };

        let mut record = FrameRecord {
            frame_index: packet.frame_index,
            timestamp_seconds,
            image: packet.image,
            observation,
            smoothed_confidence: 0.0,
        };
        let raw_confidence = record.raw_confidence();
        record.smoothed_confidence = self.smoother.update(raw_confidence);

        self.trace.push(FrameTraceEntry {
            frame_index: record.frame_index,
            timestamp_seconds,
            label: record
                .detected()
                .map_or(PhaseLabel::Undefined, |d| d.estimate.label),
            raw_confidence,
            smoothed_confidence: record.smoothed_confidence,
            motion: record.detected().map(|d| d.motion),
        });

        self.records.push(record);
        Ok(&self.records[self.records.len() - 1])
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn frames(&self) -> &[FrameRecord] {
        &self.records
    }

    pub fn detected_frame_count(&self) -> usize {
        self.tally.frame_count()
    }

    /// Per-frame smoothed confidences and motion signals.
    pub fn trace(&self) -> &DiagnosticTrace {
        &self.trace
    }

    pub fn dominant_hand(&self) -> Side {
        self.tally.resolve()
    }

    pub fn candidate_pools(&self) -> CandidatePools {
        collect_candidates(&self.records, self.dominant_hand())
    }

    /// Chooses the frames representing the shot, or `None` when no frame had landmarks.
    pub fn select(&self) -> Option<Sequence> {
        let dominant = self.dominant_hand();
        let pools = collect_candidates(&self.records, dominant);
        info!(target: "shotform_core::session",
            "dominant hand {:?}; candidates pocket={} set={} follow_through={}",
            dominant,
            pools.pocket.len(),
            pools.set.len(),
            pools.follow_through.len()
        );
        self.selector.select(&pools)
    }
}

/// Analyses one video's frames and returns the selected sequence.
pub fn run_session<I, D>(frames: I, detector: &mut D, config: SessionConfig) -> Result<Option<Sequence>>
where
    I: IntoIterator<Item = FramePacket>,
    D: PoseDetector + ?Sized,
{
    Ok(ShotSession::run(frames, detector, config)?.select())
}
