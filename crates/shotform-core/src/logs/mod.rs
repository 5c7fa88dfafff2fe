use serde::{Deserialize, Serialize};

use crate::phase::PhaseLabel;
use crate::temporal::FrameMotion;

/// Per-frame diagnostic values for debugging and visualisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameTraceEntry {
    pub frame_index: u64,
    pub timestamp_seconds: f64,
    pub label: PhaseLabel,
    pub raw_confidence: f64,
    pub smoothed_confidence: f64,
    /// `None` for frames without landmarks.
    pub motion: Option<FrameMotion>,
}

#[derive(Debug, Default, Clone)]
pub struct DiagnosticTrace {
    entries: Vec<FrameTraceEntry>,
}

impl DiagnosticTrace {
    pub fn push(&mut self, entry: FrameTraceEntry) {
        if let Some(last) = self.entries.last() {
            assert!(
                entry.frame_index > last.frame_index,
                "Trace entries must be frame-ordered"
            );
        }
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FrameTraceEntry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[FrameTraceEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::ShotPhase;

    fn entry(frame_index: u64) -> FrameTraceEntry {
        FrameTraceEntry {
            frame_index,
            timestamp_seconds: frame_index as f64 / 30.0,
            label: PhaseLabel::Phase(ShotPhase::Set),
            raw_confidence: 0.8,
            smoothed_confidence: 0.7,
            motion: Some(FrameMotion::default()),
        }
    }

    #[test]
    fn trace_keeps_frame_order() {
        let mut trace = DiagnosticTrace::default();
        trace.push(entry(0));
        trace.push(entry(3));
        assert_eq!(trace.len(), 2);
        assert_eq!(trace.iter().map(|e| e.frame_index).collect::<Vec<_>>(), vec![0, 3]);
    }

    #[test]
    #[should_panic]
    fn trace_panics_on_frame_regression() {
        let mut trace = DiagnosticTrace::default();
        trace.push(entry(5));
        trace.push(entry(5));
    }
}
