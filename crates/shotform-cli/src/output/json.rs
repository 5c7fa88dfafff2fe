use serde::{Deserialize, Serialize};
use shotform_core::landmarks::Side;
use shotform_core::logs::FrameTraceEntry;
use shotform_core::phase::ShotPhase;
use shotform_core::quality::ShotReport;
use shotform_core::sequence::PairKind;
use std::path::{Path, PathBuf};

use crate::errors::Result;

/// Complete processing output in JSON format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingOutput {
    pub metadata: Metadata,
    pub selection: Option<Selection>,
    pub candidates: CandidateCounts,
    pub report: Option<ShotReport>,
    pub trace: Option<Vec<FrameTraceEntry>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    pub session_name: String,
    pub trace_file: String,
    pub processing_timestamp: String,
    pub frame_count: usize,
    pub detected_frame_count: usize,
    pub frame_rate: f64,
    pub dominant_hand: Side,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Selection {
    /// `triplet`, `pair` or `single`
    pub kind: String,
    pub pair_type: Option<PairKind>,
    pub score: f64,
    pub frames: Vec<SelectedFrame>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectedFrame {
    pub phase: ShotPhase,
    pub frame_index: u64,
    pub timestamp_seconds: f64,
    pub confidence: f64,
    pub candidate_score: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidateCounts {
    pub pocket: usize,
    pub set: usize,
    pub follow_through: usize,
}

impl ProcessingOutput {
    /// One-line human-readable summary
    pub fn summary_line(&self) -> String {
        let selection = match &self.selection {
            Some(selection) => {
                let frames: Vec<String> = selection
                    .frames
                    .iter()
                    .map(|f| format!("{}@{}", f.phase, f.frame_index))
                    .collect();
                format!(
                    "{} ({}) score {:.2}",
                    selection.kind,
                    frames.join(", "),
                    selection.score
                )
            }
            None => "no shot detected".to_string(),
        };
        match &self.report {
            Some(report) => format!("{}: {} | {}", self.metadata.session_name, selection, report.message),
            None => format!("{}: {}", self.metadata.session_name, selection),
        }
    }
}

/// Write `output` as `<session>_<YYYYmmdd_HHMMSS>.json` under `output_dir`
pub fn write_output<P: AsRef<Path>>(output: &ProcessingOutput, output_dir: P) -> Result<PathBuf> {
    let output_dir = output_dir.as_ref();
    std::fs::create_dir_all(output_dir)?;

    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let path = output_dir.join(format!("{}_{}.json", output.metadata.session_name, stamp));

    let json = serde_json::to_string_pretty(output)?;
    std::fs::write(&path, json)?;
    log::info!("Wrote results to {}", path.display());
    Ok(path)
}
