pub mod errors;
pub mod landmarks;
pub mod output;
pub mod providers;
pub mod types;

use std::path::{Path, PathBuf};

use log::{debug, info};
use shotform_core::quality::grade_sequence;
use shotform_core::ShotSession;

use crate::errors::Result;
use crate::landmarks::TraceParser;
use crate::output::{write_output, AnalysisCollector, ProcessingOutput};
use crate::providers::{LogisticClassifier, ReplayPoseDetector};
use crate::types::{ProcessingConfig, SessionData};

/// Runs jump-shot phase selection on recorded landmark traces
pub struct ShotProcessor {
    config: ProcessingConfig,
    classifier: Option<LogisticClassifier>,
}

impl ShotProcessor {
    pub fn new(config: ProcessingConfig) -> Result<Self> {
        config.validate()?;
        let classifier = config
            .classifier
            .as_ref()
            .map(|c| LogisticClassifier::from_file(&c.weights_path))
            .transpose()?;
        Ok(Self { config, classifier })
    }

    pub fn config(&self) -> &ProcessingConfig {
        &self.config
    }

    /// Process a single landmark trace
    pub fn process_session<P: AsRef<Path>>(&self, trace_path: P) -> Result<ProcessingOutput> {
        let session = SessionData::new(trace_path.as_ref().to_path_buf());
        info!("Processing session: {}", session.name);

        let frames = TraceParser::parse_file(&session.trace_file)?;
        let packets =
            ReplayPoseDetector::packets(&frames, self.config.sample_rate, self.config.max_frames);
        debug!(
            "Sampled {} of {} frames (sample_rate={}, max_frames={:?})",
            packets.len(),
            frames.len(),
            self.config.sample_rate,
            self.config.max_frames
        );

        let mut detector = ReplayPoseDetector::new(&frames);
        let shot = ShotSession::run(packets, &mut detector, self.config.session_config())?;
        let sequence = shot.select();

        let mut analysis = AnalysisCollector::new(session, self.config.frame_rate);
        analysis.include_trace(self.config.include_trace);
        if let Some(classifier) = &self.classifier {
            analysis.set_report(grade_sequence(sequence.as_ref(), classifier));
        }

        let output = analysis.finalize(&shot, sequence.as_ref());
        info!("Processing complete: {}", output.summary_line());
        Ok(output)
    }

    /// Process a trace and write its JSON result to the output directory
    pub fn process_and_write<P: AsRef<Path>>(
        &self,
        trace_path: P,
    ) -> Result<(ProcessingOutput, PathBuf)> {
        let output = self.process_session(trace_path)?;
        let path = write_output(&output, &self.config.output_dir)?;
        Ok((output, path))
    }
}
