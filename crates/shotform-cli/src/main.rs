//! `shotform` selects the pocket, set-point and follow-through frames of a
//! jump shot from landmark traces.
//!
//! ```bash
//! shotform trace.csv --classifier weights.json --output-dir results
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::{error, info};
use shotform_cli::types::{ClassifierConfig, ProcessingConfig};
use shotform_cli::ShotProcessor;

#[derive(Parser, Debug)]
#[command(
    name = "shotform",
    version,
    about = "Jump-shot phase frame selection",
    long_about = None
)]
struct Cli {
    /// Landmark trace CSV files, one per recorded shot.
    #[arg(required = true, value_name = "TRACE")]
    traces: Vec<PathBuf>,

    /// YAML configuration file; flags below override it.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory for JSON results.
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Frame rate of the source video.
    #[arg(long)]
    frame_rate: Option<f64>,

    /// Process every Nth frame.
    #[arg(long)]
    sample_rate: Option<usize>,

    /// Stop after this many sampled frames.
    #[arg(long)]
    max_frames: Option<usize>,

    /// Logistic classifier weights (JSON) for shot grading.
    #[arg(long, value_name = "FILE")]
    classifier: Option<PathBuf>,

    /// Include the per-frame diagnostic trace in the output.
    #[arg(long, default_value_t = false)]
    trace: bool,

    /// Debug logging.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

impl Cli {
    fn processing_config(&self) -> anyhow::Result<ProcessingConfig> {
        let mut config = match &self.config {
            Some(path) => ProcessingConfig::from_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => ProcessingConfig::default(),
        };

        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(frame_rate) = self.frame_rate {
            config.frame_rate = frame_rate;
        }
        if let Some(sample_rate) = self.sample_rate {
            config.sample_rate = sample_rate;
        }
        if let Some(max_frames) = self.max_frames {
            config.max_frames = Some(max_frames);
        }
        if let Some(weights_path) = &self.classifier {
            config.classifier = Some(ClassifierConfig {
                weights_path: weights_path.clone(),
            });
        }
        config.include_trace |= self.trace;
        config.verbose |= self.verbose;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.processing_config()?;

    let level = if config.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let processor = ShotProcessor::new(config).context("invalid configuration")?;

    let mut failures = 0usize;
    for trace in &cli.traces {
        match processor.process_and_write(trace) {
            Ok((output, path)) => {
                println!("{} -> {}", output.summary_line(), path.display());
            }
            Err(e) => {
                error!("Failed to process {}: {}", trace.display(), e);
                failures += 1;
            }
        }
    }

    info!(
        "Processed {} of {} trace files",
        cli.traces.len() - failures,
        cli.traces.len()
    );
    if failures == cli.traces.len() {
        anyhow::bail!("no trace file could be processed");
    }
    Ok(())
}
