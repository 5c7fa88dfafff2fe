use serde::{Deserialize, Serialize};
use shotform_core::phase::PhaseScorer;
use shotform_core::sequence::SelectorConfig;
use shotform_core::temporal::DEFAULT_SMOOTHING_WINDOW;
use shotform_core::SessionConfig;
use std::path::{Path, PathBuf};

use crate::errors::{Result, ShotProcessingError};

/// Configuration for trace processing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Frame rate of the source video, used for timestamps
    #[serde(default = "default_frame_rate")]
    pub frame_rate: f64,
    /// Process every Nth frame
    #[serde(default = "default_sample_rate")]
    pub sample_rate: usize,
    /// Maximum number of frames to process
    #[serde(default)]
    pub max_frames: Option<usize>,
    /// Trailing window for confidence smoothing
    #[serde(default = "default_smoothing_window")]
    pub smoothing_window: usize,
    #[serde(default)]
    pub selector: SelectorConfig,
    /// Optional shot-quality classifier
    #[serde(default)]
    pub classifier: Option<ClassifierConfig>,
    /// Output directory
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Include the per-frame diagnostic trace in the output
    #[serde(default)]
    pub include_trace: bool,
    /// Verbose logging
    #[serde(default)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// JSON file holding `weights` and `bias`
    pub weights_path: PathBuf,
}

fn default_frame_rate() -> f64 {
    30.0
}

fn default_sample_rate() -> usize {
    1
}

fn default_smoothing_window() -> usize {
    DEFAULT_SMOOTHING_WINDOW
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./shotform-output")
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            frame_rate: default_frame_rate(),
            sample_rate: default_sample_rate(),
            max_frames: None,
            smoothing_window: default_smoothing_window(),
            selector: SelectorConfig::default(),
            classifier: None,
            output_dir: default_output_dir(),
            include_trace: false,
            verbose: false,
        }
    }
}

impl ProcessingConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|_| ShotProcessingError::ConfigNotFound(path.display().to_string()))?;
        let config: ProcessingConfig = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(ShotProcessingError::InvalidConfig(
                "sample_rate must be at least 1".to_string(),
            ));
        }
        if self.max_frames == Some(0) {
            return Err(ShotProcessingError::InvalidConfig(
                "max_frames must be at least 1 when set".to_string(),
            ));
        }
        self.session_config().validate()?;
        Ok(())
    }

    /// Core session settings derived from this configuration
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            frame_rate: self.frame_rate,
            smoothing_window: self.smoothing_window,
            scorer: PhaseScorer::default(),
            selector: self.selector,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "frame_rate: 60.0").unwrap();
        writeln!(file, "selector:").unwrap();
        writeln!(file, "  max_candidates: 4").unwrap();
        file.flush().unwrap();

        let config = ProcessingConfig::from_file(file.path()).unwrap();
        assert_eq!(config.frame_rate, 60.0);
        assert_eq!(config.sample_rate, 1);
        assert_eq!(config.smoothing_window, 5);
        assert_eq!(config.selector.max_candidates, 4);
        assert_eq!(config.selector.triplet_threshold, 20.0);
        assert!(config.classifier.is_none());
        assert_eq!(config.output_dir, PathBuf::from("./shotform-output"));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = ProcessingConfig::from_file("/nonexistent/shotform.yaml").unwrap_err();
        assert!(matches!(err, ShotProcessingError::ConfigNotFound(_)));
    }

    #[test]
    fn zero_sample_rate_is_invalid() {
        let config = ProcessingConfig {
            sample_rate: 0,
            ..ProcessingConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ShotProcessingError::InvalidConfig(_))
        ));
    }

    #[test]
    fn core_validation_errors_surface() {
        let config = ProcessingConfig {
            smoothing_window: 0,
            ..ProcessingConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ShotProcessingError::Session(_))
        ));
    }
}
