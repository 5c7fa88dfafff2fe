use shotform_core::SessionError;
use thiserror::Error;

/// Errors that can occur while processing a landmark trace
#[derive(Debug, Error)]
pub enum ShotProcessingError {
    #[error("Trace file format error at line {line}: {message}")]
    TraceFormat { line: usize, message: String },

    #[error("Trace file not found: {0}")]
    TraceFileNotFound(String),

    #[error("Config file not found: {0}")]
    ConfigNotFound(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to load quality classifier: {0}")]
    ClassifierLoad(String),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, ShotProcessingError>;
