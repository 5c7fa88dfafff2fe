use thiserror::Error;

/// Errors that abort a shot-analysis session.
///
/// Missed detections, empty candidate pools and degraded sequences are not
/// errors; they are reflected in the session's output instead.
#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("Frame source yielded no frames")]
    NoFrames,

    #[error("Frame index {index} does not follow previous frame {previous}")]
    NonMonotonicFrame { previous: u64, index: u64 },

    #[error("Invalid session configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, SessionError>;
