use std::path::PathBuf;

/// One recorded shot: a landmark trace extracted from a single video
#[derive(Debug, Clone)]
pub struct SessionData {
    /// Path to the landmark trace CSV
    pub trace_file: PathBuf,
    /// Session name (derived from the trace filename)
    pub name: String,
}

impl SessionData {
    pub fn new(trace_file: PathBuf) -> Self {
        let name = trace_file
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unnamed_session")
            .to_string();

        Self { trace_file, name }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_comes_from_file_stem() {
        let session = SessionData::new(PathBuf::from("/tmp/shots/free_throw_03.csv"));
        assert_eq!(session.name, "free_throw_03");
    }
}
