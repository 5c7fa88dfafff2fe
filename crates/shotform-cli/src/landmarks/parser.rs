use csv::{Reader, StringRecord};
use shotform_core::landmarks::{BodyPoint, Landmark, LandmarkSet};
use std::fs::File;
use std::path::Path;

use crate::errors::{Result, ShotProcessingError};
use crate::landmarks::TraceFrame;

const LANDMARK_FIELDS: usize = BodyPoint::COUNT * 3;

/// Column names of a landmark trace, in order.
pub fn trace_header() -> Vec<String> {
    let mut header = Vec::with_capacity(LANDMARK_FIELDS + 1);
    header.push("frame_index".to_string());
    for point in BodyPoint::ALL {
        header.push(format!("{}_x", point.name()));
        header.push(format!("{}_y", point.name()));
        header.push(format!("{}_visibility", point.name()));
    }
    header
}

/// Parser for landmark traces exported by an external pose detector
pub struct TraceParser;

impl TraceParser {
    /// Parse a landmark trace from a CSV file
    ///
    /// Expected format (see [`trace_header`]):
    /// frame_index,right_wrist_x,right_wrist_y,right_wrist_visibility,...,nose_visibility
    ///
    /// A row whose landmark fields are all empty records a frame where no
    /// person was detected.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Vec<TraceFrame>> {
        let file = File::open(path.as_ref()).map_err(|_| {
            ShotProcessingError::TraceFileNotFound(path.as_ref().display().to_string())
        })?;

        let mut reader = Reader::from_reader(file);

        let headers = reader.headers()?.clone();
        if headers.is_empty() {
            return Err(ShotProcessingError::TraceFormat {
                line: 0,
                message: "Trace file is empty".to_string(),
            });
        }
        let expected = trace_header();
        if headers.len() != expected.len()
            || headers.iter().zip(&expected).any(|(found, want)| found.trim() != want)
        {
            return Err(ShotProcessingError::TraceFormat {
                line: 1,
                message: format!(
                    "Unexpected header, expected {} columns starting with frame_index",
                    expected.len()
                ),
            });
        }

        let mut frames = Vec::new();
        for (line_number, result) in reader.records().enumerate() {
            let line = line_number + 2; // +1 for header, +1 for 1-based indexing
            let record = result.map_err(|e| ShotProcessingError::TraceFormat {
                line,
                message: format!("CSV error: {}", e),
            })?;
            frames.push(parse_record(&record, line)?);
        }

        if frames.is_empty() {
            return Err(ShotProcessingError::TraceFormat {
                line: 0,
                message: "No frames found in trace".to_string(),
            });
        }

        let detected = frames.iter().filter(|f| f.landmarks.is_some()).count();
        log::info!(
            "Loaded {} frames ({} with landmarks) from trace",
            frames.len(),
            detected
        );
        Ok(frames)
    }
}

fn parse_record(record: &StringRecord, line: usize) -> Result<TraceFrame> {
    let frame_index: u64 =
        record[0]
            .trim()
            .parse()
            .map_err(|e| ShotProcessingError::TraceFormat {
                line,
                message: format!("Invalid frame_index: {}", e),
            })?;

    let fields: Vec<&str> = record.iter().skip(1).map(str::trim).collect();
    let filled = fields.iter().filter(|f| !f.is_empty()).count();
    if filled == 0 {
        return Ok(TraceFrame {
            frame_index,
            landmarks: None,
        });
    }
    if filled != LANDMARK_FIELDS {
        return Err(ShotProcessingError::TraceFormat {
            line,
            message: format!(
                "Expected all {} landmark fields or none, found {}",
                LANDMARK_FIELDS, filled
            ),
        });
    }

    let mut landmarks = LandmarkSet::from_points([Landmark::default(); BodyPoint::COUNT]);
    for (point, values) in BodyPoint::ALL.iter().zip(fields.chunks(3)) {
        let parse = |value: &str, axis: &str| -> Result<f64> {
            value.parse().map_err(|e| ShotProcessingError::TraceFormat {
                line,
                message: format!("Invalid {}_{}: {}", point.name(), axis, e),
            })
        };
        landmarks.set(
            *point,
            Landmark::new(
                parse(values[0], "x")?,
                parse(values[1], "y")?,
                parse(values[2], "visibility")?,
            ),
        );
    }

    Ok(TraceFrame {
        frame_index,
        landmarks: Some(landmarks),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn full_row(frame_index: u64) -> String {
        let mut row = frame_index.to_string();
        for i in 0..BodyPoint::COUNT {
            row.push_str(&format!(",0.{i},0.5,0.9"));
        }
        row
    }

    fn write_trace(rows: &[String]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", trace_header().join(",")).unwrap();
        for row in rows {
            writeln!(file, "{row}").unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn parse_valid_trace_file() {
        let miss = format!("1{}", ",".repeat(LANDMARK_FIELDS));
        let file = write_trace(&[full_row(0), miss, full_row(2)]);

        let frames = TraceParser::parse_file(file.path()).unwrap();
        assert_eq!(frames.len(), 3);
        assert!(frames[1].landmarks.is_none());
        assert_eq!(frames[2].frame_index, 2);

        let set = frames[0].landmarks.unwrap();
        assert_eq!(set.get(BodyPoint::RightWrist), Landmark::new(0.0, 0.5, 0.9));
        assert_eq!(set.get(BodyPoint::Nose).x, 0.8);
    }

    #[test]
    fn partial_row_reports_its_line() {
        let mut partial = full_row(1);
        partial.truncate(partial.len() - 3);
        let file = write_trace(&[full_row(0), partial]);

        match TraceParser::parse_file(file.path()) {
            Err(ShotProcessingError::TraceFormat { line, .. }) => assert_eq!(line, 3),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn unparsable_value_reports_its_line() {
        let bad = full_row(0).replacen("0.5", "high", 1);
        let file = write_trace(&[bad]);

        match TraceParser::parse_file(file.path()) {
            Err(ShotProcessingError::TraceFormat { line, message }) => {
                assert_eq!(line, 2);
                assert!(message.contains("right_wrist_y"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn empty_file_is_a_format_error() {
        let file = NamedTempFile::new().unwrap();
        match TraceParser::parse_file(file.path()) {
            Err(ShotProcessingError::TraceFormat { line, .. }) => assert_eq!(line, 0),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn missing_file_is_reported() {
        let err = TraceParser::parse_file("/nonexistent/trace.csv").unwrap_err();
        assert!(matches!(err, ShotProcessingError::TraceFileNotFound(_)));
    }
}
