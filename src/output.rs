//! Output formatting and persistence for transcripts.
//!
//! Supports pretty-printing, JSON file export, and CSV append.

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

use crate::grading::types::{SemesterRow, Transcript};
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// Logs a transcript using Rust's debug pretty-print format.
pub fn print_pretty(transcript: &Transcript) {
    debug!("{:#?}", transcript);
}

/// Serializes a value as pretty-printed JSON to stdout.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Serializes a value as pretty-printed JSON to a file, creating parent
/// directories as needed.
pub fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let body = serde_json::to_vec_pretty(value)?;
    std::fs::write(path, body)?;

    info!(path = %path.display(), "JSON written");
    Ok(())
}

/// Appends a [`SemesterRow`] to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_semester_row(path: &str, row: &SemesterRow) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(row)?;
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::aggregate::build_transcript;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn sample_row() -> SemesterRow {
        SemesterRow {
            reg_no: "2021-CSE-001".to_string(),
            semester: 1,
            subject_count: 2,
            credits: 7.0,
            gpa: 3.6,
        }
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        let transcript = build_transcript("2021-CSE-001", None, &[]);
        print_pretty(&transcript);
    }

    #[test]
    fn test_print_json_does_not_panic() {
        let transcript = build_transcript("2021-CSE-001", None, &[]);
        print_json(&transcript).unwrap();
    }

    #[test]
    fn test_write_json_creates_parent_dirs() {
        let base = temp_path("dept_results_json_test");
        let _ = fs::remove_dir_all(&base);
        let path = format!("{}/nested/transcript.json", base);

        let transcript = build_transcript("2021-CSE-001", Some("Asha Rahman"), &[]);
        write_json(Path::new(&path), &transcript).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("2021-CSE-001"));

        fs::remove_dir_all(&base).unwrap();
    }

    #[test]
    fn test_append_row_creates_file() {
        let path = temp_path("dept_results_test_create.csv");
        let _ = fs::remove_file(&path); // clean up any prior run

        append_semester_row(&path, &sample_row()).unwrap();

        assert!(Path::new(&path).exists());
        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.is_empty());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_row_writes_header_once() {
        let path = temp_path("dept_results_test_header.csv");
        let _ = fs::remove_file(&path);

        append_semester_row(&path, &sample_row()).unwrap();
        append_semester_row(&path, &sample_row()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        // Header line should appear exactly once
        let header_count = content.lines().filter(|l| l.contains("reg_no")).count();
        assert_eq!(header_count, 1);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_two_rows() {
        let path = temp_path("dept_results_test_rows.csv");
        let _ = fs::remove_file(&path);

        append_semester_row(&path, &sample_row()).unwrap();
        append_semester_row(&path, &sample_row()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        // 1 header + 2 data rows
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);

        fs::remove_file(&path).unwrap();
    }
}
