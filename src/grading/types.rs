//! Data types used by the grade aggregation pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One subject's outcome for one student in one semester, already joined
/// with the subject's name and credit value by the store.
///
/// `credits` is `None` when the subject lookup failed; the aggregator treats
/// that as zero credits but keeps the record in the output for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeRecord {
    pub reg_no: String,
    pub subject_code: String,
    pub subject_name: Option<String>,
    pub grade: String,
    pub credits: Option<f64>,
    pub semester: i32,
}

/// A grade record paired with its resolved point value.
#[derive(Debug, Clone, Serialize)]
pub struct GradedRecord {
    pub record: GradeRecord,
    pub points: f64,
}

/// Derived per-semester view: the semester's records with resolved points,
/// the credit total, and the credit-weighted GPA. Recomputed on every
/// request, never persisted.
#[derive(Debug, Serialize)]
pub struct SemesterSummary {
    pub semester: i32,
    pub records: Vec<GradedRecord>,
    pub credits: f64,
    pub gpa: f64,
}

/// Complete per-student result, written as JSON by the CLI.
#[derive(Debug, Serialize)]
pub struct Transcript {
    pub reg_no: String,
    pub name: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub semesters: Vec<SemesterSummary>,
    pub total_credits: f64,
    pub cumulative_gpa: f64,
}

/// Summary entry for the batch-export index listing.
#[derive(Debug, Serialize)]
pub struct TranscriptIndexEntry {
    pub reg_no: String,
    pub name: String,
    pub semester_count: usize,
    pub cumulative_gpa: f64,
}

/// Top-level index of all exported transcripts, written as `index.json`.
#[derive(Debug, Serialize)]
pub struct TranscriptIndex {
    pub generated_at: DateTime<Utc>,
    pub students: Vec<TranscriptIndexEntry>,
}

/// Flat per-semester row for CSV exports.
#[derive(Debug, Serialize, Deserialize)]
pub struct SemesterRow {
    pub reg_no: String,
    pub semester: i32,
    pub subject_count: usize,
    pub credits: f64,
    pub gpa: f64,
}

impl SemesterRow {
    pub fn from_summary(reg_no: &str, summary: &SemesterSummary) -> Self {
        SemesterRow {
            reg_no: reg_no.to_string(),
            semester: summary.semester,
            subject_count: summary.records.len(),
            credits: summary.credits,
            gpa: summary.gpa,
        }
    }
}
