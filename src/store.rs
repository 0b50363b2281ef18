//! CSV-backed roster store.
//!
//! Plays the data access role: three CSV files (`students.csv`,
//! `subjects.csv`, `results.csv`) in a data directory, loaded once and
//! queried per student. The join of results with subject credits happens
//! here so the aggregation pipeline only ever sees [`GradeRecord`] rows.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use tracing::debug;

use crate::grading::types::GradeRecord;

/// One row of `students.csv`. Credentials live elsewhere and are never
/// loaded here.
#[derive(Debug, Clone, Deserialize)]
pub struct Student {
    pub reg_no: String,
    pub name: String,
    pub batch: String,
}

/// One row of `subjects.csv`. `credits` is optional so a blank cell loads
/// instead of failing the whole file.
#[derive(Debug, Clone, Deserialize)]
pub struct Subject {
    pub subject_code: String,
    pub subject_name: String,
    pub credits: Option<f64>,
}

/// One row of `results.csv`.
#[derive(Debug, Clone, Deserialize)]
pub struct ResultRow {
    pub reg_no: String,
    pub subject_code: String,
    pub grade: String,
    pub semester: i32,
}

/// In-memory roster: all students, subjects, and results, with subjects
/// indexed by code for the join.
pub struct Roster {
    students: Vec<Student>,
    subjects: HashMap<String, Subject>,
    results: Vec<ResultRow>,
}

impl Roster {
    /// Loads the three roster CSVs from `dir`.
    pub fn load(dir: &Path) -> Result<Self> {
        let students: Vec<Student> = load_rows(&dir.join("students.csv"))?;
        let subject_rows: Vec<Subject> = load_rows(&dir.join("subjects.csv"))?;
        let results: Vec<ResultRow> = load_rows(&dir.join("results.csv"))?;

        debug!(
            students = students.len(),
            subjects = subject_rows.len(),
            results = results.len(),
            "Roster loaded"
        );

        let subjects = subject_rows
            .into_iter()
            .map(|s| (s.subject_code.clone(), s))
            .collect();

        Ok(Roster {
            students,
            subjects,
            results,
        })
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn student(&self, reg_no: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.reg_no == reg_no)
    }

    pub fn subject(&self, subject_code: &str) -> Option<&Subject> {
        self.subjects.get(subject_code)
    }

    pub fn results(&self) -> &[ResultRow] {
        &self.results
    }

    /// All grade records for one student, each joined with its subject's
    /// name and credit value.
    ///
    /// A result whose subject code is missing from `subjects.csv` still
    /// yields a record, with no name and no credits; the aggregator keeps it
    /// in the display list and weights it at zero.
    pub fn records_for(&self, reg_no: &str) -> Vec<GradeRecord> {
        self.results
            .iter()
            .filter(|r| r.reg_no == reg_no)
            .map(|r| {
                let subject = self.subjects.get(&r.subject_code);
                GradeRecord {
                    reg_no: r.reg_no.clone(),
                    subject_code: r.subject_code.clone(),
                    subject_name: subject.map(|s| s.subject_name.clone()),
                    grade: r.grade.clone(),
                    credits: subject.and_then(|s| s.credits),
                    semester: r.semester,
                }
            })
            .collect()
    }
}

fn load_rows<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Vec<T>> {
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut rdr = csv::Reader::from_reader(file);

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let row: T =
            result.with_context(|| format!("malformed row in {}", path.display()))?;
        rows.push(row);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;
    use std::path::PathBuf;

    fn fixture_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("dept_results_store_{}", name));
        let _ = fs::remove_dir_all(&dir); // clean up any prior run
        fs::create_dir_all(&dir).unwrap();

        fs::write(
            dir.join("students.csv"),
            "reg_no,name,batch\n\
             2021-CSE-001,Asha Rahman,2021\n\
             2021-CSE-002,Tanvir Hasan,2021\n",
        )
        .unwrap();

        fs::write(
            dir.join("subjects.csv"),
            "subject_code,subject_name,credits\n\
             CSE101,Structured Programming,3\n\
             CSE102,Discrete Mathematics,4\n\
             CSE205,Data Structures,\n",
        )
        .unwrap();

        fs::write(
            dir.join("results.csv"),
            "reg_no,subject_code,grade,semester\n\
             2021-CSE-001,CSE101,A,1\n\
             2021-CSE-001,CSE102,B+,1\n\
             2021-CSE-001,CSE205,A-,2\n\
             2021-CSE-001,CSE999,B,2\n\
             2021-CSE-002,CSE101,C,1\n",
        )
        .unwrap();

        dir
    }

    #[test]
    fn test_load_counts() {
        let dir = fixture_dir("load_counts");
        let roster = Roster::load(&dir).unwrap();

        assert_eq!(roster.students().len(), 2);
        assert_eq!(roster.results().len(), 5);
        assert!(roster.subject("CSE101").is_some());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_records_for_joins_credits() {
        let dir = fixture_dir("join");
        let roster = Roster::load(&dir).unwrap();

        let records = roster.records_for("2021-CSE-001");
        assert_eq!(records.len(), 4);

        let first = records.iter().find(|r| r.subject_code == "CSE101").unwrap();
        assert_eq!(first.subject_name.as_deref(), Some("Structured Programming"));
        assert_eq!(first.credits, Some(3.0));
        assert_eq!(first.semester, 1);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_unknown_subject_still_yields_record() {
        let dir = fixture_dir("unknown_subject");
        let roster = Roster::load(&dir).unwrap();

        let records = roster.records_for("2021-CSE-001");
        let orphan = records.iter().find(|r| r.subject_code == "CSE999").unwrap();

        assert_eq!(orphan.subject_name, None);
        assert_eq!(orphan.credits, None);
        assert_eq!(orphan.grade, "B");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_blank_credit_cell_loads_as_none() {
        let dir = fixture_dir("blank_credits");
        let roster = Roster::load(&dir).unwrap();

        let records = roster.records_for("2021-CSE-001");
        let creditless = records.iter().find(|r| r.subject_code == "CSE205").unwrap();

        assert_eq!(creditless.subject_name.as_deref(), Some("Data Structures"));
        assert_eq!(creditless.credits, None);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_records_for_unknown_student_is_empty() {
        let dir = fixture_dir("unknown_student");
        let roster = Roster::load(&dir).unwrap();

        assert!(roster.records_for("2099-CSE-404").is_empty());
        assert!(roster.student("2099-CSE-404").is_none());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = env::temp_dir().join("dept_results_store_missing");
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();

        assert!(Roster::load(&dir).is_err());

        fs::remove_dir_all(&dir).unwrap();
    }
}
