//! CLI entry point for the department results tool.
//!
//! Provides subcommands for building a single student's transcript,
//! exporting every student's transcript with an index, listing the roster,
//! and checking the result data for entry errors.

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use dept_results::grading::aggregate::build_transcript;
use dept_results::grading::points::is_known_grade;
use dept_results::grading::types::{SemesterRow, TranscriptIndex, TranscriptIndexEntry};
use dept_results::output::{append_semester_row, print_json, print_pretty, write_json};
use dept_results::store::Roster;
use std::ffi::OsStr;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "dept_results")]
#[command(about = "A tool to compute semester GPAs from department grade records", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build one student's transcript and print it as JSON
    Transcript {
        /// Registration number of the student
        #[arg(value_name = "REG_NO")]
        reg_no: String,

        /// Directory containing students.csv, subjects.csv, and results.csv
        #[arg(short, long, default_value = "data")]
        data_dir: String,

        /// Write the transcript JSON to this file instead of stdout
        #[arg(short, long)]
        output: Option<String>,

        /// CSV file to append per-semester summary rows to
        #[arg(long)]
        csv: Option<String>,
    },
    /// Export every student's transcript as JSON plus an index
    ExportAll {
        /// Directory containing students.csv, subjects.csv, and results.csv
        #[arg(short, long, default_value = "data")]
        data_dir: String,

        /// Directory to write per-student JSON files and index.json to
        #[arg(short, long, default_value = "transcripts")]
        output_dir: String,
    },
    /// List all students in the roster with their result counts
    ListStudents {
        /// Directory containing students.csv, subjects.csv, and results.csv
        #[arg(short, long, default_value = "data")]
        data_dir: String,
    },
    /// Check result rows for unknown grades, subjects, and students
    Check {
        /// Directory containing students.csv, subjects.csv, and results.csv
        #[arg(short, long, default_value = "data")]
        data_dir: String,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/dept_results.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("dept_results.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Transcript {
            reg_no,
            data_dir,
            output,
            csv,
        } => {
            transcript(&reg_no, &data_dir, output.as_deref(), csv.as_deref())?;
        }
        Commands::ExportAll {
            data_dir,
            output_dir,
        } => {
            export_all(&data_dir, &output_dir)?;
        }
        Commands::ListStudents { data_dir } => {
            list_students(&data_dir)?;
        }
        Commands::Check { data_dir } => {
            check(&data_dir)?;
        }
    }

    Ok(())
}

/// Builds a single student's transcript and prints or writes it.
#[tracing::instrument(skip(output, csv), fields(reg_no, data_dir))]
fn transcript(reg_no: &str, data_dir: &str, output: Option<&str>, csv: Option<&str>) -> Result<()> {
    let roster = Roster::load(Path::new(data_dir))?;

    let Some(student) = roster.student(reg_no) else {
        bail!("no student with registration number {reg_no} in {data_dir}/students.csv");
    };

    let records = roster.records_for(reg_no);
    let transcript = build_transcript(reg_no, Some(&student.name), &records);
    print_pretty(&transcript);

    info!(
        semesters = transcript.semesters.len(),
        total_credits = transcript.total_credits,
        cumulative_gpa = transcript.cumulative_gpa,
        "Transcript built"
    );

    if let Some(csv_path) = csv {
        for summary in &transcript.semesters {
            append_semester_row(csv_path, &SemesterRow::from_summary(reg_no, summary))?;
        }
    }

    match output {
        Some(path) => write_json(Path::new(path), &transcript)?,
        None => print_json(&transcript)?,
    }

    Ok(())
}

/// Builds a transcript for every student, writing one JSON file each plus an
/// index of cumulative GPAs.
#[tracing::instrument(fields(data_dir, output_dir))]
fn export_all(data_dir: &str, output_dir: &str) -> Result<()> {
    let roster = Roster::load(Path::new(data_dir))?;

    let mut index_entries = Vec::new();

    for student in roster.students() {
        let records = roster.records_for(&student.reg_no);
        let transcript = build_transcript(&student.reg_no, Some(&student.name), &records);

        let path = Path::new(output_dir).join(format!("{}.json", student.reg_no));
        write_json(&path, &transcript)?;

        index_entries.push(TranscriptIndexEntry {
            reg_no: student.reg_no.clone(),
            name: student.name.clone(),
            semester_count: transcript.semesters.len(),
            cumulative_gpa: transcript.cumulative_gpa,
        });
    }

    let index = TranscriptIndex {
        generated_at: chrono::Utc::now(),
        students: index_entries,
    };
    write_json(&Path::new(output_dir).join("index.json"), &index)?;

    info!(
        students = index.students.len(),
        output_dir, "Export complete"
    );
    Ok(())
}

/// Logs each student with their result count, then a roster summary.
fn list_students(data_dir: &str) -> Result<()> {
    let roster = Roster::load(Path::new(data_dir))?;

    for student in roster.students() {
        let result_count = roster
            .results()
            .iter()
            .filter(|r| r.reg_no == student.reg_no)
            .count();

        info!(
            reg_no = %student.reg_no,
            name = %student.name,
            batch = %student.batch,
            result_count,
            "Student"
        );
    }

    let with_results = roster
        .students()
        .iter()
        .filter(|s| roster.results().iter().any(|r| r.reg_no == s.reg_no))
        .count();

    info!(
        total = roster.students().len(),
        with_results,
        without_results = roster.students().len() - with_results,
        "Roster summary"
    );

    Ok(())
}

/// Scans result rows for the entry errors the grade resolver silently maps
/// to 0.0: unknown grade strings, subject codes missing from subjects.csv,
/// and registration numbers missing from students.csv.
fn check(data_dir: &str) -> Result<()> {
    let roster = Roster::load(Path::new(data_dir))?;

    let mut unknown_grades = 0;
    let mut unknown_subjects = 0;
    let mut unknown_students = 0;

    for row in roster.results() {
        if !is_known_grade(&row.grade) {
            unknown_grades += 1;
            warn!(
                reg_no = %row.reg_no,
                subject_code = %row.subject_code,
                grade = %row.grade,
                "Grade not in the points table; it will resolve to 0.0"
            );
        }

        if roster.subject(&row.subject_code).is_none() {
            unknown_subjects += 1;
            warn!(
                reg_no = %row.reg_no,
                subject_code = %row.subject_code,
                "Result references an unknown subject; it carries no credits"
            );
        }

        if roster.student(&row.reg_no).is_none() {
            unknown_students += 1;
            warn!(
                reg_no = %row.reg_no,
                subject_code = %row.subject_code,
                "Result references an unknown registration number"
            );
        }
    }

    info!(
        results = roster.results().len(),
        unknown_grades,
        unknown_subjects,
        unknown_students,
        "Check summary"
    );

    Ok(())
}
