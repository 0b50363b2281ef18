use crate::grading::points::grade_points;
use crate::grading::types::{GradeRecord, GradedRecord, SemesterSummary, Transcript};
use chrono::Utc;
use std::collections::BTreeMap;

#[derive(Default)]
struct SemesterAccumulator {
    records: Vec<GradedRecord>,
    quality_points: f64,
    credits: f64,
}

/// Groups a student's grade records by semester and computes each semester's
/// credit-weighted GPA.
///
/// Records may arrive in any order; output is ordered by ascending semester
/// number, one summary per distinct semester in the input. A record with no
/// resolvable credits contributes zero quality points and zero credits but
/// stays in the summary's record list. A semester whose credit total is zero
/// reports a GPA of 0.0 rather than dividing by zero.
pub fn summarize_semesters(records: &[GradeRecord]) -> Vec<SemesterSummary> {
    let mut groups: BTreeMap<i32, SemesterAccumulator> = BTreeMap::new();

    for record in records {
        let points = grade_points(&record.grade);
        let credits = record.credits.unwrap_or(0.0);

        let group = groups.entry(record.semester).or_default();
        group.records.push(GradedRecord {
            record: record.clone(),
            points,
        });
        group.quality_points += points * credits;
        group.credits += credits;
    }

    groups
        .into_iter()
        .map(|(semester, group)| {
            let gpa = if group.credits > 0.0 {
                group.quality_points / group.credits
            } else {
                0.0
            };

            SemesterSummary {
                semester,
                records: group.records,
                credits: group.credits,
                gpa,
            }
        })
        .collect()
}

/// Credit-weighted GPA over all semesters, with the same zero-credit rule as
/// the per-semester average.
pub fn cumulative_gpa(semesters: &[SemesterSummary]) -> f64 {
    let mut quality_points = 0.0;
    let mut credits = 0.0;

    for summary in semesters {
        for graded in &summary.records {
            let c = graded.record.credits.unwrap_or(0.0);
            quality_points += graded.points * c;
            credits += c;
        }
    }

    if credits > 0.0 {
        quality_points / credits
    } else {
        0.0
    }
}

/// Builds the full per-student transcript from that student's grade records.
pub fn build_transcript(reg_no: &str, name: Option<&str>, records: &[GradeRecord]) -> Transcript {
    let semesters = summarize_semesters(records);
    let total_credits = semesters.iter().map(|s| s.credits).sum();
    let cumulative = cumulative_gpa(&semesters);

    Transcript {
        reg_no: reg_no.to_string(),
        name: name.map(str::to_string),
        generated_at: Utc::now(),
        semesters,
        total_credits,
        cumulative_gpa: cumulative,
    }
}
