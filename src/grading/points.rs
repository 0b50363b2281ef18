/// Resolves a letter grade to its point value on the department's 4.0 scale.
///
/// Input is trimmed and ASCII-uppercased before lookup, so `" a+ "` and
/// `"A+"` resolve identically.
///
/// | Grade   | Points |
/// |---------|--------|
/// | A+, A   | 4.0    |
/// | A-      | 3.7    |
/// | B+      | 3.3    |
/// | B       | 3.0    |
/// | B-      | 2.7    |
/// | C+      | 2.3    |
/// | C       | 2.0    |
/// | C-      | 1.7    |
/// | D+      | 1.3    |
/// | D       | 1.0    |
/// | D-      | 0.7    |
/// | F       | 0.0    |
///
/// Unknown or malformed grade strings resolve to 0.0 rather than failing.
/// That silent default is deliberate and load-bearing: it masks data-entry
/// errors in the results table, so the `check` subcommand exists to surface
/// them. Some departments omit D- from their scale; this table carries it.
pub fn grade_points(grade: &str) -> f64 {
    match grade.trim().to_ascii_uppercase().as_str() {
        "A+" | "A" => 4.0,
        "A-" => 3.7,
        "B+" => 3.3,
        "B" => 3.0,
        "B-" => 2.7,
        "C+" => 2.3,
        "C" => 2.0,
        "C-" => 1.7,
        "D+" => 1.3,
        "D" => 1.0,
        "D-" => 0.7,
        "F" => 0.0,
        _ => 0.0,
    }
}

/// Reports whether a grade string (after the same normalization) is in the
/// table. `grade_points` cannot distinguish a real F from a typo; this can.
pub fn is_known_grade(grade: &str) -> bool {
    matches!(
        grade.trim().to_ascii_uppercase().as_str(),
        "A+" | "A" | "A-" | "B+" | "B" | "B-" | "C+" | "C" | "C-" | "D+" | "D" | "D-" | "F"
    )
}
