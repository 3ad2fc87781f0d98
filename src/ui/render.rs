//! Presentation of lookup outcomes
//!
//! Text output for terminals and JSON for scripts. Both only ever show what
//! the outcome carries, so nothing beyond the privacy-safe projection leaves
//! the lookup.

use clap::ValueEnum;
use colored::*;
use serde_json::{Value, json};

use crate::grades::{Diagnosis, GradeRecord, LookupError, LookupOutcome};

pub const NOT_FOUND_MESSAGE: &str =
    "No record found for that ID (last 6 digits). Please double-check.";
pub const AMBIGUOUS_MESSAGE: &str = "Multiple records matched that last-6 ID pattern. \
     Please contact your instructor/admin to fix duplicates.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub fn render_outcome(outcome: &LookupOutcome, details: bool) -> String {
    match outcome {
        LookupOutcome::Found(record) => render_record(record, details),
        LookupOutcome::NotFound => {
            format!("{} {}", "⚠".yellow().bold(), NOT_FOUND_MESSAGE.yellow())
        }
        LookupOutcome::Ambiguous { .. } => {
            format!("{} {}", "⚠".yellow().bold(), AMBIGUOUS_MESSAGE.yellow())
        }
    }
}

fn render_record(record: &GradeRecord, details: bool) -> String {
    let mut lines = vec![
        format!("{} {}", "✓".bright_green().bold(), "Record found".green()),
        format!("  {}: {}", record.label.bold(), record.value.bright_white().bold()),
    ];

    if !record.breakdown.is_empty() {
        lines.push(format!("  {}", "Breakdown".dimmed()));
        for item in &record.breakdown {
            lines.push(format!("    {} → {}", item.column, item.value));
        }
    }

    for warning in &record.warnings {
        lines.push(format!("  {} {}", "!".yellow(), warning.to_string().yellow()));
    }

    if details {
        lines.push(String::new());
        lines.push(format!("  {}", "Details".dimmed()));
        let width = record
            .projection
            .headers
            .iter()
            .map(|h| h.chars().count())
            .max()
            .unwrap_or(0);
        for (header, value) in record.projection.pairs() {
            lines.push(format!("    {:<width$}  {}", header, value, width = width));
        }
    }

    lines.join("\n")
}

pub fn render_error(err: &LookupError) -> String {
    let mut lines = vec![format!("{} {}", "✗".bright_red().bold(), err.to_string().red())];

    if let Some(found) = err.found_columns() {
        lines.push(format!("  Columns found: {}", found.join(", ")));
    }
    if let LookupError::LoadFailure { .. } = err {
        let hint = "  Make sure the sheet is viewable via link, then try again.";
        lines.push(hint.dimmed().to_string());
    }

    lines.join("\n")
}

pub fn outcome_json(outcome: &LookupOutcome) -> Value {
    let mut value = serde_json::to_value(outcome).unwrap_or(Value::Null);
    let message = match outcome {
        LookupOutcome::Found(_) => None,
        LookupOutcome::NotFound => Some(NOT_FOUND_MESSAGE),
        LookupOutcome::Ambiguous { .. } => Some(AMBIGUOUS_MESSAGE),
    };
    if let (Some(message), Value::Object(map)) = (message, &mut value) {
        map.insert("message".to_string(), json!(message));
    }
    value
}

pub fn error_json(err: &LookupError) -> Value {
    let mut value = json!({
        "status": "error",
        "kind": err.kind(),
        "message": err.to_string(),
    });
    if let (Some(found), Value::Object(map)) = (err.found_columns(), &mut value) {
        map.insert("found_columns".to_string(), json!(found));
    }
    value
}

pub fn render_diagnosis(diagnosis: &Diagnosis) -> String {
    let mut lines = vec![
        format!("Source: {}", diagnosis.source.cyan()),
        format!("Rows:   {}", diagnosis.rows),
        String::new(),
    ];

    for (label, resolution) in &diagnosis.items {
        lines.push(label.bold().to_string());
        for check in &resolution.checks {
            let mark = if check.present {
                "✓".bright_green().to_string()
            } else if check.role.is_required() {
                "✗".bright_red().to_string()
            } else {
                "!".yellow().to_string()
            };
            lines.push(format!("  {} {} '{}'", mark, check.role.describe(), check.column));
        }
    }

    if let Some((_, resolution)) = diagnosis.items.first() {
        lines.push(String::new());
        lines.push(format!("Columns found: {}", resolution.found.join(", ")));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grades::{BreakdownValue, LookupWarning, Projection};

    fn record() -> GradeRecord {
        GradeRecord {
            label: "Midterm".to_string(),
            value: "42.5".to_string(),
            breakdown: vec![BreakdownValue {
                column: "Part A".to_string(),
                value: "20".to_string(),
            }],
            warnings: vec![LookupWarning::MissingBreakdownColumn {
                column: "Part B".to_string(),
            }],
            projection: Projection {
                headers: vec!["ID Number".to_string(), "Midterm".to_string(), "Part A".to_string()],
                values: vec!["202412345".to_string(), "42.5".to_string(), "20".to_string()],
            },
        }
    }

    #[test]
    fn test_render_found_with_details() {
        colored::control::set_override(false);
        let text = render_outcome(&LookupOutcome::Found(record()), true);

        assert!(text.contains("Midterm: 42.5"));
        assert!(text.contains("Part A → 20"));
        assert!(text.contains("'Part B' was not found"));
        assert!(text.contains("ID Number  202412345"));
    }

    #[test]
    fn test_render_found_without_details_hides_projection() {
        colored::control::set_override(false);
        let text = render_outcome(&LookupOutcome::Found(record()), false);
        assert!(!text.contains("202412345"));
    }

    #[test]
    fn test_ambiguous_json_has_no_row_data() {
        let value = outcome_json(&LookupOutcome::Ambiguous { matches: 2 });
        assert_eq!(value["status"], "ambiguous");
        assert_eq!(value["message"], AMBIGUOUS_MESSAGE);
        assert!(value.get("value").is_none());
    }

    #[test]
    fn test_found_json_shape() {
        let value = outcome_json(&LookupOutcome::Found(record()));
        assert_eq!(value["status"], "found");
        assert_eq!(value["value"], "42.5");
        assert_eq!(value["warnings"][0]["kind"], "missing_breakdown_column");
    }

    #[test]
    fn test_schema_error_lists_found_columns() {
        colored::control::set_override(false);
        let err = LookupError::SchemaMismatch {
            role: crate::grades::ColumnRole::Id,
            column: "ID Number".to_string(),
            found: vec!["Student".to_string(), "Quiz 1".to_string()],
        };

        assert!(render_error(&err).contains("Columns found: Student, Quiz 1"));
        assert_eq!(error_json(&err)["found_columns"][1], "Quiz 1");
        assert_eq!(error_json(&err)["kind"], "schema_mismatch");
    }
}
