use serde::Serialize;

use super::roster::Roster;

/// What a requested column is used for during a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    Id,
    Grade,
    Breakdown,
}

impl ColumnRole {
    /// Id and grade columns halt a lookup when absent; breakdown columns do not.
    pub fn is_required(self) -> bool {
        !matches!(self, ColumnRole::Breakdown)
    }

    pub fn describe(self) -> &'static str {
        match self {
            ColumnRole::Id => "ID column",
            ColumnRole::Grade => "grade column",
            ColumnRole::Breakdown => "breakdown column",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnCheck {
    pub role: ColumnRole,
    pub column: String,
    pub present: bool,
}

/// Presence of every column a lookup will touch, checked against the
/// roster header before any row is read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnResolution {
    pub checks: Vec<ColumnCheck>,
    pub found: Vec<String>,
}

impl ColumnResolution {
    /// First required column that is absent, if any.
    pub fn first_missing_required(&self) -> Option<&ColumnCheck> {
        self.checks
            .iter()
            .find(|check| check.role.is_required() && !check.present)
    }

    pub fn missing_breakdown(&self) -> impl Iterator<Item = &str> {
        self.checks
            .iter()
            .filter(|check| check.role == ColumnRole::Breakdown && !check.present)
            .map(|check| check.column.as_str())
    }

    pub fn present_breakdown(&self) -> impl Iterator<Item = &str> {
        self.checks
            .iter()
            .filter(|check| check.role == ColumnRole::Breakdown && check.present)
            .map(|check| check.column.as_str())
    }

    pub fn all_present(&self) -> bool {
        self.checks.iter().all(|check| check.present)
    }
}

pub fn resolve_columns(
    roster: &Roster,
    id_column: &str,
    grade_column: &str,
    breakdown: &[String],
) -> ColumnResolution {
    let requested = [(ColumnRole::Id, id_column), (ColumnRole::Grade, grade_column)]
        .into_iter()
        .chain(breakdown.iter().map(|c| (ColumnRole::Breakdown, c.as_str())));

    let checks = requested
        .map(|(role, column)| ColumnCheck {
            role,
            column: column.to_string(),
            present: roster.has_column(column),
        })
        .collect();

    ColumnResolution {
        checks,
        found: roster.columns().to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grades::roster::CellValue;

    fn header_only(columns: &[&str]) -> Roster {
        Roster::from_records(columns.iter().copied(), Vec::<Vec<CellValue>>::new())
    }

    #[test]
    fn test_all_present() {
        let roster = header_only(&["ID Number", "Midterm", "Part A"]);
        let resolution = resolve_columns(&roster, "ID Number", "Midterm", &["Part A".to_string()]);

        assert!(resolution.all_present());
        assert!(resolution.first_missing_required().is_none());
        assert_eq!(resolution.present_breakdown().collect::<Vec<_>>(), ["Part A"]);
    }

    #[test]
    fn test_missing_id_column_is_required() {
        let roster = header_only(&["Student", "Midterm"]);
        let resolution = resolve_columns(&roster, "ID Number", "Midterm", &[]);

        let missing = resolution.first_missing_required().unwrap();
        assert_eq!(missing.role, ColumnRole::Id);
        assert_eq!(missing.column, "ID Number");
        assert_eq!(resolution.found, ["Student", "Midterm"]);
    }

    #[test]
    fn test_missing_breakdown_is_not_required() {
        let roster = header_only(&["ID Number", "Midterm", "Part A"]);
        let breakdown = vec!["Part A".to_string(), "Part B".to_string()];
        let resolution = resolve_columns(&roster, "ID Number", "Midterm", &breakdown);

        assert!(resolution.first_missing_required().is_none());
        assert!(!resolution.all_present());
        assert_eq!(resolution.missing_breakdown().collect::<Vec<_>>(), ["Part B"]);
    }
}
