//! Lookup orchestration
//!
//! A lookup moves through [`LookupPhase`]s in order and ends either in a
//! [`LookupOutcome`] or a [`LookupError`]:
//!
//! ```text
//! AwaitingInput -> Validating -> Loading -> Resolving -> Matching -> outcome
//! ```
//!
//! Every lookup reloads the roster through its [`SheetLoader`]; freshness
//! caching is the loader's concern.

use log::{debug, info};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use super::catalog::{BreakdownCatalog, GradeCatalog};
use super::columns::{ColumnResolution, resolve_columns};
use super::error::LookupError;
use super::matcher::find_matches;
use super::normalize::NormalizeMode;
use super::roster::{Roster, Row};
use crate::sheets::SheetLoader;

/// Header used for the identifier in the privacy-safe projection.
pub const PROJECTION_ID_HEADER: &str = "ID Number";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupPhase {
    AwaitingInput,
    Validating,
    Loading,
    Resolving,
    Matching,
    Done,
}

/// Immutable column configuration for lookups.
#[derive(Debug, Clone, Default)]
pub struct LookupConfig {
    pub id_column: String,
    pub grades: GradeCatalog,
    pub breakdown: BreakdownCatalog,
    pub normalize_mode: NormalizeMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakdownValue {
    pub column: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LookupWarning {
    MissingBreakdownColumn { column: String },
}

impl fmt::Display for LookupWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupWarning::MissingBreakdownColumn { column } => {
                write!(f, "Breakdown column '{}' was not found in the sheet", column)
            }
        }
    }
}

/// The only row data shown back to the requester: identifier, requested
/// grade, and resolved breakdown columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Projection {
    pub headers: Vec<String>,
    pub values: Vec<String>,
}

impl Projection {
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(String::as_str))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GradeRecord {
    pub label: String,
    pub value: String,
    pub breakdown: Vec<BreakdownValue>,
    pub warnings: Vec<LookupWarning>,
    pub projection: Projection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LookupOutcome {
    Found(GradeRecord),
    NotFound,
    /// Several rows share the suffix. No row content is carried.
    Ambiguous { matches: usize },
}

/// Column check of every configured grade item against a loaded roster.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnosis {
    pub source: String,
    pub rows: usize,
    pub items: Vec<(String, ColumnResolution)>,
}

impl Diagnosis {
    pub fn is_healthy(&self) -> bool {
        self.items.iter().all(|(_, resolution)| resolution.all_present())
    }
}

/// Exactly six ASCII digits.
pub fn validate_query(query: &str) -> Result<(), LookupError> {
    if query.len() == 6 && query.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(LookupError::InvalidQuery {
            query: query.to_string(),
        })
    }
}

pub struct GradeLookup<L> {
    config: LookupConfig,
    loader: L,
}

impl<L: SheetLoader> GradeLookup<L> {
    pub fn new(config: LookupConfig, loader: L) -> Self {
        debug!("Lookup phase: {:?}", LookupPhase::AwaitingInput);
        Self { config, loader }
    }

    pub fn config(&self) -> &LookupConfig {
        &self.config
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Look up the grade item `label` for the student whose identifier ends
    /// in `query`.
    pub async fn lookup(&self, query: &str, label: &str) -> Result<LookupOutcome, LookupError> {
        enter(LookupPhase::Validating);
        validate_query(query)?;
        let grade_column = self.grade_column(label)?;
        let breakdown = self.config.breakdown.columns_for(label);

        let roster = self.load().await?;

        enter(LookupPhase::Resolving);
        let resolution = resolve_columns(&roster, &self.config.id_column, grade_column, breakdown);
        if let Some(missing) = resolution.first_missing_required() {
            return Err(LookupError::SchemaMismatch {
                role: missing.role,
                column: missing.column.clone(),
                found: resolution.found.clone(),
            });
        }

        enter(LookupPhase::Matching);
        let matches = find_matches(
            &roster,
            &self.config.id_column,
            query,
            self.config.normalize_mode,
        );

        let outcome = match matches.as_slice() {
            [] => LookupOutcome::NotFound,
            [row] => LookupOutcome::Found(self.record(row, label, grade_column, &resolution)),
            many => LookupOutcome::Ambiguous {
                matches: many.len(),
            },
        };

        enter(LookupPhase::Done);
        match &outcome {
            LookupOutcome::Found(record) => info!(
                "Lookup for '{}' found a record ({} warnings)",
                label,
                record.warnings.len()
            ),
            LookupOutcome::NotFound => info!("Lookup for '{}' found no record", label),
            LookupOutcome::Ambiguous { matches } => {
                info!("Lookup for '{}' matched {} records", label, matches)
            }
        }
        Ok(outcome)
    }

    /// Load the roster once and check every configured grade item's columns.
    pub async fn diagnose(&self) -> Result<Diagnosis, LookupError> {
        let roster = self.load().await?;

        let items = self
            .config
            .grades
            .iter()
            .map(|(label, column)| {
                let breakdown = self.config.breakdown.columns_for(label);
                let resolution =
                    resolve_columns(&roster, &self.config.id_column, column, breakdown);
                (label.to_string(), resolution)
            })
            .collect();

        Ok(Diagnosis {
            source: self.loader.describe(),
            rows: roster.len(),
            items,
        })
    }

    fn grade_column(&self, label: &str) -> Result<&str, LookupError> {
        self.config
            .grades
            .column_for(label)
            .ok_or_else(|| LookupError::UnknownGrade {
                label: label.to_string(),
                available: self.config.grades.labels().map(str::to_string).collect(),
            })
    }

    async fn load(&self) -> Result<Arc<Roster>, LookupError> {
        enter(LookupPhase::Loading);
        self.loader
            .load()
            .await
            .map_err(|source| LookupError::LoadFailure {
                origin: self.loader.describe(),
                source,
            })
    }

    fn record(
        &self,
        row: &Row,
        label: &str,
        grade_column: &str,
        resolution: &ColumnResolution,
    ) -> GradeRecord {
        let value = row.display(grade_column);

        let breakdown: Vec<BreakdownValue> = resolution
            .present_breakdown()
            .map(|column| BreakdownValue {
                column: column.to_string(),
                value: row.display(column),
            })
            .collect();

        let warnings = resolution
            .missing_breakdown()
            .map(|column| LookupWarning::MissingBreakdownColumn {
                column: column.to_string(),
            })
            .collect();

        let mut headers = vec![PROJECTION_ID_HEADER.to_string(), label.to_string()];
        let mut values = vec![row.display(&self.config.id_column), value.clone()];
        for item in &breakdown {
            headers.push(item.column.clone());
            values.push(item.value.clone());
        }

        GradeRecord {
            label: label.to_string(),
            value,
            breakdown,
            warnings,
            projection: Projection { headers, values },
        }
    }
}

fn enter(phase: LookupPhase) {
    debug!("Lookup phase: {:?}", phase);
}
