use thiserror::Error;

use super::columns::ColumnRole;
use super::lookup::LookupPhase;
use crate::sheets::LoadError;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Please enter exactly 6 digits (numbers only).")]
    InvalidQuery { query: String },

    #[error("Unknown grade item '{label}' (configured: {})", .available.join(", "))]
    UnknownGrade { label: String, available: Vec<String> },

    #[error("Could not load the grade sheet from {origin}: {source}")]
    LoadFailure {
        origin: String,
        #[source]
        source: LoadError,
    },

    #[error(
        "Configured {} '{column}' was not found in the sheet (columns found: {})",
        .role.describe(),
        .found.join(", ")
    )]
    SchemaMismatch {
        role: ColumnRole,
        column: String,
        found: Vec<String>,
    },
}

impl LookupError {
    /// Stable identifier for machine-readable output.
    pub fn kind(&self) -> &'static str {
        match self {
            LookupError::InvalidQuery { .. } => "invalid_query",
            LookupError::UnknownGrade { .. } => "unknown_grade",
            LookupError::LoadFailure { .. } => "load_failure",
            LookupError::SchemaMismatch { .. } => "schema_mismatch",
        }
    }

    /// Phase of the lookup in which the error was raised.
    pub fn phase(&self) -> LookupPhase {
        match self {
            LookupError::InvalidQuery { .. } | LookupError::UnknownGrade { .. } => {
                LookupPhase::Validating
            }
            LookupError::LoadFailure { .. } => LookupPhase::Loading,
            LookupError::SchemaMismatch { .. } => LookupPhase::Resolving,
        }
    }

    /// Errors that need someone with access to the configuration or the sheet.
    pub fn is_operator_error(&self) -> bool {
        matches!(
            self,
            LookupError::LoadFailure { .. } | LookupError::SchemaMismatch { .. }
        )
    }

    /// Columns present in the sheet, when the error is a schema mismatch.
    pub fn found_columns(&self) -> Option<&[String]> {
        match self {
            LookupError::SchemaMismatch { found, .. } => Some(found),
            _ => None,
        }
    }
}
