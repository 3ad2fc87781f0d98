//! Grade lookup core
//!
//! Identifier normalization, suffix matching, column resolution and the
//! lookup orchestrator that ties them to a [`crate::sheets::SheetLoader`].

pub mod catalog;
pub mod columns;
pub mod error;
pub mod lookup;
pub mod matcher;
pub mod normalize;
pub mod roster;

pub use catalog::{BreakdownCatalog, GradeCatalog};
pub use columns::{ColumnCheck, ColumnResolution, ColumnRole, resolve_columns};
pub use error::LookupError;
pub use lookup::{
    BreakdownValue, Diagnosis, GradeLookup, GradeRecord, LookupConfig, LookupOutcome,
    LookupPhase, LookupWarning, PROJECTION_ID_HEADER, Projection, validate_query,
};
pub use matcher::find_matches;
pub use normalize::{NormalizeMode, last6, normalize_id};
pub use roster::{CellValue, Roster, Row};
