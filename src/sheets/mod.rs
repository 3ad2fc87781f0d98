//! Roster sources
//!
//! Everything that turns an external sheet into a [`Roster`]. The lookup core
//! only sees the [`SheetLoader`] trait, so a CSV export fetch, a local
//! workbook, or a cached wrapper around either are interchangeable.

pub mod cache;
pub mod csv_roster;
pub mod export_url;
pub mod file;
pub mod http;
pub mod snapshot;

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

use crate::grades::Roster;

pub use cache::CachedSheetLoader;
pub use export_url::build_csv_export_url;
pub use file::FileSheetLoader;
pub use http::HttpSheetLoader;
pub use snapshot::{SnapshotCache, SnapshotState, default_snapshot_dir};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not find a sheet id in '{0}'")]
    InvalidSheetUrl(String),

    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error(
        "{url} did not return CSV (content type '{content_type}'); \
         make sure the sheet is shared as 'Anyone with the link: Viewer'"
    )]
    NotCsv { url: String, content_type: String },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not read workbook {}: {source}", .path.display())]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("worksheet '{name}' not found (sheets: {})", .available.join(", "))]
    MissingWorksheet { name: String, available: Vec<String> },

    #[error("unsupported roster file {} (expected .csv, .xlsx, .xlsm or .xls)", .0.display())]
    UnsupportedFile(PathBuf),

    #[error("snapshot {}: {reason}", .path.display())]
    Snapshot { path: PathBuf, reason: String },
}

/// Source of the current roster.
#[async_trait]
pub trait SheetLoader: Send + Sync {
    async fn load(&self) -> Result<Arc<Roster>, LoadError>;

    /// Human readable origin, used in logs and diagnostics.
    fn describe(&self) -> String;
}

#[async_trait]
impl SheetLoader for Box<dyn SheetLoader> {
    async fn load(&self) -> Result<Arc<Roster>, LoadError> {
        (**self).load().await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

#[async_trait]
impl<L: SheetLoader + ?Sized> SheetLoader for Arc<L> {
    async fn load(&self) -> Result<Arc<Roster>, LoadError> {
        (**self).load().await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
