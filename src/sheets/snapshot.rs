use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use super::{LoadError, SheetLoader};
use crate::grades::Roster;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotState {
    Fresh,
    Stale,
    Missing,
}

#[derive(Serialize, Deserialize)]
struct SnapshotFile {
    source: String,
    saved_at: DateTime<Utc>,
    roster: Roster,
}

/// Default snapshot directory under the user cache dir.
pub fn default_snapshot_dir() -> PathBuf {
    dirs::cache_dir()
        .map(|dir| dir.join("grades-cli").join("snapshots"))
        .unwrap_or_else(|| PathBuf::from("snapshots"))
}

/// On-disk copy of the last roster, reused across runs while younger than
/// `ttl` (judged by file modification time).
pub struct SnapshotCache<L> {
    inner: L,
    path: PathBuf,
    ttl: Duration,
}

impl<L: SheetLoader> SnapshotCache<L> {
    pub fn new(inner: L, cache_dir: &Path, ttl: Duration) -> Self {
        let path = cache_dir.join(format!("{}.json", snapshot_key(&inner.describe())));
        Self { inner, path, ttl }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> SnapshotState {
        let metadata = match fs::metadata(&self.path) {
            Ok(metadata) => metadata,
            Err(_) => return SnapshotState::Missing,
        };

        match metadata.modified().map(|m| m.elapsed().unwrap_or_default()) {
            Ok(age) if age < self.ttl => {
                debug!("Snapshot is fresh ({}s old)", age.as_secs());
                SnapshotState::Fresh
            }
            Ok(age) => {
                debug!("Snapshot is stale ({}s old)", age.as_secs());
                SnapshotState::Stale
            }
            Err(e) => {
                debug!("Could not get modified time for {:?}: {}", self.path, e);
                SnapshotState::Stale
            }
        }
    }

    /// When the current snapshot was written, if one is readable.
    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        self.read().ok().map(|snapshot| snapshot.saved_at)
    }

    fn read(&self) -> Result<SnapshotFile, LoadError> {
        let content = fs::read_to_string(&self.path).map_err(|source| LoadError::Io {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|e| LoadError::Snapshot {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }

    fn write(&self, roster: &Roster) -> Result<(), LoadError> {
        let io_error = |source| LoadError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }

        let snapshot = SnapshotFile {
            source: self.inner.describe(),
            saved_at: Utc::now(),
            roster: roster.clone(),
        };
        let content = serde_json::to_string(&snapshot).map_err(|e| LoadError::Snapshot {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;

        fs::write(&self.path, content).map_err(io_error)
    }
}

/// File-name-safe key for a loader description.
fn snapshot_key(source: &str) -> String {
    let key: String = source
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    let key = key.trim_matches('_');
    key[key.len().saturating_sub(96)..].to_string()
}

#[async_trait]
impl<L: SheetLoader> SheetLoader for SnapshotCache<L> {
    async fn load(&self) -> Result<Arc<Roster>, LoadError> {
        if self.state() == SnapshotState::Fresh {
            match self.read() {
                Ok(snapshot) => {
                    debug!("Using roster snapshot saved at {}", snapshot.saved_at);
                    return Ok(Arc::new(snapshot.roster));
                }
                Err(e) => warn!("Ignoring unreadable snapshot: {}", e),
            }
        }

        let roster = self.inner.load().await?;
        match self.write(&roster) {
            Ok(()) => info!("Saved roster snapshot to {:?}", self.path),
            Err(e) => warn!("Could not save roster snapshot: {}", e),
        }
        Ok(roster)
    }

    fn describe(&self) -> String {
        format!("{} (snapshot {})", self.inner.describe(), self.path.display())
    }
}
