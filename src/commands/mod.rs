pub mod check;
pub mod config;
pub mod grades;
pub mod lookup;
pub mod session;

use log::info;

use crate::config::{Config, SourceConfig};
use crate::grades::{GradeLookup, LookupError, LookupOutcome};
use crate::sheets::{
    CachedSheetLoader, FileSheetLoader, HttpSheetLoader, LoadError, SheetLoader, SnapshotCache,
    default_snapshot_dir,
};

pub use check::check_command;
pub use config::{config_init_command, config_path_command, config_show_command};
pub use grades::grades_command;
pub use lookup::{LookupOptions, lookup_command, resolve_label};
pub use session::session_command;

pub type SheetLookup = GradeLookup<CachedSheetLoader<Box<dyn SheetLoader>>>;

/// How a command ended, mapped to the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    NoRecord,
    InvalidInput,
    OperatorError,
}

impl CommandStatus {
    pub fn from_result(result: &Result<LookupOutcome, LookupError>) -> Self {
        match result {
            Ok(LookupOutcome::Found(_)) => CommandStatus::Success,
            Ok(LookupOutcome::NotFound | LookupOutcome::Ambiguous { .. }) => {
                CommandStatus::NoRecord
            }
            Err(e) if e.is_operator_error() => CommandStatus::OperatorError,
            Err(_) => CommandStatus::InvalidInput,
        }
    }

    pub fn exit_code(self) -> i32 {
        match self {
            CommandStatus::Success => 0,
            CommandStatus::NoRecord => 1,
            CommandStatus::InvalidInput => 2,
            CommandStatus::OperatorError => 3,
        }
    }
}

/// Source loader for the configured sheet, wrapped in the snapshot cache
/// when enabled and always in the in-memory TTL cache.
pub fn build_loader(config: &Config) -> Result<CachedSheetLoader<Box<dyn SheetLoader>>, LoadError> {
    let source: Box<dyn SheetLoader> = match &config.source {
        SourceConfig::SheetUrl(url) => Box::new(HttpSheetLoader::new(url, config.request_timeout)?),
        SourceConfig::File { path, worksheet } => {
            Box::new(FileSheetLoader::new(path.clone(), worksheet.clone()))
        }
    };

    let source: Box<dyn SheetLoader> = if config.cache.persist {
        let dir = config.cache.dir.clone().unwrap_or_else(default_snapshot_dir);
        Box::new(SnapshotCache::new(source, &dir, config.cache.ttl()))
    } else {
        source
    };

    info!("Roster source: {}", source.describe());
    Ok(CachedSheetLoader::new(source, config.cache.ttl()))
}

/// Lookup over the configured source. A source that cannot even be set up
/// (for example a malformed sheet link) is reported as a load failure.
pub fn build_lookup(config: &Config) -> Result<SheetLookup, LookupError> {
    let loader = build_loader(config).map_err(|source| LookupError::LoadFailure {
        origin: match &config.source {
            SourceConfig::SheetUrl(url) => url.clone(),
            SourceConfig::File { path, .. } => path.display().to_string(),
        },
        source,
    })?;
    Ok(GradeLookup::new(config.lookup.clone(), loader))
}
