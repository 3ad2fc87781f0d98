use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::grades::{BreakdownCatalog, GradeCatalog, LookupConfig, NormalizeMode};

pub const CONFIG_ENV: &str = "GRADES_CONFIG";
pub const SHEET_URL_ENV: &str = "GRADES_SHEET_URL";
pub const ROSTER_FILE_ENV: &str = "GRADES_ROSTER_FILE";
pub const ID_COLUMN_ENV: &str = "GRADES_ID_COLUMN";
pub const CACHE_TTL_ENV: &str = "GRADES_CACHE_TTL_SECS";

pub const TEMPLATE: &str = r#"# grades-cli configuration

# Google Sheets link of the roster tab. The sheet must be shared as
# "Anyone with the link: Viewer". Use roster_file instead for a local
# .csv or .xlsx export.
sheet_url = "https://docs.google.com/spreadsheets/d/<SHEET_ID>/edit#gid=0"
# roster_file = "roster.xlsx"
# worksheet = "Grades"

# Column holding the student ID number.
id_column = "ID Number"

# "legacy" removes every ".0" from IDs; "numeric-suffix" only a trailing one.
# id_normalization = "legacy"

# request_timeout_secs = 30

[[grades]]
label = "Quiz #1"
column = "Quiz 1 Scores"

[[grades]]
label = "Midterm"
column = "Midterm Total"
breakdown = ["Midterm Part A", "Midterm Part B"]

[cache]
ttl_secs = 60
persist = false
"#;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration key '{key}'. Please set it in the config file.")]
    Missing { key: &'static str },

    #[error("Invalid value for '{key}': {reason}")]
    Invalid { key: String, reason: String },

    #[error("Could not determine the config directory")]
    NoConfigDir,

    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeItemConfig {
    pub label: String,
    pub column: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub breakdown: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default)]
    pub persist: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

fn default_ttl_secs() -> u64 {
    60
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            persist: false,
            dir: None,
        }
    }
}

impl CacheSettings {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Configuration as written in the file, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roster_file: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worksheet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_column: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_normalization: Option<NormalizeMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub grades: Vec<GradeItemConfig>,
    #[serde(default)]
    pub cache: CacheSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceConfig {
    SheetUrl(String),
    File {
        path: PathBuf,
        worksheet: Option<String>,
    },
}

/// Validated, read-only configuration shared by every command.
#[derive(Debug, Clone)]
pub struct Config {
    pub path: PathBuf,
    pub source: SourceConfig,
    pub lookup: LookupConfig,
    pub cache: CacheSettings,
    pub request_timeout: Duration,
    pub raw: RawConfig,
}

impl Config {
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let config_dir = if cfg!(target_os = "linux") {
            dirs::config_dir()
                .ok_or(ConfigError::NoConfigDir)?
                .join("grades-cli")
        } else {
            dirs::home_dir()
                .ok_or(ConfigError::NoConfigDir)?
                .join(".grades-cli")
        };
        Ok(config_dir.join("config.toml"))
    }

    /// Explicit path, then `GRADES_CONFIG`, then the default location.
    pub fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
        if let Some(path) = explicit {
            return Ok(path.to_path_buf());
        }
        match std::env::var_os(CONFIG_ENV) {
            Some(path) if !path.is_empty() => Ok(PathBuf::from(path)),
            _ => Self::default_path(),
        }
    }

    /// Read the file (if any), apply environment overrides and validate.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = Self::resolve_path(explicit)?;
        debug!("Loading config from: {:?}", path);

        let mut raw = RawConfig::from_file(&path)?;
        raw.apply_env(|key| std::env::var(key).ok())?;
        raw.validate(path)
    }
}

impl RawConfig {
    /// Parse `path`; a missing file yields an empty configuration so that
    /// environment variables alone can configure the tool.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!("Config file {:?} doesn't exist, using environment only", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn apply_env<F>(&mut self, var: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = var(SHEET_URL_ENV) {
            debug!("Sheet URL overridden by {}", SHEET_URL_ENV);
            self.sheet_url = Some(url);
            self.roster_file = None;
        }
        if let Some(file) = var(ROSTER_FILE_ENV) {
            debug!("Roster file overridden by {}", ROSTER_FILE_ENV);
            self.roster_file = Some(PathBuf::from(file));
            self.sheet_url = None;
        }
        if let Some(column) = var(ID_COLUMN_ENV) {
            self.id_column = Some(column);
        }
        if let Some(ttl) = var(CACHE_TTL_ENV) {
            self.cache.ttl_secs = ttl.trim().parse().map_err(|_| ConfigError::Invalid {
                key: CACHE_TTL_ENV.to_string(),
                reason: format!("'{}' is not a number of seconds", ttl),
            })?;
        }
        Ok(())
    }

    pub fn validate(self, path: PathBuf) -> Result<Config, ConfigError> {
        let source = self.source()?;

        let id_column = non_blank(self.id_column.as_deref())
            .ok_or(ConfigError::Missing { key: "id_column" })?;

        if self.grades.is_empty() {
            return Err(ConfigError::Missing { key: "grades" });
        }

        let mut grades = GradeCatalog::new();
        let mut breakdown = BreakdownCatalog::new();
        let mut seen = HashSet::new();

        for (idx, item) in self.grades.iter().enumerate() {
            let key = format!("grades[{}]", idx);
            let label =
                non_blank(Some(&item.label)).ok_or_else(|| invalid(&key, "label is empty"))?;
            let column =
                non_blank(Some(&item.column)).ok_or_else(|| invalid(&key, "column is empty"))?;

            if !seen.insert(label.clone()) {
                return Err(invalid(&key, &format!("duplicate label '{}'", label)));
            }
            if item.breakdown.iter().any(|c| c.trim().is_empty()) {
                return Err(invalid(&key, "breakdown contains an empty column name"));
            }

            grades.insert(label.clone(), column);
            if !item.breakdown.is_empty() {
                let columns = item.breakdown.iter().map(|c| c.trim().to_string()).collect();
                breakdown.insert(label, columns);
            }
        }

        let lookup = LookupConfig {
            id_column,
            grades,
            breakdown,
            normalize_mode: self.id_normalization.unwrap_or_default(),
        };

        debug!("Loaded config with {} grade items", lookup.grades.len());
        Ok(Config {
            path,
            source,
            lookup,
            cache: self.cache.clone(),
            request_timeout: Duration::from_secs(
                self.request_timeout_secs.unwrap_or_else(default_timeout_secs),
            ),
            raw: self,
        })
    }

    fn source(&self) -> Result<SourceConfig, ConfigError> {
        let url = non_blank(self.sheet_url.as_deref());
        match (url, &self.roster_file) {
            (Some(_), Some(_)) => Err(invalid(
                "sheet_url",
                "set either sheet_url or roster_file, not both",
            )),
            (Some(url), None) => Ok(SourceConfig::SheetUrl(url)),
            (None, Some(path)) => Ok(SourceConfig::File {
                path: path.clone(),
                worksheet: non_blank(self.worksheet.as_deref()),
            }),
            (None, None) => Err(ConfigError::Missing { key: "sheet_url" }),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

fn invalid(key: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
