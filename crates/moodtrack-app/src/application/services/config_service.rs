use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{info, warn};

use moodtrack_domain::consistency::{ConsistencyPolicy, TrendTieBreak, DEFAULT_TARGET_ENTRIES};
use moodtrack_domain::shared::DomainError;

const APP_DIR: &str = "moodtrack";
const CONFIG_FILE: &str = "config.json";
const DATABASE_FILE: &str = "moodtrack.db";
const QUEUE_FILE: &str = "offline_queue.json";

/// Log level configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl FromStr for LogLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(DomainError::Validation(format!(
                "Unknown log level '{}', expected error|warn|info|debug|trace",
                other
            ))),
        }
    }
}

/// Persistent configuration, stored as JSON. Missing fields take defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Defaults to `<data_dir>/moodtrack/moodtrack.db`
    pub database_path: Option<PathBuf>,
    /// Defaults to `<data_dir>/moodtrack/offline_queue.json`
    pub offline_queue_path: Option<PathBuf>,
    pub log_level: LogLevel,
    /// Offset east of UTC used to decide which calendar day a check-in is on
    pub day_offset_minutes: i32,
    pub trend_tie_break: TrendTieBreak,
    pub consistency_target_entries: u32,
    /// Queue check-ins on transient storage failures instead of failing
    pub queue_on_failure: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            offline_queue_path: None,
            log_level: LogLevel::Info,
            day_offset_minutes: 0,
            trend_tie_break: TrendTieBreak::default(),
            consistency_target_entries: DEFAULT_TARGET_ENTRIES,
            queue_on_failure: true,
        }
    }
}

impl AppConfig {
    pub fn consistency_policy(&self) -> Result<ConsistencyPolicy, DomainError> {
        Ok(ConsistencyPolicy::new()
            .with_day_offset_minutes(self.day_offset_minutes)?
            .with_tie_break(self.trend_tie_break)
            .with_target_entries(self.consistency_target_entries))
    }
}

/// Application configuration service
pub struct ConfigService {
    config: AppConfig,
    config_path: PathBuf,
    /// Problem found while loading; kept so it can be logged once logging is up
    load_warning: Option<String>,
    database_override: Option<PathBuf>,
}

impl ConfigService {
    /// `<config_dir>/moodtrack/config.json`
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// `<data_dir>/moodtrack`, falling back to the working directory
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .unwrap_or_else(|| PathBuf::from(".").join(APP_DIR))
    }

    /// Load from `config_path`. A missing file gives defaults; a malformed
    /// one gives defaults and a warning, and is left untouched on disk.
    pub fn load(config_path: impl Into<PathBuf>) -> Result<Self> {
        let config_path = config_path.into();

        let mut load_warning = None;
        let config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            match serde_json::from_str::<AppConfig>(&content) {
                Ok(config) => config,
                Err(e) => {
                    let message = format!(
                        "Config file {} is malformed ({}), using defaults",
                        config_path.display(),
                        e
                    );
                    warn!("{}", message);
                    load_warning = Some(message);
                    AppConfig::default()
                }
            }
        } else {
            AppConfig::default()
        };

        info!("Config loaded from: {}", config_path.display());

        Ok(Self {
            config,
            config_path,
            load_warning,
            database_override: None,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn load_warning(&self) -> Option<&str> {
        self.load_warning.as_deref()
    }

    /// Replace the database location for this run only; never persisted
    pub fn override_database_path(&mut self, path: PathBuf) {
        self.database_override = Some(path);
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn database_path(&self) -> PathBuf {
        self.database_override
            .clone()
            .or_else(|| self.config.database_path.clone())
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE))
    }

    pub fn offline_queue_path(&self) -> PathBuf {
        self.config
            .offline_queue_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(QUEUE_FILE))
    }

    pub fn log_dir(&self) -> PathBuf {
        Self::default_data_dir().join("logs")
    }

    pub fn get_log_level(&self) -> LogLevel {
        self.config.log_level
    }

    /// Set log level and persist to disk. Applies from the next start.
    ///
    /// Refused while the file on disk is malformed, since saving would
    /// replace every other setting in it with defaults.
    pub fn set_log_level(&mut self, level: LogLevel) -> Result<()> {
        if self.load_warning.is_some() {
            return Err(DomainError::Validation(format!(
                "Config file {} is malformed, fix or remove it before changing settings",
                self.config_path.display()
            ))
            .into());
        }

        info!("Changing log level to: {}", level.as_str());
        self.config.log_level = level;
        self.save()?;
        info!("Log level saved to: {}", self.config_path.display());
        Ok(())
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(&self.config)?;
        std::fs::write(&self.config_path, content)
            .with_context(|| format!("Failed to write {}", self.config_path.display()))?;
        Ok(())
    }
}
