//! # Terminal Configuration
//!
//! Configuration management for a cash drop terminal.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     CASHDROP_TIMEZONE=America/Denver                                   │
//! │     CASHDROP_MAX_DROPS=12                                              │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/terminal/terminal.toml (Linux)                           │
//! │     ~/Library/Application Support/com.cashdrop.terminal/terminal.toml  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     America/Los_Angeles, $200.00 float, 10 drops per day               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # terminal.toml
//! [terminal]
//! business_timezone = "America/Los_Angeles"
//! draft_cache_key = "cashDropDraft"
//! notification_ttl_secs = 5
//!
//! [storage]
//! database_path = "/var/lib/cashdrop/cashdrop.db"
//! cache_dir = "/var/lib/cashdrop/cache"
//!
//! [operator]
//! name = "Register Operator"
//! is_admin = false
//!
//! [admin]
//! shifts = ["1", "2", "3"]
//! workstations = ["WS-1", "WS-2"]
//! starting_amount = "200.00"
//! max_cash_drops_per_day = 10
//!
//! [submission]
//! compensate_orphan_drawer = false
//! ```

use cashdrop_core::calendar::{parse_timezone, DEFAULT_TIMEZONE};
use cashdrop_core::validation::{validate_daily_limit, validate_starting_amount};
use cashdrop_core::{AdminSettings, BusinessCalendar, Clock, CurrentUser, Money};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{SessionError, SessionResult};

/// Default key of the offline draft snapshot.
pub const DEFAULT_DRAFT_CACHE_KEY: &str = "cashDropDraft";

/// Default lifetime of a status notification.
pub const DEFAULT_NOTIFICATION_TTL_SECS: u64 = 5;

// =============================================================================
// Section Types
// =============================================================================

/// `[terminal]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalSettings {
    /// IANA zone whose calendar day is "today" for drafts and limits.
    #[serde(default = "default_timezone")]
    pub business_timezone: String,

    /// Key of the offline draft snapshot.
    #[serde(default = "default_draft_cache_key")]
    pub draft_cache_key: String,

    /// How long status notifications stay visible.
    #[serde(default = "default_notification_ttl_secs")]
    pub notification_ttl_secs: u64,
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.name().to_string()
}

fn default_draft_cache_key() -> String {
    DEFAULT_DRAFT_CACHE_KEY.to_string()
}

fn default_notification_ttl_secs() -> u64 {
    DEFAULT_NOTIFICATION_TTL_SECS
}

impl Default for TerminalSettings {
    fn default() -> Self {
        TerminalSettings {
            business_timezone: default_timezone(),
            draft_cache_key: default_draft_cache_key(),
            notification_ttl_secs: default_notification_ttl_secs(),
        }
    }
}

/// `[storage]` section. Unset paths resolve under the platform data dir.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,
}

/// `[operator]` section, the signed-in operator for a single-user terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorSettings {
    #[serde(default = "default_operator_name")]
    pub name: String,

    #[serde(default)]
    pub is_admin: bool,
}

fn default_operator_name() -> String {
    "Register Operator".to_string()
}

impl Default for OperatorSettings {
    fn default() -> Self {
        OperatorSettings {
            name: default_operator_name(),
            is_admin: false,
        }
    }
}

/// `[submission]` section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionSettings {
    /// Delete the drawer row again when its drop row could not be created.
    #[serde(default)]
    pub compensate_orphan_drawer: bool,
}

// =============================================================================
// Terminal Config
// =============================================================================

/// Complete terminal configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalConfig {
    #[serde(default)]
    pub terminal: TerminalSettings,

    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub operator: OperatorSettings,

    /// Fallback admin settings, also served by `ConfigAuthProvider`.
    #[serde(default)]
    pub admin: AdminSettings,

    #[serde(default)]
    pub submission: SubmissionSettings,
}

impl TerminalConfig {
    /// Creates a new config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (terminal.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> SessionResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading terminal config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load terminal config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> SessionResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| SessionError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| SessionError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| SessionError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Terminal config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> SessionResult<()> {
        parse_timezone(&self.terminal.business_timezone)
            .map_err(|e| SessionError::InvalidConfig(e.to_string()))?;

        if self.terminal.notification_ttl_secs == 0 {
            return Err(SessionError::InvalidConfig(
                "notification_ttl_secs must be greater than 0".into(),
            ));
        }

        if self.terminal.draft_cache_key.trim().is_empty() {
            return Err(SessionError::InvalidConfig(
                "draft_cache_key must not be empty".into(),
            ));
        }

        validate_starting_amount(self.admin.starting_amount)
            .map_err(|e| SessionError::InvalidConfig(e.to_string()))?;
        validate_daily_limit(self.admin.max_cash_drops_per_day)
            .map_err(|e| SessionError::InvalidConfig(e.to_string()))?;

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(tz) = std::env::var("CASHDROP_TIMEZONE") {
            debug!(timezone = %tz, "Overriding business timezone from environment");
            self.terminal.business_timezone = tz;
        }

        if let Ok(path) = std::env::var("CASHDROP_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.storage.database_path = Some(PathBuf::from(path));
        }

        if let Ok(dir) = std::env::var("CASHDROP_CACHE_DIR") {
            self.storage.cache_dir = Some(PathBuf::from(dir));
        }

        if let Ok(name) = std::env::var("CASHDROP_OPERATOR") {
            self.operator.name = name;
        }

        if let Ok(amount) = std::env::var("CASHDROP_STARTING_AMOUNT") {
            match Money::parse(&amount) {
                Ok(parsed) => {
                    debug!(starting_amount = %parsed, "Overriding starting amount from environment");
                    self.admin.starting_amount = parsed;
                }
                Err(e) => warn!(value = %amount, error = %e, "Ignoring CASHDROP_STARTING_AMOUNT"),
            }
        }

        if let Ok(max) = std::env::var("CASHDROP_MAX_DROPS") {
            match max.parse::<u32>() {
                Ok(parsed) => self.admin.max_cash_drops_per_day = parsed,
                Err(_) => warn!(value = %max, "Ignoring CASHDROP_MAX_DROPS"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("terminal.toml"))
    }

    fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("com", "cashdrop", "terminal")
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Business calendar driven by the wall clock.
    pub fn calendar(&self) -> SessionResult<BusinessCalendar> {
        let tz = parse_timezone(&self.terminal.business_timezone)
            .map_err(|e| SessionError::InvalidConfig(e.to_string()))?;
        Ok(BusinessCalendar::system(tz))
    }

    /// Business calendar driven by `clock` (fixed clocks in tests).
    pub fn calendar_with_clock(&self, clock: Arc<dyn Clock>) -> SessionResult<BusinessCalendar> {
        let tz = parse_timezone(&self.terminal.business_timezone)
            .map_err(|e| SessionError::InvalidConfig(e.to_string()))?;
        Ok(BusinessCalendar::new(tz, clock))
    }

    pub fn notification_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.terminal.notification_ttl_secs as i64)
    }

    pub fn draft_cache_key(&self) -> &str {
        &self.terminal.draft_cache_key
    }

    /// SQLite file: `[storage] database_path`, else the platform data dir.
    pub fn database_path(&self) -> PathBuf {
        self.storage.database_path.clone().unwrap_or_else(|| {
            Self::project_dirs()
                .map(|dirs| dirs.data_dir().join("cashdrop.db"))
                .unwrap_or_else(|| PathBuf::from("cashdrop.db"))
        })
    }

    /// Draft cache directory: `[storage] cache_dir`, else the platform cache dir.
    pub fn cache_dir(&self) -> PathBuf {
        self.storage.cache_dir.clone().unwrap_or_else(|| {
            Self::project_dirs()
                .map(|dirs| dirs.cache_dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from("cache"))
        })
    }

    pub fn current_user(&self) -> CurrentUser {
        CurrentUser {
            name: self.operator.name.clone(),
            is_admin: self.operator.is_admin,
        }
    }
}
