//! Configuration management.
//!
//! Runtime settings come from an optional TOML file layered with
//! `CITATION_COUNTS_*` environment variables (nested keys separated by `__`,
//! e.g. `CITATION_COUNTS_PROGRESS__CLOSE_DELAY_MS=0`):
//!
//! ```toml
//! [http]
//! user_agent = "citation-counts/0.3 (mailto:me@example.org)"
//! timeout_secs = 30
//!
//! [progress]
//! close_delay_ms = 5000
//!
//! [semantic_scholar]
//! throttle_ms = 3000
//!
//! [logging]
//! level = "warn"
//!
//! [library]
//! path = "~/papers/library.json"
//! ```
//!
//! The auto-retrieve choice lives separately in [`Preferences`], since the tool
//! writes it back.

mod preferences;

pub use preferences::{AutoRetrieve, PreferenceError, Preferences};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::utils::default_user_agent;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub progress: ProgressConfig,

    #[serde(default)]
    pub semantic_scholar: SemanticScholarConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub library: LibraryConfig,
}

/// HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_agent")]
    pub user_agent: String,

    /// Request timeout; unset means the client never times out
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_agent(),
            timeout_secs: None,
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

fn default_agent() -> String {
    default_user_agent().to_string()
}

/// Progress window settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressConfig {
    /// Delay before a finished progress window is dismissed
    #[serde(default = "default_close_delay_ms")]
    pub close_delay_ms: u64,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            close_delay_ms: default_close_delay_ms(),
        }
    }
}

impl ProgressConfig {
    pub fn close_delay(&self) -> Duration {
        Duration::from_millis(self.close_delay_ms)
    }
}

fn default_close_delay_ms() -> u64 {
    5000
}

/// Semantic Scholar settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticScholarConfig {
    /// Pause after every Semantic Scholar response
    #[serde(default = "default_throttle_ms")]
    pub throttle_ms: u64,
}

impl Default for SemanticScholarConfig {
    fn default() -> Self {
        Self {
            throttle_ms: default_throttle_ms(),
        }
    }
}

impl SemanticScholarConfig {
    pub fn throttle(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }
}

fn default_throttle_ms() -> u64 {
    3000
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl LoggingConfig {
    /// Filter directive for this crate's logs.
    ///
    /// `quiet` wins over `verbose`, and `verbose` over the configured level.
    pub fn filter(&self, verbose: u8, quiet: bool) -> String {
        let level = if quiet {
            "error"
        } else {
            match verbose {
                0 => self.level.as_str(),
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        };
        format!("citation_counts={}", level)
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Library location
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Library file; the platform data directory is used when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// `<config dir>/citation-counts`
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("citation-counts"))
}

/// Look for a config file in the working directory, then the user config dir
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("citation-counts.toml");
    if local.is_file() {
        return Some(local);
    }

    config_dir()
        .map(|dir| dir.join("config.toml"))
        .filter(|path| path.is_file())
}

/// Load configuration from a file, with environment overrides
pub fn load_config(path: &Path) -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(env_source())
        .build()?;

    settings.try_deserialize()
}

/// Configuration from defaults and environment overrides only
pub fn get_config() -> Result<Config, config::ConfigError> {
    config::Config::builder()
        .add_source(env_source())
        .build()?
        .try_deserialize()
}

fn env_source() -> config::Environment {
    config::Environment::with_prefix("CITATION_COUNTS")
        .prefix_separator("_")
        .separator("__")
}
