//! Configuration system for the PersonaWeb engine
//!
//! Supports multiple configuration sources with the following precedence
//! (highest to lowest):
//! 1. CLI arguments
//! 2. Environment variables (PERSONAWEB_* prefix)
//! 3. Configuration file (TOML)
//! 4. Default values

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::persona::Persona;

/// Main engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Decision engine settings
    pub engine: EngineSettings,

    /// Transition timing settings
    pub timing: TimingSettings,

    /// Session persistence settings
    pub session: SessionSettings,

    /// Logging configuration
    pub logging: LoggingSettings,
}

/// Decision engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Persona shown when no signal scores above zero
    pub fallback: String,

    /// Optional remote decision endpoint; when set, decisions are POSTed
    /// there first and local scoring is the fallback
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_endpoint: Option<String>,

    /// Remote request timeout in seconds
    pub remote_timeout_secs: u64,
}

/// Transition timing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingSettings {
    /// Duration of the "analyzing visitor" shimmer before a decision lands
    pub shimmer_ms: u64,

    /// Cross-fade duration when swapping hero content
    pub fade_ms: u64,

    /// Interval between auto-cycle ticks
    pub cycle_ms: u64,
}

impl TimingSettings {
    pub fn shimmer(&self) -> Duration {
        Duration::from_millis(self.shimmer_ms)
    }

    pub fn fade(&self) -> Duration {
        Duration::from_millis(self.fade_ms)
    }

    pub fn cycle(&self) -> Duration {
        Duration::from_millis(self.cycle_ms)
    }

    /// Timings for tests: no artificial delays.
    #[cfg(test)]
    pub fn instant() -> Self {
        Self {
            shimmer_ms: 0,
            fade_ms: 0,
            cycle_ms: 10,
        }
    }
}

/// Session persistence settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// File path carrying the chosen persona across runs
    /// (empty = in-memory only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_file: Option<String>,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level: trace, debug, info, warn, error
    pub level: String,

    /// Log file path (empty = no file logging)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Number of rotated log files to keep
    pub max_files: u32,

    /// Enable JSON formatted logging
    pub json_format: bool,
}

// Default implementations

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            engine: EngineSettings::default(),
            timing: TimingSettings::default(),
            session: SessionSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            fallback: "buy_now".to_string(),
            remote_endpoint: None,
            remote_timeout_secs: 5,
        }
    }
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            shimmer_ms: 1000,
            fade_ms: 350,
            cycle_ms: 4500,
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self { store_file: None }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            max_files: 5,
            json_format: false,
        }
    }
}

impl EngineConfig {
    /// Load configuration from file with environment variable overrides
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut config = Self::default();

        // 1. Load from config file if it exists
        if let Some(path) = Self::find_config_file(config_path)? {
            debug!(path = %path.display(), "Loading configuration file");
            let content = fs::read_to_string(&path).map_err(|e| Error::IoRead {
                path: path.clone(),
                source: e,
            })?;
            config = toml::from_str(&content)
                .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))?;
        }

        // 2. Apply environment variable overrides
        config.apply_env_overrides();

        // 3. Expand paths
        config.expand_paths();

        // 4. Validate
        config.validate()?;

        Ok(config)
    }

    /// Find the configuration file to use
    fn find_config_file(explicit_path: Option<&str>) -> Result<Option<PathBuf>> {
        // If explicit path provided, use it (error if not found)
        if let Some(path) = explicit_path {
            let expanded = shellexpand::tilde(path);
            let path = PathBuf::from(expanded.as_ref());
            if path.exists() {
                return Ok(Some(path));
            }
            return Err(Error::ConfigNotFound { path });
        }

        // Search in standard locations
        let search_paths = [
            PathBuf::from("personaweb.toml"),
            dirs::config_dir()
                .map(|p| p.join("personaweb").join("engine.toml"))
                .unwrap_or_default(),
            dirs::home_dir()
                .map(|p| p.join(".personaweb").join("engine.toml"))
                .unwrap_or_default(),
            PathBuf::from("/etc/personaweb/engine.toml"),
        ];

        for path in &search_paths {
            if path.exists() {
                debug!(path = %path.display(), "Found configuration file");
                return Ok(Some(path.clone()));
            }
        }

        debug!("No configuration file found, using defaults");
        Ok(None)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("PERSONAWEB_FALLBACK") {
            self.engine.fallback = val;
        }
        if let Ok(val) = std::env::var("PERSONAWEB_REMOTE_ENDPOINT") {
            if val.is_empty() {
                self.engine.remote_endpoint = None;
            } else {
                self.engine.remote_endpoint = Some(val);
            }
        }
        if let Ok(val) = std::env::var("PERSONAWEB_REMOTE_TIMEOUT_SECS") {
            if let Ok(n) = val.parse() {
                self.engine.remote_timeout_secs = n;
            }
        }

        if let Ok(val) = std::env::var("PERSONAWEB_SHIMMER_MS") {
            if let Ok(n) = val.parse() {
                self.timing.shimmer_ms = n;
            }
        }
        if let Ok(val) = std::env::var("PERSONAWEB_FADE_MS") {
            if let Ok(n) = val.parse() {
                self.timing.fade_ms = n;
            }
        }
        if let Ok(val) = std::env::var("PERSONAWEB_CYCLE_MS") {
            if let Ok(n) = val.parse() {
                self.timing.cycle_ms = n;
            }
        }

        if let Ok(val) = std::env::var("PERSONAWEB_SESSION_FILE") {
            self.session.store_file = Some(val);
        }

        if let Ok(val) = std::env::var("PERSONAWEB_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = std::env::var("PERSONAWEB_LOG_FILE") {
            self.logging.file = Some(val);
        }
        if let Ok(val) = std::env::var("PERSONAWEB_LOG_JSON") {
            self.logging.json_format = val.to_lowercase() == "true" || val == "1";
        }
    }

    /// Expand ~ and other path variables
    fn expand_paths(&mut self) {
        if let Some(ref file) = self.session.store_file {
            self.session.store_file = Some(expand_path(file));
        }
        if let Some(ref file) = self.logging.file {
            self.logging.file = Some(expand_path(file));
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        // Fallback must name a known persona
        self.engine
            .fallback
            .parse::<Persona>()
            .map_err(Error::Config)?;

        // Remote endpoint, when set, must be an HTTP(S) URL
        if let Some(ref endpoint) = self.engine.remote_endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(Error::Config(
                    "remote_endpoint must start with http:// or https://".to_string(),
                ));
            }
        }

        // A zero cycle interval would spin the scheduler
        if self.timing.cycle_ms == 0 {
            return Err(Error::Config("cycle_ms must be greater than 0".to_string()));
        }

        // Validate log level
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(Error::Config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_levels.join(", ")
            )));
        }

        Ok(())
    }

    /// The validated fallback persona.
    pub fn fallback_persona(&self) -> Persona {
        self.engine
            .fallback
            .parse()
            .unwrap_or(Persona::BuyNow)
    }
}

/// Expand ~ and environment variables in paths
fn expand_path(path: &str) -> String {
    shellexpand::full(path)
        .unwrap_or_else(|_| std::borrow::Cow::Borrowed(path))
        .into_owned()
}

/// Initialize a new configuration file
pub fn init_config(path: Option<&str>, force: bool) -> Result<()> {
    let config_path = path
        .map(|p| PathBuf::from(expand_path(p)))
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".personaweb")
                .join("engine.toml")
        });

    if config_path.exists() && !force {
        return Err(Error::Config(format!(
            "Configuration file already exists: {}. Use --force to overwrite.",
            config_path.display()
        )));
    }

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::IoWrite {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    fs::write(&config_path, default_config_template()).map_err(|e| Error::IoWrite {
        path: config_path.clone(),
        source: e,
    })?;

    println!("Configuration file created: {}", config_path.display());
    Ok(())
}

/// Generate default configuration content with comments
fn default_config_template() -> &'static str {
    r#"# PersonaWeb Engine Configuration

[engine]
# Persona shown when no signal scores above zero
# Valid: buy_now, compare, gaming, budget
fallback = "buy_now"

# Remote decision endpoint (comment out for local scoring only).
# When set, the full signal list is POSTed there first; any failure
# falls back to the local engine.
# remote_endpoint = "https://api.personaweb.example/decide"

# Remote request timeout in seconds
remote_timeout_secs = 5

[timing]
# "Analyzing visitor" shimmer duration in milliseconds
shimmer_ms = 1000

# Cross-fade duration when swapping hero content
fade_ms = 350

# Interval between auto-cycle ticks
cycle_ms = 4500

[session]
# File carrying the chosen persona across runs
# (comment out for in-memory only)
# store_file = "~/.personaweb/session"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log file path (comment out to disable file logging)
# file = "~/.personaweb/logs/engine.log"

# Number of rotated log files to keep
max_files = 5

# Enable JSON formatted logging
json_format = false
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.engine.fallback, "buy_now");
        assert!(config.engine.remote_endpoint.is_none());
        assert_eq!(config.timing.shimmer_ms, 1000);
        assert_eq!(config.timing.cycle_ms, 4500);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_env_override() {
        env::set_var("PERSONAWEB_FALLBACK", "gaming");
        env::set_var("PERSONAWEB_CYCLE_MS", "2000");
        env::set_var("PERSONAWEB_LOG_LEVEL", "debug");

        let mut config = EngineConfig::default();
        config.apply_env_overrides();

        assert_eq!(config.engine.fallback, "gaming");
        assert_eq!(config.timing.cycle_ms, 2000);
        assert_eq!(config.logging.level, "debug");

        env::remove_var("PERSONAWEB_FALLBACK");
        env::remove_var("PERSONAWEB_CYCLE_MS");
        env::remove_var("PERSONAWEB_LOG_LEVEL");
    }

    #[test]
    fn test_validation_invalid_fallback() {
        let mut config = EngineConfig::default();
        config.engine.fallback = "vip".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_invalid_endpoint() {
        let mut config = EngineConfig::default();
        config.engine.remote_endpoint = Some("ftp://nope".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_cycle() {
        let mut config = EngineConfig::default();
        config.timing.cycle_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_invalid_log_level() {
        let mut config = EngineConfig::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_valid_config() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_serialize_deserialize() {
        let config = EngineConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: EngineConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.engine.fallback, parsed.engine.fallback);
        assert_eq!(config.timing.cycle_ms, parsed.timing.cycle_ms);
    }

    #[test]
    fn test_parse_config_file() {
        let config_str = r#"
[engine]
fallback = "budget"
remote_endpoint = "https://api.example.com/decide"

[timing]
shimmer_ms = 250
cycle_ms = 1500

[logging]
level = "debug"
"#;

        let config: EngineConfig = toml::from_str(config_str).unwrap();

        assert_eq!(config.engine.fallback, "budget");
        assert_eq!(
            config.engine.remote_endpoint,
            Some("https://api.example.com/decide".to_string())
        );
        assert_eq!(config.timing.shimmer_ms, 250);
        assert_eq!(config.timing.cycle_ms, 1500);
        // Unspecified keys keep defaults
        assert_eq!(config.timing.fade_ms, 350);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_default_template_parses_and_validates() {
        let config: EngineConfig = toml::from_str(default_config_template()).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_fallback_persona() {
        let mut config = EngineConfig::default();
        config.engine.fallback = "budget".to_string();
        assert_eq!(config.fallback_persona(), Persona::Budget);
    }
}
