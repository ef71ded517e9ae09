//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `localgw.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::time::Duration;

use serde::Deserialize;

use localgw_adapter_storage_sqlite_sqlx::pool::DEFAULT_MAX_CONNECTIONS;
use localgw_app::timeout::Timeouts;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Registry database settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Deadlines for registry and device calls.
    pub timeouts: TimeoutsConfig,
    /// Background worker toggles.
    pub workers: WorkersConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL or file path.
    pub url: String,
    /// Pooled connections; each open registry session holds one.
    pub max_connections: u32,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Call deadlines, in milliseconds.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TimeoutsConfig {
    pub registry_ms: u64,
    pub device_ms: u64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct WorkersConfig {
    pub monitor_enabled: bool,
    pub monitor_interval_secs: u64,
    pub scanner_enabled: bool,
    pub scanner_interval_secs: u64,
}

impl Config {
    /// Load configuration from `localgw.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if a
    /// value fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("localgw.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("LOCALGW_HOST") {
            self.server.host = val;
        }
        if let Some(port) = var("LOCALGW_PORT").and_then(|val| val.parse().ok()) {
            self.server.port = port;
        }
        if let Some(val) = var("LOCALGW_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Some(val) = var("LOCALGW_DATABASE_URL") {
            self.database.url = val;
        }
        if let Some(n) = var("LOCALGW_DATABASE_MAX_CONNECTIONS").and_then(|val| val.parse().ok()) {
            self.database.max_connections = n;
        }
        if let Some(val) = var("LOCALGW_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Some(ms) = var("LOCALGW_REGISTRY_TIMEOUT_MS").and_then(|val| val.parse().ok()) {
            self.timeouts.registry_ms = ms;
        }
        if let Some(ms) = var("LOCALGW_DEVICE_TIMEOUT_MS").and_then(|val| val.parse().ok()) {
            self.timeouts.device_ms = ms;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Validation(
                "database max_connections must be non-zero".to_string(),
            ));
        }
        if self.timeouts.registry_ms == 0 || self.timeouts.device_ms == 0 {
            return Err(ConfigError::Validation(
                "timeouts must be non-zero".to_string(),
            ));
        }
        if self.workers.monitor_interval_secs == 0 || self.workers.scanner_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "worker intervals must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Return the database URL in `sqlx`-compatible format.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database.url
    }

    #[must_use]
    pub fn timeouts(&self) -> Timeouts {
        Timeouts {
            registry: Duration::from_millis(self.timeouts.registry_ms),
            device: Duration::from_millis(self.timeouts.device_ms),
        }
    }
}

impl WorkersConfig {
    #[must_use]
    pub fn monitor_interval(&self) -> Duration {
        Duration::from_secs(self.monitor_interval_secs)
    }

    #[must_use]
    pub fn scanner_interval(&self) -> Duration {
        Duration::from_secs(self.scanner_interval_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:localgw.db?mode=rwc".to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "localgwd=info,localgw=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            registry_ms: 5000,
            device_ms: 5000,
        }
    }
}

impl Default for WorkersConfig {
    fn default() -> Self {
        Self {
            monitor_enabled: true,
            monitor_interval_secs: 60,
            scanner_enabled: true,
            scanner_interval_secs: 300,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
