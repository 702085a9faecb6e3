//! Configuration management for aloha
//!
//! Handles loading and merging configuration from multiple sources:
//! 1. Compiled defaults
//! 2. User config (~/.aloha/config.toml)
//! 3. CLI-specified config (--config)
//! 4. Environment variables

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Log levels accepted by `logging.level`
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub render: RenderConfig,
    pub host: HostConfig,
    pub logging: LoggingConfig,
}

/// Settings for the HTTP-backed plugin context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Render timeout in seconds
    pub timeout: u64,
    /// User-Agent header sent with every navigation
    pub user_agent: String,
    /// Largest document accepted, in bytes
    pub max_content_bytes: u64,
    /// URL schemes plugins may navigate to
    pub allowed_schemes: Vec<String>,
}

/// Settings for the in-process plugin host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Seconds the host waits for a tool call (0 waits forever)
    pub tool_timeout: u64,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter level when RUST_LOG is unset
    pub level: String,
    /// Redact secrets from plugin log messages
    pub redact_secrets: bool,
}

/// One config file as written: absent keys stay `None`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    render: FileRenderConfig,
    host: FileHostConfig,
    logging: FileLoggingConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileRenderConfig {
    timeout: Option<u64>,
    user_agent: Option<String>,
    max_content_bytes: Option<u64>,
    allowed_schemes: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileHostConfig {
    tool_timeout: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileLoggingConfig {
    level: Option<String>,
    redact_secrets: Option<bool>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            timeout: 30,
            user_agent: format!("aloha/{}", env!("CARGO_PKG_VERSION")),
            max_content_bytes: 5 * 1024 * 1024, // 5MB
            allowed_schemes: vec!["http".to_string(), "https".to_string()],
        }
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self { tool_timeout: 60 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            redact_secrets: true,
        }
    }
}

impl Config {
    /// Load configuration from all sources
    pub fn load(cli_config: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        // Load user config
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".aloha/config.toml");
            if user_config.exists() {
                debug!("Loading user config from {:?}", user_config);
                config.merge_from_file(&user_config)?;
            }
        }

        // Load CLI-specified config
        if let Some(path) = cli_config {
            debug!("Loading CLI config from {:?}", path);
            config.merge_from_file(path)?;
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration from a file
    fn merge_from_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(format!("{}: {}", path.display(), e)))?;

        let file_config: FileConfig = toml::from_str(&contents)
            .map_err(|e| ConfigError::Parse(format!("{}: {}", path.display(), e)))?;

        self.merge(file_config);
        Ok(())
    }

    /// Merge a config file into this one (keys present in the file win)
    fn merge(&mut self, other: FileConfig) {
        let render = other.render;
        if let Some(timeout) = render.timeout {
            self.render.timeout = timeout;
        }
        if let Some(user_agent) = render.user_agent {
            self.render.user_agent = user_agent;
        }
        if let Some(max) = render.max_content_bytes {
            self.render.max_content_bytes = max;
        }
        if let Some(schemes) = render.allowed_schemes {
            self.render.allowed_schemes = schemes;
        }

        if let Some(timeout) = other.host.tool_timeout {
            self.host.tool_timeout = timeout;
        }

        if let Some(level) = other.logging.level {
            self.logging.level = level;
        }
        if let Some(redact) = other.logging.redact_secrets {
            self.logging.redact_secrets = redact;
        }
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Some(timeout) = env_u64("ALOHA_RENDER_TIMEOUT") {
            self.render.timeout = timeout;
        }
        if let Some(timeout) = env_u64("ALOHA_TOOL_TIMEOUT") {
            self.host.tool_timeout = timeout;
        }
        if let Ok(level) = std::env::var("ALOHA_LOG") {
            self.logging.level = level.to_lowercase();
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.render.timeout == 0 {
            return Err(ConfigError::Invalid(
                "render.timeout must be greater than zero".to_string(),
            ));
        }
        if self.render.allowed_schemes.is_empty() {
            return Err(ConfigError::MissingField(
                "render.allowed_schemes".to_string(),
            ));
        }
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "logging.level must be one of: {:?}",
                LOG_LEVELS
            )));
        }

        Ok(())
    }
}

fn env_u64(name: &str) -> Option<u64> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            debug!("Ignoring non-numeric {}={}", name, raw);
            None
        }
    }
}
