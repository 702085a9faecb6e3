//! Logging for the aloha binary and for plugins
//!
//! `init_logging` installs the process-wide tracing subscriber.
//! `PluginLogger` is the logging capability a `PluginContext` hands to
//! plugins: every message it emits is a tracing event tagged with the
//! plugin source, optionally scrubbed of secrets first.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, trace, warn};

/// Secret patterns for redaction
static SECRET_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        // API keys and tokens
        Regex::new(
            r#"(?i)(api[_-]?key|token|secret|password|passwd|pwd)\s*[=:]\s*['"]?([^'"\s]+)['"]?"#,
        )
        .unwrap(),
        // Bearer tokens
        Regex::new(r"(?i)bearer\s+[a-zA-Z0-9._-]+").unwrap(),
        // AWS keys
        Regex::new(r"AKIA[A-Z0-9]{16}").unwrap(),
        // Private keys
        Regex::new(r"-----BEGIN\s+(?:RSA\s+)?PRIVATE\s+KEY-----").unwrap(),
    ]
});

/// Initialize the logging/tracing subsystem
pub fn init_logging(debug: bool, default_level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Severity of a plugin log message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// Logger handed to plugins through their context
///
/// Cloning is cheap and every clone writes to the same sink with the same
/// source label.
#[derive(Debug, Clone)]
pub struct PluginLogger {
    source: Arc<str>,
    redact: bool,
}

impl PluginLogger {
    /// Create a logger labelled with `source`
    pub fn new(source: &str) -> Self {
        Self {
            source: Arc::from(source),
            redact: true,
        }
    }

    /// Enable or disable secret redaction
    pub fn with_redaction(mut self, redact: bool) -> Self {
        self.redact = redact;
        self
    }

    /// Label attached to every event
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn redacts(&self) -> bool {
        self.redact
    }

    /// Emit a message at the given level
    pub fn log(&self, level: LogLevel, message: &str) {
        let message = self.prepare(message);
        match level {
            LogLevel::Trace => trace!(plugin = %self.source, "{}", message),
            LogLevel::Debug => debug!(plugin = %self.source, "{}", message),
            LogLevel::Info => info!(plugin = %self.source, "{}", message),
            LogLevel::Warn => warn!(plugin = %self.source, "{}", message),
            LogLevel::Error => error!(plugin = %self.source, "{}", message),
        }
    }

    pub fn trace(&self, message: &str) {
        self.log(LogLevel::Trace, message);
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    /// Text that would actually be written for `message`
    pub fn prepare(&self, message: &str) -> String {
        if self.redact {
            redact_secrets(message)
        } else {
            message.to_string()
        }
    }
}

/// Redact secrets from text
pub fn redact_secrets(text: &str) -> String {
    let mut result = text.to_string();

    for pattern in SECRET_PATTERNS.iter() {
        result = pattern.replace_all(&result, "[REDACTED]").to_string();
    }

    result
}
