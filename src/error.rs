//! Error types for aloha

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for aloha
#[derive(Error, Debug)]
pub enum AlohaError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Tool error: {0}")]
    Tool(#[from] ToolInvocationError),

    #[error("Registration error: {0}")]
    Registration(#[from] RegistrationError),

    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),

    #[error("Version sync error: {0}")]
    VersionSync(#[from] VersionSyncError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Failures of `PluginContext::render_url`
///
/// A render either yields the full document or one of these; partial
/// content is never returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("Rendering {url} timed out after {seconds}s")]
    Timeout { url: String, seconds: u64 },

    #[error("Network error while rendering {url}: {reason}")]
    Network { url: String, reason: String },
}

/// Failures of `Plugin::tool_call`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolInvocationError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments for '{tool}': {reason}")]
    InvalidArguments { tool: String, reason: String },

    #[error("Tool '{tool}' failed: {reason}")]
    ExecutionFailure { tool: String, reason: String },
}

impl ToolInvocationError {
    pub fn unknown(tool: &str) -> Self {
        Self::UnknownTool(tool.to_string())
    }

    pub fn invalid(tool: &str, reason: impl Into<String>) -> Self {
        Self::InvalidArguments {
            tool: tool.to_string(),
            reason: reason.into(),
        }
    }

    pub fn failed(tool: &str, reason: impl Into<String>) -> Self {
        Self::ExecutionFailure {
            tool: tool.to_string(),
            reason: reason.into(),
        }
    }

    /// Short machine-readable name of the variant
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownTool(_) => "unknown_tool",
            Self::InvalidArguments { .. } => "invalid_arguments",
            Self::ExecutionFailure { .. } => "execution_failure",
        }
    }
}

/// Errors raised while registering plugins with a host
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("Plugin already registered: {0}")]
    DuplicatePlugin(String),

    #[error("Tool '{tool}' is already provided by plugin '{owner}'")]
    DuplicateTool { tool: String, owner: String },

    #[error("Invalid tool name: '{0}'")]
    InvalidToolName(String),
}

/// Manifest loading and validation errors
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Failed to read manifest {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse manifest: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid manifest: {0}")]
    Invalid(String),
}

/// Errors from the version-sync command
#[derive(Error, Debug)]
pub enum VersionSyncError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("No \"version\" field found in {}", .0.display())]
    MissingVersion(PathBuf),

    #[error("{} is not a JSON object", .0.display())]
    NotAnObject(PathBuf),

    #[error("Failed to serialize manifest: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type alias using AlohaError
pub type Result<T> = std::result::Result<T, AlohaError>;
