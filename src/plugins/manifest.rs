//! Plugin manifest
//!
//! The manifest is the JSON file a plugin ships to declare its tools.
//! The version-sync command writes its `version` field.

use super::protocol::ToolDefinition;
use crate::error::ManifestError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Dotted identifiers such as `browser.render` or `fs.read_file`
static TOOL_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_-]*(\.[A-Za-z][A-Za-z0-9_-]*)*$").unwrap());

const PARAM_TYPES: [&str; 5] = ["string", "number", "boolean", "array", "object"];

/// Plugin manifest format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginManifest {
    pub name: String,
    #[serde(
        default,
        deserialize_with = "version_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub tools: Vec<ToolDefinition>,
}

/// Accept numeric versions as written by the version-sync command
fn version_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// Check a tool name against the manifest naming rules
pub fn is_valid_tool_name(name: &str) -> bool {
    TOOL_NAME.is_match(name)
}

impl PluginManifest {
    /// Parse a manifest from JSON text
    pub fn from_json(content: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Read and parse a manifest file
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        debug!("Loading manifest from {:?}", path);
        let content = std::fs::read_to_string(path).map_err(|e| ManifestError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json(&content)
    }

    /// Names of all declared tools
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name.as_str()).collect()
    }

    /// Check whether a tool is declared
    pub fn declares(&self, tool_name: &str) -> bool {
        self.tools.iter().any(|t| t.name == tool_name)
    }

    /// Validate names and parameter declarations
    pub fn validate(&self) -> Result<(), ManifestError> {
        if self.name.trim().is_empty() {
            return Err(ManifestError::Invalid("name must not be empty".to_string()));
        }

        let mut seen = HashSet::new();
        for tool in &self.tools {
            if !is_valid_tool_name(&tool.name) {
                return Err(ManifestError::Invalid(format!(
                    "invalid tool name '{}'",
                    tool.name
                )));
            }
            if !seen.insert(tool.name.as_str()) {
                return Err(ManifestError::Invalid(format!(
                    "tool '{}' declared more than once",
                    tool.name
                )));
            }

            let mut params = HashSet::new();
            for param in &tool.parameters {
                if !params.insert(param.name.as_str()) {
                    return Err(ManifestError::Invalid(format!(
                        "tool '{}' declares parameter '{}' more than once",
                        tool.name, param.name
                    )));
                }
                if !PARAM_TYPES.contains(&param.param_type.as_str()) {
                    return Err(ManifestError::Invalid(format!(
                        "tool '{}' parameter '{}' has unknown type '{}'",
                        tool.name, param.name, param.param_type
                    )));
                }
            }
        }

        Ok(())
    }
}
