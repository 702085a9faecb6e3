//! Version sync
//!
//! Copies the `version` field of one JSON file (usually `package.json` or
//! similar) into a plugin manifest, keeping every other manifest field.

use crate::error::VersionSyncError;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Result of a successful sync
#[derive(Debug, Clone, PartialEq)]
pub struct VersionSync {
    /// The version written to the manifest
    pub version: Value,
    /// Whether the manifest was started from scratch
    pub created: bool,
}

impl VersionSync {
    /// The version as shown to users (strings without quotes)
    pub fn display_version(&self) -> String {
        match &self.version {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Copy `version` from `source` into `manifest`
///
/// The manifest is left untouched unless the source has a usable version.
pub fn sync_version(source: &Path, manifest: &Path) -> Result<VersionSync, VersionSyncError> {
    let content = fs::read_to_string(source).map_err(|e| VersionSyncError::Read {
        path: source.to_path_buf(),
        source: e,
    })?;
    let package: Value = serde_json::from_str(&content).map_err(|e| VersionSyncError::Parse {
        path: source.to_path_buf(),
        source: e,
    })?;

    let version = package
        .get("version")
        .filter(|v| is_truthy(v))
        .cloned()
        .ok_or_else(|| VersionSyncError::MissingVersion(source.to_path_buf()))?;
    debug!("Found version {} in {:?}", version, source);

    let (mut fields, created) = match read_manifest(manifest)? {
        Some(fields) => (fields, false),
        None => (Map::new(), true),
    };
    fields.insert("version".to_string(), version.clone());

    let mut output = serde_json::to_string_pretty(&Value::Object(fields))?;
    output.push('\n');

    fs::write(manifest, output).map_err(|e| VersionSyncError::Write {
        path: manifest.to_path_buf(),
        source: e,
    })?;

    Ok(VersionSync { version, created })
}

/// Existing manifest fields, or `None` when it has to be created
///
/// Valid JSON that is not an object is refused rather than overwritten.
fn read_manifest(path: &Path) -> Result<Option<Map<String, Value>>, VersionSyncError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            debug!("Manifest {:?} not readable: {}", path, e);
            return Ok(None);
        }
    };

    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Object(fields)) => Ok(Some(fields)),
        Ok(_) => Err(VersionSyncError::NotAnObject(path.to_path_buf())),
        Err(e) => {
            warn!("Manifest {:?} is not valid JSON ({}), replacing it", path, e);
            Ok(None)
        }
    }
}

/// Null, false, zero and the empty string do not count as a version
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
