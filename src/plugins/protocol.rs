//! Tool invocation types
//!
//! Defines the values exchanged between a host and a plugin when the
//! assistant calls a tool: declarations, arguments and outcomes.

use crate::error::ToolInvocationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tool definition as declared in a plugin manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name (e.g., "browser.render")
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Positional parameter definitions
    #[serde(default)]
    pub parameters: Vec<ParameterDef>,
    /// Whether this tool requires confirmation
    #[serde(default)]
    pub requires_confirmation: bool,
    /// Whether this tool is potentially destructive
    #[serde(default)]
    pub is_destructive: bool,
}

/// Parameter definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDef {
    /// Parameter name
    pub name: String,
    /// Parameter type (string, number, boolean, array, object)
    #[serde(rename = "type")]
    pub param_type: String,
    /// Description
    pub description: String,
    /// Whether parameter is required
    #[serde(default)]
    pub required: bool,
    /// Default value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

impl ToolDefinition {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            parameters: vec![],
            requires_confirmation: false,
            is_destructive: false,
        }
    }

    /// Append a parameter
    pub fn param(mut self, name: &str, param_type: &str, description: &str, required: bool) -> Self {
        self.parameters.push(ParameterDef {
            name: name.to_string(),
            param_type: param_type.to_string(),
            description: description.to_string(),
            required,
            default: None,
        });
        self
    }

    /// Set the default of the most recently added parameter
    pub fn default_value(mut self, value: serde_json::Value) -> Self {
        if let Some(last) = self.parameters.last_mut() {
            last.default = Some(value);
        }
        self
    }
}

/// A single tool argument
///
/// Serialized untagged, so plain JSON values map straight onto variants:
/// booleans, numbers and strings get their own variant, everything else
/// (null, arrays, objects) is `Structured`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolArg {
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
    Structured(serde_json::Value),
}

impl ToolArg {
    /// Name of the argument's type, as used in parameter definitions
    pub fn kind(&self) -> &'static str {
        match self {
            ToolArg::Bool(_) => "boolean",
            ToolArg::Number(_) => "number",
            ToolArg::Text(_) => "string",
            ToolArg::Structured(serde_json::Value::Array(_)) => "array",
            ToolArg::Structured(serde_json::Value::Object(_)) => "object",
            ToolArg::Structured(_) => "null",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ToolArg::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ToolArg::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            ToolArg::Number(n) => n.as_u64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ToolArg::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ToolArg::Structured(serde_json::Value::Null))
    }

    /// Convert back into a plain JSON value
    pub fn to_value(&self) -> serde_json::Value {
        match self {
            ToolArg::Bool(b) => serde_json::Value::Bool(*b),
            ToolArg::Number(n) => serde_json::Value::Number(n.clone()),
            ToolArg::Text(s) => serde_json::Value::String(s.clone()),
            ToolArg::Structured(v) => v.clone(),
        }
    }
}

impl From<serde_json::Value> for ToolArg {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Bool(b) => ToolArg::Bool(b),
            serde_json::Value::Number(n) => ToolArg::Number(n),
            serde_json::Value::String(s) => ToolArg::Text(s),
            other => ToolArg::Structured(other),
        }
    }
}

impl From<&str> for ToolArg {
    fn from(value: &str) -> Self {
        ToolArg::Text(value.to_string())
    }
}

impl From<String> for ToolArg {
    fn from(value: String) -> Self {
        ToolArg::Text(value)
    }
}

impl From<bool> for ToolArg {
    fn from(value: bool) -> Self {
        ToolArg::Bool(value)
    }
}

impl From<i64> for ToolArg {
    fn from(value: i64) -> Self {
        ToolArg::Number(value.into())
    }
}

impl From<u64> for ToolArg {
    fn from(value: u64) -> Self {
        ToolArg::Number(value.into())
    }
}

impl From<f64> for ToolArg {
    fn from(value: f64) -> Self {
        // NaN and infinities have no JSON form and become null
        serde_json::Value::from(value).into()
    }
}

/// Positional view over a tool's arguments with typed accessors
///
/// Every accessor reports problems as `InvalidArguments` naming the tool.
#[derive(Debug, Clone, Copy)]
pub struct ToolArgs<'a> {
    tool: &'a str,
    args: &'a [ToolArg],
}

impl<'a> ToolArgs<'a> {
    pub fn new(tool: &'a str, args: &'a [ToolArg]) -> Self {
        Self { tool, args }
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Reject calls carrying more than `max` arguments
    pub fn ensure_at_most(&self, max: usize) -> Result<(), ToolInvocationError> {
        if self.args.len() > max {
            return Err(ToolInvocationError::invalid(
                self.tool,
                format!("expected at most {} arguments, got {}", max, self.args.len()),
            ));
        }
        Ok(())
    }

    /// Get a required string argument
    pub fn require_str(&self, index: usize, name: &str) -> Result<&'a str, ToolInvocationError> {
        match self.args.get(index) {
            Some(ToolArg::Text(s)) => Ok(s.as_str()),
            Some(other) => Err(self.wrong_type(name, "string", other)),
            None => Err(ToolInvocationError::invalid(
                self.tool,
                format!("Missing required parameter: {}", name),
            )),
        }
    }

    /// Get an optional boolean argument, with default
    pub fn optional_bool(
        &self,
        index: usize,
        name: &str,
        default: bool,
    ) -> Result<bool, ToolInvocationError> {
        match self.args.get(index) {
            None => Ok(default),
            Some(arg) if arg.is_null() => Ok(default),
            Some(ToolArg::Bool(b)) => Ok(*b),
            Some(other) => Err(self.wrong_type(name, "boolean", other)),
        }
    }

    /// Get an optional non-negative integer argument
    pub fn optional_u64(&self, index: usize, name: &str) -> Result<Option<u64>, ToolInvocationError> {
        match self.args.get(index) {
            None => Ok(None),
            Some(arg) if arg.is_null() => Ok(None),
            Some(arg @ ToolArg::Number(_)) => arg.as_u64().map(Some).ok_or_else(|| {
                ToolInvocationError::invalid(
                    self.tool,
                    format!("Parameter '{}' must be a non-negative integer", name),
                )
            }),
            Some(other) => Err(self.wrong_type(name, "number", other)),
        }
    }

    fn wrong_type(&self, name: &str, expected: &str, got: &ToolArg) -> ToolInvocationError {
        ToolInvocationError::invalid(
            self.tool,
            format!(
                "Parameter '{}' must be a {}, got {}",
                name,
                expected,
                got.kind()
            ),
        )
    }
}

/// One tool invocation issued by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Call ID for correlation
    pub id: String,
    /// Tool name to invoke
    pub tool: String,
    /// Ordered arguments
    #[serde(default)]
    pub args: Vec<ToolArg>,
}

impl ToolCall {
    /// Create a new call with a fresh ID
    pub fn new(tool: &str, args: Vec<ToolArg>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            tool: tool.to_string(),
            args,
        }
    }
}

/// What the host reports back to the assistant after a call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutcome {
    /// Call ID this responds to
    pub id: String,
    /// Tool that was invoked
    pub tool: String,
    /// Whether the call succeeded
    pub success: bool,
    /// Tool output (if success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Error message (if failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Error variant name (if failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
    /// When dispatch started
    pub started_at: DateTime<Utc>,
    /// Wall-clock duration of the call
    pub duration_ms: u64,
}

impl ToolOutcome {
    /// Build an outcome from a call's result
    pub fn from_result(
        call: &ToolCall,
        result: Result<String, ToolInvocationError>,
        started_at: DateTime<Utc>,
        duration_ms: u64,
    ) -> Self {
        let (success, output, error, error_kind) = match result {
            Ok(output) => (true, Some(output), None, None),
            Err(e) => (false, None, Some(e.to_string()), Some(e.kind().to_string())),
        };

        Self {
            id: call.id.clone(),
            tool: call.tool.clone(),
            success,
            output,
            error,
            error_kind,
            started_at,
            duration_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_arg_from_json() {
        let args: Vec<ToolArg> =
            serde_json::from_value(json!([true, 3, 2.5, "text", null, [1, 2], {"k": "v"}])).unwrap();

        assert_eq!(args[0], ToolArg::Bool(true));
        assert_eq!(args[1].as_u64(), Some(3));
        assert_eq!(args[2].as_f64(), Some(2.5));
        assert_eq!(args[3].as_str(), Some("text"));
        assert!(args[4].is_null());
        assert_eq!(args[5].kind(), "array");
        assert_eq!(args[6].kind(), "object");
    }

    #[test]
    fn test_tool_arg_conversions() {
        assert_eq!(ToolArg::from("a"), ToolArg::Text("a".to_string()));
        assert_eq!(ToolArg::from(false), ToolArg::Bool(false));
        assert_eq!(ToolArg::from(7i64).as_u64(), Some(7));
        assert!(ToolArg::from(f64::NAN).is_null());
        assert_eq!(ToolArg::from(json!({"a": 1})).to_value(), json!({"a": 1}));
    }

    #[test]
    fn test_require_str() {
        let args = vec![ToolArg::from("https://example.com"), ToolArg::from(3i64)];
        let view = ToolArgs::new("browser.render", &args);

        assert_eq!(view.require_str(0, "url").unwrap(), "https://example.com");

        let err = view.require_str(1, "label").unwrap_err();
        assert!(matches!(err, ToolInvocationError::InvalidArguments { .. }));
        assert!(err.to_string().contains("must be a string, got number"));

        let err = view.require_str(2, "missing").unwrap_err();
        assert!(err.to_string().contains("Missing required parameter: missing"));
    }

    #[test]
    fn test_optional_accessors() {
        let args = vec![
            ToolArg::from(true),
            ToolArg::from(json!(null)),
            ToolArg::from(-4i64),
            ToolArg::from(12u64),
        ];
        let view = ToolArgs::new("t", &args);

        assert!(view.optional_bool(0, "flag", false).unwrap());
        assert!(view.optional_bool(1, "flag", true).unwrap());
        assert!(!view.optional_bool(9, "flag", false).unwrap());
        assert!(view.optional_bool(3, "flag", false).is_err());

        assert_eq!(view.optional_u64(1, "n").unwrap(), None);
        assert!(view.optional_u64(2, "n").is_err());
        assert_eq!(view.optional_u64(3, "n").unwrap(), Some(12));
        assert!(view.optional_u64(0, "n").is_err());
    }

    #[test]
    fn test_ensure_at_most() {
        let args = vec![ToolArg::from("a"), ToolArg::from("b")];
        let view = ToolArgs::new("t", &args);
        assert!(view.ensure_at_most(2).is_ok());
        assert!(view.ensure_at_most(1).is_err());
    }

    #[test]
    fn test_tool_call_ids_unique() {
        let a = ToolCall::new("t", vec![]);
        let b = ToolCall::new("t", vec![]);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_outcome_from_error() {
        let call = ToolCall::new("nope", vec![]);
        let outcome = ToolOutcome::from_result(
            &call,
            Err(ToolInvocationError::unknown("nope")),
            Utc::now(),
            0,
        );

        assert!(!outcome.success);
        assert_eq!(outcome.id, call.id);
        assert_eq!(outcome.error_kind.as_deref(), Some("unknown_tool"));

        let json = serde_json::to_string(&outcome).unwrap();
        assert!(!json.contains("\"output\""));
    }

    #[test]
    fn test_tool_definition_builder() {
        let tool = ToolDefinition::new("browser.render", "Render a page")
            .param("url", "string", "Page URL", true)
            .param("max_chars", "number", "Truncate output", false)
            .default_value(json!(1000));

        assert_eq!(tool.parameters.len(), 2);
        assert!(tool.parameters[0].default.is_none());
        assert_eq!(tool.parameters[1].default, Some(json!(1000)));

        let json = serde_json::to_string(&tool).unwrap();
        assert!(json.contains("\"type\":\"string\""));
    }
}
