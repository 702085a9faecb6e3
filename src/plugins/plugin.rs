//! The plugin extension point
//!
//! Third-party code implements [`Plugin`] to receive tool calls from the
//! host. A plugin is built from exactly one context and keeps it, unchanged,
//! until it is dropped.

use super::context::SharedContext;
use super::protocol::{ToolArg, ToolDefinition};
use crate::error::ToolInvocationError;
use async_trait::async_trait;

/// A plugin providing tools to the assistant
///
/// `tool_call` returns a future, so a tool may await host services without
/// blocking the host; a purely synchronous tool simply returns without
/// awaiting. The host may issue overlapping calls on one instance and no
/// ordering between their completions is promised. Tools that need
/// ordering must serialize internally.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Build the plugin around the context the host provides
    fn new(context: SharedContext) -> Self
    where
        Self: Sized;

    /// The context this plugin was built with
    fn context(&self) -> &SharedContext;

    /// Tools this plugin answers to
    fn tools(&self) -> Vec<ToolDefinition>;

    /// Whether `tool_name` is one of this plugin's tools
    fn declares(&self, tool_name: &str) -> bool {
        self.tools().iter().any(|t| t.name == tool_name)
    }

    /// Run the named tool.
    ///
    /// Unknown names fail with `UnknownTool`, malformed arguments with
    /// `InvalidArguments`, anything else with `ExecutionFailure`. Structured
    /// results are serialized to a string before returning.
    async fn tool_call(
        &self,
        tool_name: &str,
        args: &[ToolArg],
    ) -> Result<String, ToolInvocationError>;
}

impl std::fmt::Debug for dyn Plugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Plugin")
            .field("tools", &self.tools().len())
            .finish_non_exhaustive()
    }
}

/// Fail with `UnknownTool` unless `plugin` declares `tool_name`
pub fn ensure_declared<P: Plugin + ?Sized>(
    plugin: &P,
    tool_name: &str,
) -> Result<(), ToolInvocationError> {
    if plugin.declares(tool_name) {
        Ok(())
    } else {
        Err(ToolInvocationError::unknown(tool_name))
    }
}
