//! In-process plugin host
//!
//! Routes tool calls to plugins that were handed to it explicitly. Each
//! call runs on its own task, so a panicking tool is reported as a failed
//! call rather than taking the host down.

use super::context::SharedContext;
use super::manifest::is_valid_tool_name;
use super::plugin::Plugin;
use super::protocol::{ToolCall, ToolDefinition, ToolOutcome};
use crate::config::HostConfig;
use crate::error::{RegistrationError, ToolInvocationError};
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Host-side registry and dispatcher
pub struct PluginHost {
    context: SharedContext,
    config: HostConfig,
    plugins: HashMap<String, Arc<dyn Plugin>>,
    tools: HashMap<String, String>, // tool name -> plugin name
}

impl PluginHost {
    /// Create a host that hands `context` to the plugins it installs
    pub fn new(context: SharedContext, config: HostConfig) -> Self {
        Self {
            context,
            config,
            plugins: HashMap::new(),
            tools: HashMap::new(),
        }
    }

    pub fn context(&self) -> &SharedContext {
        &self.context
    }

    /// Construct `P` around the host context and register it
    pub fn install<P: Plugin + 'static>(&mut self, name: &str) -> Result<usize, RegistrationError> {
        let plugin = P::new(self.context.clone());
        self.register(name, Arc::new(plugin))
    }

    /// Register an already constructed plugin; returns its tool count
    pub fn register(
        &mut self,
        name: &str,
        plugin: Arc<dyn Plugin>,
    ) -> Result<usize, RegistrationError> {
        if self.plugins.contains_key(name) {
            return Err(RegistrationError::DuplicatePlugin(name.to_string()));
        }

        let tools = plugin.tools();
        let mut seen = HashSet::new();
        for tool in &tools {
            if !is_valid_tool_name(&tool.name) {
                return Err(RegistrationError::InvalidToolName(tool.name.clone()));
            }
            if !seen.insert(tool.name.as_str()) {
                return Err(RegistrationError::DuplicateTool {
                    tool: tool.name.clone(),
                    owner: name.to_string(),
                });
            }
            if let Some(owner) = self.tools.get(&tool.name) {
                return Err(RegistrationError::DuplicateTool {
                    tool: tool.name.clone(),
                    owner: owner.clone(),
                });
            }
        }

        for tool in &tools {
            self.tools.insert(tool.name.clone(), name.to_string());
        }

        info!("Registered plugin '{}' with {} tools", name, tools.len());
        self.plugins.insert(name.to_string(), plugin);

        Ok(tools.len())
    }

    /// Check if a tool exists
    pub fn has_tool(&self, tool_name: &str) -> bool {
        self.tools.contains_key(tool_name)
    }

    /// Name of the plugin providing a tool
    pub fn plugin_for_tool(&self, tool_name: &str) -> Option<&str> {
        self.tools.get(tool_name).map(String::as_str)
    }

    /// All registered tools, sorted by name
    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        let mut defs: Vec<ToolDefinition> = self
            .plugins
            .values()
            .flat_map(|p| p.tools())
            .collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    /// Execute a tool call
    pub async fn call(&self, call: ToolCall) -> Result<String, ToolInvocationError> {
        let plugin_name = self
            .tools
            .get(&call.tool)
            .ok_or_else(|| ToolInvocationError::unknown(&call.tool))?;
        let plugin = self
            .plugins
            .get(plugin_name)
            .cloned()
            .ok_or_else(|| ToolInvocationError::unknown(&call.tool))?;

        debug!("Dispatching '{}' to plugin '{}'", call.tool, plugin_name);

        let tool = call.tool.clone();
        let task = tokio::spawn(async move { plugin.tool_call(&call.tool, &call.args).await });

        let joined = if self.config.tool_timeout > 0 {
            let limit = Duration::from_secs(self.config.tool_timeout);
            match tokio::time::timeout(limit, task).await {
                Ok(joined) => joined,
                Err(_) => {
                    // The task keeps running; only the wait is abandoned
                    warn!("Tool '{}' timed out after {}s", tool, self.config.tool_timeout);
                    return Err(ToolInvocationError::failed(
                        &tool,
                        format!("timed out after {}s", self.config.tool_timeout),
                    ));
                }
            }
        } else {
            task.await
        };

        joined.unwrap_or_else(|e| {
            warn!("Tool '{}' aborted: {}", tool, e);
            Err(ToolInvocationError::failed(&tool, "tool panicked"))
        })
    }

    /// Execute a tool call and report the result as an outcome
    pub async fn dispatch(&self, call: ToolCall) -> ToolOutcome {
        let started_at = Utc::now();
        let start = Instant::now();

        let result = self.call(call.clone()).await;
        if let Err(e) = &result {
            debug!("Tool call {} failed: {}", call.id, e);
        }

        let duration_ms = start.elapsed().as_millis() as u64;
        ToolOutcome::from_result(&call, result, started_at, duration_ms)
    }
}
