//! Plugin SDK for aloha
//!
//! A host hands every plugin a [`PluginContext`]; the plugin implements
//! [`Plugin`] and answers the tool calls the assistant makes.

mod browser;
mod context;
mod harness;
mod host;
mod http;
mod manifest;
mod plugin;
mod protocol;

pub use browser::BrowserTools;
pub use context::{parse_render_url, PluginContext, SharedContext};
pub use harness::StaticContext;
pub use host::PluginHost;
pub use http::HttpContext;
pub use manifest::{is_valid_tool_name, PluginManifest};
pub use plugin::{ensure_declared, Plugin};
pub use protocol::{ParameterDef, ToolArg, ToolArgs, ToolCall, ToolDefinition, ToolOutcome};
