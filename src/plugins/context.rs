//! Plugin context
//!
//! The capability object a host hands to every plugin. It is the only way
//! a plugin reaches host services.

use crate::error::RenderError;
use crate::logging::PluginLogger;
use async_trait::async_trait;
use reqwest::Url;
use std::sync::Arc;

/// Host services available to a plugin
///
/// Implementations must be safe to use from several in-flight tool calls at
/// once. Nothing here promises isolation between those calls: two
/// concurrent renders may observe shared host state.
#[async_trait]
pub trait PluginContext: Send + Sync {
    /// Navigate to `url` and return the rendered document.
    ///
    /// A URL that does not parse, or whose scheme the host does not allow,
    /// fails with `RenderError::InvalidUrl` before any navigation happens.
    async fn render_url(&self, url: &str) -> Result<String, RenderError>;

    /// The host's logger for this plugin. Never fails.
    fn logger(&self) -> PluginLogger;
}

/// How hosts share a context with their plugins
pub type SharedContext = Arc<dyn PluginContext>;

/// Parse `url` and check its scheme against `allowed_schemes`
pub fn parse_render_url(url: &str, allowed_schemes: &[String]) -> Result<Url, RenderError> {
    let parsed = Url::parse(url.trim()).map_err(|e| RenderError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    if !allowed_schemes.iter().any(|s| s == parsed.scheme()) {
        return Err(RenderError::InvalidUrl {
            url: url.to_string(),
            reason: format!("scheme '{}' is not allowed", parsed.scheme()),
        });
    }

    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(RenderError::InvalidUrl {
            url: url.to_string(),
            reason: "missing host".to_string(),
        });
    }

    Ok(parsed)
}
