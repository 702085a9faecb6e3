//! In-memory plugin context for tests
//!
//! Serves pages registered up front and records every navigation, so
//! plugin authors can exercise their tools without a network.

use super::context::{parse_render_url, PluginContext};
use crate::error::RenderError;
use crate::logging::PluginLogger;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Test-harness context backed by a fixed set of pages
pub struct StaticContext {
    pages: HashMap<String, String>,
    allowed_schemes: Vec<String>,
    delay: Option<Duration>,
    visited: Mutex<Vec<String>>,
    logger: PluginLogger,
}

impl Default for StaticContext {
    fn default() -> Self {
        Self::new()
    }
}

impl StaticContext {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
            allowed_schemes: vec!["http".to_string(), "https".to_string()],
            delay: None,
            visited: Mutex::new(Vec::new()),
            logger: PluginLogger::new("harness"),
        }
    }

    /// Register the content served for `url`
    ///
    /// Panics if `url` is not an absolute URL; fixtures are expected to be
    /// well-formed.
    pub fn with_page(mut self, url: &str, content: &str) -> Self {
        let key = normalize(url).unwrap_or_else(|| panic!("invalid fixture URL: {}", url));
        self.pages.insert(key, content.to_string());
        self
    }

    /// Make every render wait `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_logger(mut self, logger: PluginLogger) -> Self {
        self.logger = logger;
        self
    }

    /// URLs rendered so far, in completion order
    pub fn visited(&self) -> Vec<String> {
        self.visited
            .lock()
            .map(|v| v.clone())
            .unwrap_or_default()
    }

    pub fn render_count(&self) -> usize {
        self.visited.lock().map(|v| v.len()).unwrap_or(0)
    }
}

fn normalize(url: &str) -> Option<String> {
    reqwest::Url::parse(url.trim()).ok().map(|u| u.to_string())
}

#[async_trait]
impl PluginContext for StaticContext {
    async fn render_url(&self, url: &str) -> Result<String, RenderError> {
        let parsed = parse_render_url(url, &self.allowed_schemes)?;

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let key = parsed.to_string();
        if let Ok(mut visited) = self.visited.lock() {
            visited.push(key.clone());
        }

        self.pages
            .get(&key)
            .cloned()
            .ok_or_else(|| RenderError::Navigation {
                url: url.to_string(),
                reason: "no page registered for this URL".to_string(),
            })
    }

    fn logger(&self) -> PluginLogger {
        self.logger.clone()
    }
}
