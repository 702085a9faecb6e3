//! HTTP-backed plugin context
//!
//! Used by headless hosts and the `aloha render` command. "Rendering" here
//! means fetching the document over HTTP(S); no script runs.

use super::context::{parse_render_url, PluginContext};
use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::logging::PluginLogger;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Plugin context that renders pages with a shared HTTP client
pub struct HttpContext {
    client: reqwest::Client,
    config: RenderConfig,
    logger: PluginLogger,
}

impl HttpContext {
    /// Create a context from render settings
    pub fn new(config: RenderConfig, logger: PluginLogger) -> Result<Self, RenderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| RenderError::Network {
                url: String::new(),
                reason: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            config,
            logger,
        })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    fn classify(&self, url: &str, err: reqwest::Error) -> RenderError {
        if err.is_timeout() {
            RenderError::Timeout {
                url: url.to_string(),
                seconds: self.config.timeout,
            }
        } else {
            RenderError::Network {
                url: url.to_string(),
                reason: err.to_string(),
            }
        }
    }

    fn too_large(&self, url: &str, size: u64) -> RenderError {
        RenderError::Navigation {
            url: url.to_string(),
            reason: format!(
                "document is {} bytes, limit is {}",
                size, self.config.max_content_bytes
            ),
        }
    }
}

#[async_trait]
impl PluginContext for HttpContext {
    async fn render_url(&self, url: &str) -> Result<String, RenderError> {
        let parsed = parse_render_url(url, &self.config.allowed_schemes)?;
        debug!("Rendering {}", parsed);

        let mut response = self
            .client
            .get(parsed.clone())
            .send()
            .await
            .map_err(|e| self.classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RenderError::Navigation {
                url: url.to_string(),
                reason: format!("HTTP {}", status),
            });
        }

        if let Some(length) = response.content_length() {
            if length > self.config.max_content_bytes {
                return Err(self.too_large(url, length));
            }
        }

        // Chunked responses carry no length up front
        let mut bytes: Vec<u8> = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| self.classify(url, e))? {
            let size = (bytes.len() + chunk.len()) as u64;
            if size > self.config.max_content_bytes {
                return Err(self.too_large(url, size));
            }
            bytes.extend_from_slice(&chunk);
        }
        let body = String::from_utf8_lossy(&bytes).into_owned();

        debug!("Rendered {} ({} bytes)", parsed, body.len());
        Ok(body)
    }

    fn logger(&self) -> PluginLogger {
        self.logger.clone()
    }
}
