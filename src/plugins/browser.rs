//! Browser tools
//!
//! Reference plugin built on `PluginContext::render_url`: fetch a page,
//! pull out its title, or list its links.

use super::context::SharedContext;
use super::plugin::{ensure_declared, Plugin};
use super::protocol::{ToolArg, ToolArgs, ToolDefinition};
use crate::error::ToolInvocationError;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Url;
use std::collections::HashSet;

static TITLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap());

static HREF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<a\s(?:[^>]*?\s)?href\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))"#).unwrap()
});

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Plugin exposing page rendering tools
pub struct BrowserTools {
    context: SharedContext,
}

impl BrowserTools {
    /// Get all tool definitions
    pub fn definitions() -> Vec<ToolDefinition> {
        vec![
            ToolDefinition::new("browser.render", "Render a web page and return its HTML")
                .param("url", "string", "Page URL", true)
                .param(
                    "max_chars",
                    "number",
                    "Truncate the result to this many characters",
                    false,
                ),
            ToolDefinition::new("browser.title", "Get the title of a web page")
                .param("url", "string", "Page URL", true),
            ToolDefinition::new(
                "browser.links",
                "List the absolute link targets on a web page as a JSON array",
            )
            .param("url", "string", "Page URL", true),
        ]
    }

    /// Render a page
    async fn render(&self, args: ToolArgs<'_>) -> Result<String, ToolInvocationError> {
        args.ensure_at_most(2)?;
        let url = args.require_str(0, "url")?;
        let max_chars = args.optional_u64(1, "max_chars")?;

        let html = self.fetch("browser.render", url).await?;

        Ok(match max_chars {
            Some(max) => html
                .chars()
                .take(usize::try_from(max).unwrap_or(usize::MAX))
                .collect(),
            None => html,
        })
    }

    /// Extract the page title
    async fn title(&self, args: ToolArgs<'_>) -> Result<String, ToolInvocationError> {
        args.ensure_at_most(1)?;
        let url = args.require_str(0, "url")?;
        let html = self.fetch("browser.title", url).await?;

        extract_title(&html)
            .ok_or_else(|| ToolInvocationError::failed("browser.title", "page has no <title>"))
    }

    /// List the page's links
    async fn links(&self, args: ToolArgs<'_>) -> Result<String, ToolInvocationError> {
        args.ensure_at_most(1)?;
        let url = args.require_str(0, "url")?;
        let html = self.fetch("browser.links", url).await?;

        let base = Url::parse(url.trim())
            .map_err(|e| ToolInvocationError::invalid("browser.links", e.to_string()))?;
        let links = extract_links(&base, &html);

        serde_json::to_string(&links)
            .map_err(|e| ToolInvocationError::failed("browser.links", e.to_string()))
    }

    async fn fetch(&self, tool: &str, url: &str) -> Result<String, ToolInvocationError> {
        let logger = self.context.logger();
        logger.debug(&format!("{} rendering {}", tool, url));

        self.context.render_url(url).await.map_err(|e| {
            logger.warn(&format!("{} failed: {}", tool, e));
            ToolInvocationError::failed(tool, e.to_string())
        })
    }
}

#[async_trait]
impl Plugin for BrowserTools {
    fn new(context: SharedContext) -> Self {
        Self { context }
    }

    fn context(&self) -> &SharedContext {
        &self.context
    }

    fn tools(&self) -> Vec<ToolDefinition> {
        Self::definitions()
    }

    async fn tool_call(
        &self,
        tool_name: &str,
        args: &[ToolArg],
    ) -> Result<String, ToolInvocationError> {
        ensure_declared(self, tool_name)?;
        let args = ToolArgs::new(tool_name, args);

        match tool_name {
            "browser.render" => self.render(args).await,
            "browser.title" => self.title(args).await,
            "browser.links" => self.links(args).await,
            _ => Err(ToolInvocationError::unknown(tool_name)),
        }
    }
}

/// Text of the first `<title>` element with whitespace collapsed
fn extract_title(html: &str) -> Option<String> {
    let raw = TITLE.captures(html)?.get(1)?.as_str();
    let title = WHITESPACE.replace_all(raw.trim(), " ").to_string();
    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

/// Absolute targets of `<a href>` elements, deduplicated in document order
fn extract_links(base: &Url, html: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for caps in HREF.captures_iter(html) {
        let Some(href) = caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)) else {
            continue;
        };
        let href = href.as_str().trim();

        // Fragments and script links point nowhere new
        if href.is_empty() || href.starts_with('#') || href.starts_with("javascript:") {
            continue;
        }

        if let Ok(resolved) = base.join(href) {
            let resolved = resolved.to_string();
            if seen.insert(resolved.clone()) {
                links.push(resolved);
            }
        }
    }

    links
}
