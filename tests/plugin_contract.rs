//! Contract tests for plugins and their contexts

use aloha::config::HostConfig;
use aloha::error::{RenderError, ToolInvocationError};
use aloha::plugins::{
    ensure_declared, BrowserTools, Plugin, PluginContext, PluginHost, SharedContext,
    StaticContext, ToolArg, ToolArgs, ToolCall, ToolDefinition,
};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Plugin whose tools wait on the context before answering
struct Echo {
    context: SharedContext,
}

#[async_trait]
impl Plugin for Echo {
    fn new(context: SharedContext) -> Self {
        Self { context }
    }

    fn context(&self) -> &SharedContext {
        &self.context
    }

    fn tools(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition::new("echo.slow", "Echo after rendering the slow page")
                .param("text", "string", "Text", true),
            ToolDefinition::new("echo.fast", "Echo immediately").param("text", "string", "Text", true),
        ]
    }

    async fn tool_call(
        &self,
        tool_name: &str,
        args: &[ToolArg],
    ) -> Result<String, ToolInvocationError> {
        ensure_declared(self, tool_name)?;
        let text = ToolArgs::new(tool_name, args).require_str(0, "text")?;

        if tool_name == "echo.slow" {
            self.context
                .render_url("https://slow.example/")
                .await
                .map_err(|e| ToolInvocationError::failed(tool_name, e.to_string()))?;
        }
        Ok(format!("{}:{}", tool_name, text))
    }
}

fn slow_context() -> Arc<StaticContext> {
    Arc::new(
        StaticContext::new()
            .with_page("https://slow.example/", "ok")
            .with_delay(Duration::from_millis(50)),
    )
}

#[test]
fn test_context_identity_preserved() {
    let ctx: SharedContext = slow_context();
    let echo = Echo::new(ctx.clone());
    let browser = BrowserTools::new(ctx.clone());

    assert!(Arc::ptr_eq(echo.context(), &ctx));
    assert!(Arc::ptr_eq(browser.context(), &ctx));
}

#[tokio::test]
async fn test_unknown_tool_fails_without_side_effects() {
    let ctx = slow_context();
    let echo = Echo::new(ctx.clone());

    let err = echo
        .tool_call("echo.loud", &[ToolArg::from("hi")])
        .await
        .unwrap_err();

    assert_eq!(err, ToolInvocationError::UnknownTool("echo.loud".to_string()));
    assert_eq!(ctx.render_count(), 0);
}

#[tokio::test]
async fn test_concurrent_distinct_tools() {
    let echo = Echo::new(slow_context());

    let slow_args = [ToolArg::from("one")];
    let fast_args = [ToolArg::from("two")];
    let (slow, fast) = tokio::join!(
        echo.tool_call("echo.slow", &slow_args),
        echo.tool_call("echo.fast", &fast_args),
    );

    assert_eq!(slow.unwrap(), "echo.slow:one");
    assert_eq!(fast.unwrap(), "echo.fast:two");
}

#[tokio::test]
async fn test_concurrent_calls_through_host() {
    let ctx = slow_context();
    let mut host = PluginHost::new(ctx.clone(), HostConfig::default());
    host.install::<Echo>("echo").unwrap();
    let host = Arc::new(host);

    let mut handles = Vec::new();
    for i in 0..8 {
        let host = host.clone();
        let tool = if i % 2 == 0 { "echo.slow" } else { "echo.fast" };
        handles.push(tokio::spawn(async move {
            host.call(ToolCall::new(tool, vec![ToolArg::from(i.to_string())]))
                .await
        }));
    }

    for (i, handle) in handles.into_iter().enumerate() {
        let tool = if i % 2 == 0 { "echo.slow" } else { "echo.fast" };
        assert_eq!(handle.await.unwrap().unwrap(), format!("{}:{}", tool, i));
    }
    assert_eq!(ctx.render_count(), 4);
}

#[tokio::test]
async fn test_render_malformed_url() {
    let ctx = StaticContext::new();
    for url in ["", "example.com", "http://", "ht!tp://x"] {
        let err = ctx.render_url(url).await.unwrap_err();
        assert!(
            matches!(err, RenderError::InvalidUrl { .. }),
            "{:?} gave {:?}",
            url,
            err
        );
    }
}

#[tokio::test]
async fn test_render_reachable_url() {
    let ctx = StaticContext::new().with_page("https://example.com/a", "<p>a</p>");
    let content = ctx.render_url("https://example.com/a").await.unwrap();
    assert_eq!(content, "<p>a</p>");
}

#[test]
fn test_logger_consistent() {
    let ctx: SharedContext = slow_context();
    let first = ctx.logger();
    let second = ctx.logger();
    assert_eq!(first.source(), second.source());
    assert_eq!(first.redacts(), second.redacts());
}

#[tokio::test]
async fn test_host_reports_failures_as_outcomes() {
    let mut host = PluginHost::new(slow_context(), HostConfig::default());
    host.install::<BrowserTools>("browser").unwrap();

    let outcome = host
        .dispatch(ToolCall::new("browser.title", vec![ToolArg::from(42i64)]))
        .await;
    assert!(!outcome.success);
    assert_eq!(outcome.error_kind.as_deref(), Some("invalid_arguments"));

    let outcome = host.dispatch(ToolCall::new("missing.tool", vec![])).await;
    assert_eq!(outcome.error_kind.as_deref(), Some("unknown_tool"));
}
