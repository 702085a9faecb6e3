//! aloha - plugin SDK tooling
//!
//! This is the main entry point for the aloha binary.

use aloha::config::Config;
use aloha::logging::{init_logging, PluginLogger};
use aloha::plugins::{HttpContext, PluginContext, PluginManifest};
use aloha::version_sync::sync_version;
use anyhow::Result;
use clap::Parser;
use std::path::Path;
use tracing::{debug, error};

mod cli;

use cli::{Args, Command};

#[tokio::main]
async fn main() -> Result<()> {
    // Usage errors exit with 1; help output is not an error
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    let loaded = Config::load(args.config.as_deref());
    let level = loaded
        .as_ref()
        .map(|c| c.logging.level.clone())
        .unwrap_or_else(|_| "warn".to_string());

    init_logging(args.debug, &level);
    debug!("Starting aloha v{}", env!("CARGO_PKG_VERSION"));

    let config = match loaded {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            Config::default()
        }
    };

    if let Err(e) = run(args.command, &config).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Version { source, manifest } => version(&source, &manifest),
        Command::Check { manifest } => check(&manifest),
        Command::Render { url } => render(&url, config).await,
    }
}

/// Sync the manifest version from the source file
fn version(source: &Path, manifest: &Path) -> Result<()> {
    let sync = sync_version(source, manifest)?;
    let version = sync.display_version();

    println!("Found version: {}", version);
    if sync.created {
        println!("Creating new manifest file: {}", manifest.display());
    }
    println!(
        "Successfully updated {} with version {}",
        manifest.display(),
        version
    );
    Ok(())
}

/// Validate a manifest and list its tools
fn check(path: &Path) -> Result<()> {
    let manifest = PluginManifest::load(path)?;
    manifest.validate()?;

    match &manifest.version {
        Some(version) => println!("{} v{}", manifest.name, version),
        None => println!("{} (no version)", manifest.name),
    }
    for tool in &manifest.tools {
        let params: Vec<&str> = tool.parameters.iter().map(|p| p.name.as_str()).collect();
        println!("  {}({}) - {}", tool.name, params.join(", "), tool.description);
    }
    println!("{} tools declared", manifest.tools.len());
    Ok(())
}

/// Render a URL through the HTTP context
async fn render(url: &str, config: &Config) -> Result<()> {
    let logger = PluginLogger::new("aloha").with_redaction(config.logging.redact_secrets);
    let context = HttpContext::new(config.render.clone(), logger)?;

    let content = context.render_url(url).await?;
    println!("{}", content);
    Ok(())
}
