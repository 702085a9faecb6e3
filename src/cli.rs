//! Command-line argument parsing for aloha

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// aloha - plugin SDK tooling for the Aloha assistant
#[derive(Parser, Debug)]
#[command(name = "aloha")]
#[command(author, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Copy the version field of a JSON file into a plugin manifest
    #[command(after_help = "Example: aloha version package.json dist/manifest.json")]
    Version {
        /// File to read the version from (e.g. package.json)
        #[arg(value_name = "SOURCE")]
        source: PathBuf,

        /// Manifest to update; created if absent
        #[arg(value_name = "MANIFEST")]
        manifest: PathBuf,
    },

    /// Validate a plugin manifest and list its tools
    Check {
        #[arg(value_name = "MANIFEST")]
        manifest: PathBuf,
    },

    /// Render a URL the way plugins see it and print the result
    Render {
        #[arg(value_name = "URL")]
        url: String,
    },
}
