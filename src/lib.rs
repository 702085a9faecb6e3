//! aloha - plugin SDK for the Aloha assistant
//!
//! Plugins implement [`plugins::Plugin`] and reach the host through the
//! [`plugins::PluginContext`] they are built with. The crate also ships the
//! `aloha` binary, whose `version` command keeps a plugin manifest's version
//! in step with the package it is built from.

pub mod config;
pub mod error;
pub mod logging;
pub mod plugins;
pub mod version_sync;

pub use error::{AlohaError, RenderError, Result, ToolInvocationError};
pub use plugins::{Plugin, PluginContext, SharedContext, ToolArg};
