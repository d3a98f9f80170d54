//! CLI module for the asset cache proxy
//!
//! Provides subcommands for running the lifecycle phases:
//! - `serve`: install, activate, then proxy requests (default)
//! - `install` / `activate`: run a single phase and exit
//! - `caches`: list cache regions in the configured storage

pub mod cache;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Asset Cache Proxy - cache-first proxy for a static site
#[derive(Parser)]
#[command(name = "asset-cache-proxy")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Install and activate the current cache, then serve requests
    Serve,

    /// Populate the current cache region and exit
    Install,

    /// Delete stale cache regions and exit
    Activate,

    /// List cache regions and their entry counts
    Caches,
}

/// Loads `.env`, configuration and logging shared by every command
fn bootstrap() -> AppConfig {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&config.logging);

    config
}
