//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for xmlsync using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// xmlsync - XML extract loader
#[derive(Parser, Debug)]
#[command(name = "xmlsync")]
#[command(version, about, long_about = None)]
#[command(author = "XmlSync Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "xmlsync.toml", env = "XMLSYNC_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "XMLSYNC_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Import an entity's extract into its inactive replica and activate it
    Import(commands::import::ImportArgs),

    /// Show active replicas and import metadata
    Status(commands::status::StatusArgs),

    /// Make a replica active (manual rollback)
    Activate(commands::activate::ActivateArgs),

    /// Look up a course's imported visibility
    Visibility(commands::visibility::VisibilityArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
