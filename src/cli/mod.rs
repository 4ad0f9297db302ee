//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for the mediator using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// DHIS2 Facility Mediator for OpenHIM
#[derive(Parser, Debug)]
#[command(name = "dhis-mediator")]
#[command(version, about, long_about = None)]
#[command(author = "DHIS2 Mediator Contributors")]
pub struct Cli {
    /// Path to configuration file (defaults and environment only when omitted)
    #[arg(short, long, env = "MEDIATOR_CONFIG")]
    pub config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Register with OpenHIM and serve facility requests
    Serve(commands::serve::ServeArgs),

    /// Validate configuration and registration document
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
