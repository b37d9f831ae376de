//! CLI interface and argument parsing
//!
//! This module provides the command-line interface using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Cascading data-subject erasure across a relational store
#[derive(Parser, Debug)]
#[command(name = "cascade-erasure")]
#[command(version, about, long_about = None)]
#[command(author = "Cascade Erasure Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "erasure.toml", env = "ERASURE_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "ERASURE_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Erase a subject's data across the cascade
    Erase(commands::erase::EraseArgs),

    /// Count what an erasure would affect without changing anything
    Preview(commands::erase::PreviewArgs),

    /// Check for residual rows of a subject
    Verify(commands::verify::VerifyArgs),

    /// Validate configuration file and schema catalog
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
