//! Command-line interface definition for takt.
//!
//! This module defines the CLI structure using clap derive macros,
//! including all subcommands and their arguments.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{LogLevel, ShutdownOrder};

/// takt - process-lifecycle coordinator
///
/// Registers long-running services, initializes them in order, launches each
/// concurrently, and cascades shutdown on SIGINT/SIGTERM.
#[derive(Debug, Parser)]
#[command(name = "takt")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, env = "TAKT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Returns the log level forced by the verbose/quiet flags, or `None`
    /// when the configured level should apply.
    pub fn verbosity_override(&self) -> Option<LogLevel> {
        if self.quiet {
            return Some(LogLevel::Error);
        }

        match self.verbose {
            0 => None,
            1 => Some(LogLevel::Debug),
            _ => Some(LogLevel::Trace),
        }
    }
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the configured services until a termination signal arrives
    Run(RunArgs),

    /// Configuration file operations
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Arguments for the `run` subcommand.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Shutdown cascade order (forward or reverse)
    #[arg(long, value_parser = parse_shutdown_order)]
    pub shutdown_order: Option<ShutdownOrder>,

    /// Per-service stop deadline in seconds
    #[arg(long)]
    pub stop_timeout: Option<u64>,
}

/// Configuration subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Validate the configuration file
    Validate,

    /// Show the current configuration
    Show,
}

/// Parse shutdown order from string.
fn parse_shutdown_order(s: &str) -> Result<ShutdownOrder, String> {
    s.parse().map_err(|e: crate::error::TaktError| e.to_string())
}
