//! takt - process-lifecycle coordinator
//!
//! This crate coordinates the lifecycle of a set of long-running services:
//! registration, ordered initialization, concurrent launch, and
//! signal-driven shutdown.
//!
//! # Overview
//!
//! A [`Runner`] holds an ordered registry of services implementing the
//! [`Runnable`](service::Runnable) contract. [`Runner::run`] initializes each
//! service in registration order, launches each on its own task, waits for
//! SIGINT or SIGTERM, then stops every service sequentially and returns so
//! the caller decides when the process exits. Naming and initialization are
//! optional capabilities a service may expose; their absence falls back to a
//! type-derived name and a skipped init.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface definitions
//! - [`config`] - Configuration file parsing and validation
//! - [`error`] - Error types and error handling
//! - [`runner`] - Service registration and lifecycle orchestration
//! - [`service`] - The service capability contract and command-backed services

pub mod cli;
pub mod config;
pub mod error;
pub mod runner;
pub mod service;

// Re-exports for convenience
pub use cli::Cli;
pub use config::Config;
pub use error::{Result, TaktError};
pub use runner::{Runner, ShutdownSignal};
pub use service::{CommandService, Initializable, Nameable, Runnable};
