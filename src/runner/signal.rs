//! Termination signal handling.
//!
//! The runner listens for the OS interrupt and terminate signals as its sole
//! external shutdown trigger. A second signal arriving while the shutdown
//! cascade is running is not handled.

use crate::error::{Result, TaktError};
use std::fmt;

/// The termination signal that ended the await phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    /// SIGINT / Ctrl-C.
    Interrupt,
    /// SIGTERM.
    Terminate,
}

impl fmt::Display for ShutdownSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShutdownSignal::Interrupt => write!(f, "interrupt"),
            ShutdownSignal::Terminate => write!(f, "terminate"),
        }
    }
}

/// Listener for process termination signals.
#[cfg(unix)]
pub struct SignalListener {
    interrupt: tokio::signal::unix::Signal,
    terminate: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl SignalListener {
    /// Registers interest in SIGINT and SIGTERM.
    pub fn install() -> Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        let interrupt = signal(SignalKind::interrupt())
            .map_err(|e| TaktError::signal_with_source("failed to install SIGINT handler", e))?;
        let terminate = signal(SignalKind::terminate())
            .map_err(|e| TaktError::signal_with_source("failed to install SIGTERM handler", e))?;

        Ok(Self {
            interrupt,
            terminate,
        })
    }

    /// Blocks until the first termination signal arrives.
    pub async fn recv(&mut self) -> ShutdownSignal {
        tokio::select! {
            _ = self.interrupt.recv() => ShutdownSignal::Interrupt,
            _ = self.terminate.recv() => ShutdownSignal::Terminate,
        }
    }
}

/// Listener for process termination signals. Non-Unix platforms only get
/// Ctrl-C.
#[cfg(not(unix))]
pub struct SignalListener;

#[cfg(not(unix))]
impl SignalListener {
    /// Registers interest in Ctrl-C.
    pub fn install() -> Result<Self> {
        Ok(Self)
    }

    /// Blocks until Ctrl-C arrives.
    pub async fn recv(&mut self) -> ShutdownSignal {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(%error, "ctrl-c handler failed, blocking until the process is killed");
            std::future::pending::<()>().await;
        }
        ShutdownSignal::Interrupt
    }
}
