//! Service module - the capability contract between services and the runner.
//!
//! A service must implement [`Runnable`] to be registered. Naming and
//! initialization are optional capabilities: the runner queries for them at
//! registration and init time via [`Runnable::as_nameable`] and
//! [`Runnable::as_initializable`], and absence is an ordinary policy default
//! (fallback name, skipped init), never an error.

pub mod command;


use crate::error::Result;
use async_trait::async_trait;

// Re-exports for convenience
pub use command::CommandService;

/// Required capability: a long-running unit of work with start and stop hooks.
///
/// `start` is expected to run for the lifetime of the process; the runner
/// launches it on its own task and never awaits its completion. `stop` is the
/// cooperative shutdown hook, invoked once during the shutdown cascade. Errors
/// returned by either hook are logged by the runner and do not affect its
/// sequencing.
#[async_trait]
pub trait Runnable: Send + Sync {
    /// Begins the service's work. Runs until the service is done or stopped.
    async fn start(&self) -> Result<()>;

    /// Performs graceful shutdown of the service.
    async fn stop(&self) -> Result<()>;

    /// Optional naming capability. Services without it are logged under a
    /// type-derived fallback name.
    fn as_nameable(&self) -> Option<&dyn Nameable> {
        None
    }

    /// Optional initialization capability. Services without it are skipped
    /// during the init phase.
    fn as_initializable(&self) -> Option<&dyn Initializable> {
        None
    }
}

/// Optional capability: a human-readable service name for log output.
pub trait Nameable {
    /// Returns the display name of the service.
    fn name(&self) -> String;
}

/// Optional capability: one-time initialization before any service starts.
#[async_trait]
pub trait Initializable: Send + Sync {
    /// Initializes the service. Called exactly once, before any service's
    /// `start`.
    async fn init(&self) -> Result<()>;
}

/// Returns the unqualified name of a type, used as the fallback display name
/// for services without the [`Nameable`] capability.
pub fn short_type_name<S: ?Sized>() -> &'static str {
    let full = std::any::type_name::<S>();
    full.rsplit("::").next().unwrap_or(full)
}
