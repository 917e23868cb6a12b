//! Runner configuration types.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::TaktError;

/// Default per-service stop deadline in seconds.
const DEFAULT_STOP_TIMEOUT_SECS: u64 = 30;

/// Runner configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Traversal order for the shutdown cascade.
    pub shutdown_order: ShutdownOrder,

    /// Per-service deadline on the stop hook, in seconds. Explicit `null`
    /// waits indefinitely.
    pub stop_timeout: Option<u64>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            shutdown_order: ShutdownOrder::Forward,
            stop_timeout: Some(DEFAULT_STOP_TIMEOUT_SECS),
        }
    }
}

/// Shutdown cascade traversal order.
///
/// The default is `Forward`: services stop in the same order they started.
/// `Reverse` stops them in the opposite order, for setups where later
/// services depend on earlier ones during their own shutdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShutdownOrder {
    /// Registration order.
    #[default]
    Forward,

    /// Reverse registration order.
    Reverse,
}

impl FromStr for ShutdownOrder {
    type Err = TaktError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "forward" => Ok(ShutdownOrder::Forward),
            "reverse" => Ok(ShutdownOrder::Reverse),
            _ => Err(TaktError::config(format!("Unknown shutdown order: {}", s))),
        }
    }
}
