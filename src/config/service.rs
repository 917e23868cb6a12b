//! Service definition types.

use serde::{Deserialize, Serialize};

/// A command-backed service declared in the configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceDefinition {
    /// Service name.
    pub name: String,

    /// Foreground start command (the service's long-running work).
    pub start: String,

    /// Stop command.
    pub stop: String,

    /// Init command (optional; its presence enables the init capability).
    pub init: Option<String>,

    /// Working directory.
    pub working_dir: Option<String>,

    /// Environment variables, KEY=VALUE.
    pub env: Vec<String>,

    /// Timeout in seconds for the stop and init commands.
    pub timeout: Option<u64>,
}
