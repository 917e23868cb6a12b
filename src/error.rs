//! Error types and error handling for takt.
//!
//! The coordinator itself has a small error surface: configuration problems,
//! signal-handler installation failures, and failures reported by service
//! hooks. Hook errors are logged by the coordinator and never abort its
//! sequencing.

use thiserror::Error;

/// CLI exit codes.
pub mod exit_code {
    /// Success
    pub const SUCCESS: i32 = 0;
    /// General error
    pub const GENERAL_ERROR: i32 = 1;
    /// Configuration error
    pub const CONFIG_ERROR: i32 = 2;
    /// Timeout error
    pub const TIMEOUT_ERROR: i32 = 4;
    /// Command line argument error
    pub const CLI_ERROR: i32 = 64;
}

/// The main error type for takt.
#[derive(Debug, Error)]
pub enum TaktError {
    /// Configuration file is invalid or cannot be loaded.
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A service hook (init, start, stop) failed.
    #[error("Service '{service}' failed: {message}")]
    Service {
        service: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Signal handler could not be installed.
    #[error("Signal handling error: {message}")]
    Signal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation timed out.
    #[error("Timeout: {operation} (waited {seconds}s)")]
    Timeout { operation: String, seconds: u64 },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl TaktError {
    /// Returns the CLI exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            TaktError::Config { .. } | TaktError::Yaml(_) => exit_code::CONFIG_ERROR,
            TaktError::Timeout { .. } => exit_code::TIMEOUT_ERROR,
            _ => exit_code::GENERAL_ERROR,
        }
    }

    /// Creates a configuration error with a message.
    pub fn config(message: impl Into<String>) -> Self {
        TaktError::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a configuration error with a message and source.
    pub fn config_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        TaktError::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a service error with a message.
    pub fn service(service: impl Into<String>, message: impl Into<String>) -> Self {
        TaktError::Service {
            service: service.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Creates a service error with a message and source.
    pub fn service_with_source(
        service: impl Into<String>,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        TaktError::Service {
            service: service.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a signal handling error with a message and source.
    pub fn signal_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        TaktError::Signal {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Result type alias for takt operations.
pub type Result<T> = std::result::Result<T, TaktError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let err = TaktError::config("invalid yaml");
        assert_eq!(err.exit_code(), exit_code::CONFIG_ERROR);

        let err = TaktError::Timeout {
            operation: "stop service".to_string(),
            seconds: 30,
        };
        assert_eq!(err.exit_code(), exit_code::TIMEOUT_ERROR);

        let err = TaktError::service("worker", "start command failed");
        assert_eq!(err.exit_code(), exit_code::GENERAL_ERROR);
    }

    #[test]
    fn test_error_display() {
        let err = TaktError::service("worker", "exited with status 1");
        assert_eq!(format!("{}", err), "Service 'worker' failed: exited with status 1");

        let err = TaktError::Timeout {
            operation: "stop worker".to_string(),
            seconds: 30,
        };
        assert_eq!(format!("{}", err), "Timeout: stop worker (waited 30s)");
    }

    #[test]
    fn test_error_source_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = TaktError::config_with_source("cannot read config", io);

        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(format!("{}", err), "Configuration error: cannot read config");
    }

    #[test]
    fn test_yaml_error_maps_to_config_exit_code() {
        let parse_err = serde_yaml::from_str::<i32>("not: a number").unwrap_err();
        let err = TaktError::from(parse_err);
        assert_eq!(err.exit_code(), exit_code::CONFIG_ERROR);
    }
}
