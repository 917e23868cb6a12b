//! Configuration module for takt.
//!
//! This module provides all configuration types and loading functionality.
//! Configuration is loaded from YAML files.

mod logging;
mod runner;
mod service;

pub use logging::{LogFormat, LogLevel, LoggingConfig};
pub use runner::{RunnerConfig, ShutdownOrder};
pub use service::ServiceDefinition;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::error::TaktError;

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Runner configuration.
    pub runner: RunnerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Service definitions. File order is registration order.
    pub services: Vec<ServiceDefinition>,
}

impl Config {
    /// Loads configuration from an optional path.
    /// If path is None, uses default search paths.
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Self, TaktError> {
        match path {
            Some(p) => Self::load_from_path(p),
            None => {
                // Try default paths
                let default_paths = [
                    "/etc/takt/config.yaml",
                    "/etc/takt/config.yml",
                    "config.yaml",
                    "config.yml",
                ];

                for path in &default_paths {
                    if Path::new(path).exists() {
                        return Self::load_from_path(path);
                    }
                }

                // No config file found, use defaults
                Ok(Self::default())
            }
        }
    }

    /// Loads configuration from a YAML file.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, TaktError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            TaktError::config(format!(
                "Failed to read config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::load_from_str(&content)
    }

    /// Loads configuration from a YAML string.
    pub fn load_from_str(content: &str) -> Result<Self, TaktError> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| TaktError::config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validates configuration.
    fn validate(&self) -> Result<(), TaktError> {
        let mut names = HashSet::new();

        for definition in &self.services {
            if definition.name.is_empty() {
                return Err(TaktError::config("services[].name is required"));
            }
            if !names.insert(definition.name.as_str()) {
                return Err(TaktError::config(format!(
                    "duplicate service name '{}'",
                    definition.name
                )));
            }
            if definition.start.is_empty() {
                return Err(TaktError::config(format!(
                    "services.{}.start is required",
                    definition.name
                )));
            }
            if definition.stop.is_empty() {
                return Err(TaktError::config(format!(
                    "services.{}.stop is required",
                    definition.name
                )));
            }
            for env_var in &definition.env {
                if !env_var.contains('=') {
                    return Err(TaktError::config(format!(
                        "services.{}.env entry '{}' must be KEY=VALUE",
                        definition.name, env_var
                    )));
                }
            }
        }

        Ok(())
    }
}
