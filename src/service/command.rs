//! Command-backed service implementation.
//!
//! Wraps operator-defined commands in the service capability contract so the
//! CLI binary can coordinate child processes declared in the configuration
//! file. The start command is the service's long-running foreground work;
//! stop and the optional init command are short-lived and bounded by the
//! definition's timeout.

use crate::config::ServiceDefinition;
use crate::error::{Result, TaktError};
use crate::service::{Initializable, Nameable, Runnable};
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Default timeout for bounded command execution in seconds.
const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 60;

/// A service whose lifecycle hooks run operator-defined commands.
///
/// The `Nameable` capability is always present (the definition carries a
/// name); the `Initializable` capability is present only when the definition
/// declares an init command.
pub struct CommandService {
    /// Service definition from configuration.
    definition: ServiceDefinition,
}

impl CommandService {
    /// Creates a new command service from a definition.
    pub fn new(definition: ServiceDefinition) -> Self {
        Self { definition }
    }

    /// Returns the underlying service definition.
    pub fn definition(&self) -> &ServiceDefinition {
        &self.definition
    }

    /// Builds a command from a command string, applying the definition's
    /// working directory and environment.
    fn build_command(&self, command: &str) -> Result<Command> {
        // Parse command into program and arguments using shell-style parsing
        let parts = shell_words::split(command).map_err(|e| {
            TaktError::service_with_source(
                &self.definition.name,
                format!("failed to parse command '{}'", command),
                e,
            )
        })?;

        let (program, args) = parts
            .split_first()
            .ok_or_else(|| TaktError::service(&self.definition.name, "empty command"))?;

        let mut cmd = Command::new(program);
        cmd.args(args).stdin(Stdio::null());
        // Dropping the in-flight future must not leave the child behind
        cmd.kill_on_drop(true);

        if let Some(working_dir) = &self.definition.working_dir {
            cmd.current_dir(working_dir);
        }

        for env_var in &self.definition.env {
            if let Some((key, value)) = env_var.split_once('=') {
                cmd.env(key, value);
            } else {
                warn!(
                    service = %self.definition.name,
                    env_var = %env_var,
                    "invalid environment variable format, expected KEY=VALUE"
                );
            }
        }

        Ok(cmd)
    }

    /// Runs a foreground command to completion, inheriting stdout/stderr.
    async fn run_to_completion(&self, command: &str) -> Result<()> {
        let mut cmd = self.build_command(command)?;

        debug!(
            service = %self.definition.name,
            command = command,
            "running foreground command"
        );

        let status = cmd.status().await.map_err(|e| {
            TaktError::service_with_source(
                &self.definition.name,
                format!("failed to spawn '{}'", command),
                e,
            )
        })?;

        if status.success() {
            Ok(())
        } else {
            Err(TaktError::service(
                &self.definition.name,
                format!("'{}' exited with {}", command, status),
            ))
        }
    }

    /// Runs a short-lived command with captured output, bounded by the
    /// definition's timeout.
    async fn run_bounded(&self, command: &str, operation: &str) -> Result<()> {
        let timeout_secs = self.definition.timeout.unwrap_or(DEFAULT_COMMAND_TIMEOUT_SECS);

        let mut cmd = self.build_command(command)?;
        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());

        debug!(
            service = %self.definition.name,
            command = command,
            operation = operation,
            "running command"
        );

        let output = timeout(Duration::from_secs(timeout_secs), cmd.output())
            .await
            .map_err(|_| TaktError::Timeout {
                operation: format!("{} command for '{}'", operation, self.definition.name),
                seconds: timeout_secs,
            })?
            .map_err(|e| {
                TaktError::service_with_source(
                    &self.definition.name,
                    format!("failed to execute '{}'", command),
                    e,
                )
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        debug!(
            service = %self.definition.name,
            exit_code = output.status.code(),
            stdout = %stdout,
            stderr = %stderr,
            "command completed"
        );

        if output.status.success() {
            Ok(())
        } else {
            Err(TaktError::service(
                &self.definition.name,
                format!("'{}' exited with {}: {}", command, output.status, stderr.trim()),
            ))
        }
    }
}

impl Nameable for CommandService {
    fn name(&self) -> String {
        self.definition.name.clone()
    }
}

#[async_trait]
impl Initializable for CommandService {
    async fn init(&self) -> Result<()> {
        match &self.definition.init {
            Some(command) => self.run_bounded(command, "init").await,
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Runnable for CommandService {
    async fn start(&self) -> Result<()> {
        self.run_to_completion(&self.definition.start).await
    }

    async fn stop(&self) -> Result<()> {
        self.run_bounded(&self.definition.stop, "stop").await
    }

    fn as_nameable(&self) -> Option<&dyn Nameable> {
        Some(self)
    }

    fn as_initializable(&self) -> Option<&dyn Initializable> {
        if self.definition.init.is_some() {
            Some(self)
        } else {
            None
        }
    }
}
