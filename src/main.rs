//! takt - process-lifecycle coordinator
//!
//! Entry point for the takt binary.

use clap::Parser;
use std::process::ExitCode;
use takt::cli::{Cli, Commands, ConfigCommands, RunArgs};
use takt::config::{Config, LogFormat, LoggingConfig};
use takt::error::TaktError;
use takt::runner::Runner;
use takt::service::CommandService;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // The subscriber is not installed when config loading fails, so
            // report on stderr directly
            eprintln!("takt: {}", e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

/// Main application logic.
fn run(cli: Cli) -> takt::Result<()> {
    match &cli.command {
        Commands::Run(args) => cmd_run(&cli, args),
        Commands::Config(subcmd) => cmd_config(&cli, subcmd),
    }
}

/// Initialize the tracing subscriber from the logging configuration, with the
/// CLI verbosity flags taking precedence over the configured level.
fn init_logging(cli: &Cli, logging: &LoggingConfig) -> takt::Result<()> {
    let level: tracing::Level = cli.verbosity_override().unwrap_or(logging.level).into();

    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(true);

    let result = match logging.format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    result.map_err(|e| TaktError::config(format!("Failed to initialize logging: {}", e)))
}

/// Handle the `run` subcommand.
fn cmd_run(cli: &Cli, args: &RunArgs) -> takt::Result<()> {
    let mut config = load_config(cli)?;

    // Use CLI args if provided, otherwise fall back to config
    if let Some(order) = args.shutdown_order {
        config.runner.shutdown_order = order;
    }
    if let Some(seconds) = args.stop_timeout {
        config.runner.stop_timeout = Some(seconds);
    }

    init_logging(cli, &config.logging)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        services = config.services.len(),
        shutdown_order = ?config.runner.shutdown_order,
        "starting takt"
    );

    let runtime = tokio::runtime::Runtime::new()?;

    runtime.block_on(async {
        let mut runner = Runner::from_config(&config.runner);
        for definition in &config.services {
            runner.register(CommandService::new(definition.clone()));
        }
        runner.run().await
    })
}

/// Handle the `config` subcommand.
fn cmd_config(cli: &Cli, subcmd: &ConfigCommands) -> takt::Result<()> {
    match subcmd {
        ConfigCommands::Validate => match load_config(cli) {
            Ok(_) => {
                println!("✓ Configuration is valid");
                Ok(())
            }
            Err(e) => {
                println!("✗ Configuration is invalid: {}", e);
                Err(e)
            }
        },
        ConfigCommands::Show => {
            let config = load_config(cli)?;
            let yaml = serde_yaml::to_string(&config).map_err(|e| {
                TaktError::config_with_source("Failed to serialize configuration", e)
            })?;
            println!("{}", yaml);
            Ok(())
        }
    }
}

/// Load configuration with error handling.
fn load_config(cli: &Cli) -> takt::Result<Config> {
    Config::load(cli.config.as_deref())
}
