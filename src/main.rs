// Snapshot Sender - Completion hook for batch export jobs
// Copyright (c) 2025 Snapshot Sender Contributors
// Licensed under the MIT License

use snapshot_sender::cli::{Cli, Commands};
use snapshot_sender::config::{load_config, LoggingConfig};
use snapshot_sender::logging::init_logging;
use clap::Parser;
use std::process;
use tokio::sync::watch;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let (log_level, logging_config) = logging_settings(&cli);
    let logging_guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(5);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Snapshot Sender - completion hook for batch export jobs"
    );

    // Create shutdown signal channel for graceful shutdown
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut sigterm = match signal(SignalKind::terminate()) {
                Ok(s) => s,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to create SIGTERM handler");
                    return;
                }
            };

            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Received SIGINT (Ctrl+C), stopping job...");
                    println!("\n⚠️  Shutdown signal received, stopping job...");
                    let _ = shutdown_tx.send(true);
                }
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM, stopping job...");
                    println!("\n⚠️  Shutdown signal received, stopping job...");
                    let _ = shutdown_tx.send(true);
                }
            }
        }

        #[cfg(not(unix))]
        {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            } else {
                tracing::info!("Received SIGINT (Ctrl+C), stopping job...");
                println!("\n⚠️  Shutdown signal received, stopping job...");
                let _ = shutdown_tx.send(true);
            }
        }
    });

    let exit_code = match execute_command(&cli, shutdown_rx).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            5 // Fatal error exit code
        }
    };

    // process::exit skips destructors, so flush file logs first
    drop(logging_guard);
    process::exit(exit_code);
}

/// Log level and file logging settings
///
/// Taken from the configuration file when it loads, console-only otherwise.
/// `--log-level` always wins.
fn logging_settings(cli: &Cli) -> (String, LoggingConfig) {
    let from_file = match cli.command {
        Commands::Run(_) => load_config(&cli.config)
            .ok()
            .map(|c| (c.application.log_level, c.logging)),
        _ => None,
    };

    let (file_level, logging_config) =
        from_file.unwrap_or_else(|| ("info".to_string(), LoggingConfig::default()));

    let log_level = cli.log_level.clone().unwrap_or(file_level);
    (log_level, logging_config)
}

/// Execute the CLI command
async fn execute_command(cli: &Cli, shutdown_signal: watch::Receiver<bool>) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Run(args) => args.execute(&cli.config, shutdown_signal).await,
        Commands::ValidateConfig(args) => args.execute(&cli.config).await,
        Commands::Init(args) => args.execute().await,
    }
}
