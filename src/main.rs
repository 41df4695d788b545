use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use pdf2vec::cli::commands::{handle_config, handle_embed, handle_extract, handle_run};
use pdf2vec::cli::{Cli, Commands};
use pdf2vec::models::{Config, OutputFormat};

/// Log to stderr so stdout carries only command results.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let format = cli.format.unwrap_or_default();
    let verbose = cli.verbose;

    tokio::select! {
        result = run_command(cli.command, format, verbose) => {
            result?;
        }
        _ = shutdown_signal() => {
            eprintln!("\nReceived shutdown signal, stopping...");
            std::process::exit(130);
        }
    }

    Ok(())
}

/// Strict config load for the pipeline commands; `config` subcommands load
/// on their own.
fn load_config() -> Result<Config> {
    let (config, source) = Config::load().context("failed to load configuration")?;
    tracing::debug!(source = %source, "loaded configuration");
    Ok(config)
}

async fn run_command(command: Commands, format: OutputFormat, verbose: bool) -> Result<()> {
    match command {
        Commands::Extract(args) => {
            handle_extract(args, load_config()?, format, verbose).await?;
        }
        Commands::Embed(args) => {
            handle_embed(args, load_config()?, format, verbose).await?;
        }
        Commands::Run(args) => {
            handle_run(args, load_config()?, format, verbose).await?;
        }
        Commands::Config(cmd) => {
            handle_config(cmd, format).await?;
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
