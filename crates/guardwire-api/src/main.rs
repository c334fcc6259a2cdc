//! guardwire CLI and HTTP service entry point.
//!
//! Binary name: `gwire`
//!
//! Parses CLI arguments, sets up tracing, loads configuration, then either
//! serves the HTTP endpoints or runs a one-shot command.

mod cli;
mod http;
mod state;

use clap::Parser;

use guardwire_infra::config::load_config;
use guardwire_observe::{TracingOptions, verbosity_filter};

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let options = TracingOptions {
        default_filter: verbosity_filter(cli.verbose, cli.quiet).to_string(),
        json: cli.log_json,
        otel: cli.otel,
    };
    guardwire_observe::init_tracing(&options)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    guardwire_observe::shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Signing needs only the secret, not the full service config.
    if let Commands::Sign { timestamp, body } = &cli.command {
        return cli::sign::run_sign(*timestamp, body, cli.json);
    }

    let config = load_config(cli.config.as_deref()).await?;
    tracing::debug!(?config, "configuration loaded");
    let state = AppState::from_config(config)?;

    match cli.command {
        Commands::Serve { host, port } => {
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!(%addr, "guardwire listening");

            let router = http::router::build_router(state);
            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            tracing::info!("server stopped");
        }

        Commands::Alert { file } => {
            cli::alert::run_alert(
                &state,
                &file,
                cli::alert::ReportFormat::from_flags(cli.json, cli.quiet),
            )
            .await?;
        }

        Commands::Sign { .. } => unreachable!("handled above"),
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
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

    tracing::info!("shutdown signal received");
}
