//! hashkey CLI and HTTP API entry point.
//!
//! Binary name: `hashkey`
//!
//! Parses CLI arguments, loads configuration, wires the digest service, then
//! runs the requested command or starts the HTTP server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;
use tokio_util::sync::CancellationToken;

use hashkey_observe::tracing_setup::{self, LogFormat, TracingOptions};

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_setup::init_tracing(&TracingOptions {
        default_filter: tracing_setup::filter_for_verbosity(cli.verbose, cli.quiet).to_string(),
        format: if cli.json {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        },
        enable_otel: cli.otel,
    })
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "hashkey", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init(&cli.config).await;

    let result = match cli.command {
        Commands::Encode { password } => cli::encode::encode_password(&state, &password, cli.json),

        Commands::Serve { port, host } => serve(state, port, host, cli.quiet).await,

        Commands::Completions { .. } => unreachable!("handled above"),
    };

    tracing_setup::shutdown_tracing();
    result
}

/// Run the HTTP server until a signal or `POST /shutdown`, then wait for
/// in-flight digest pipelines.
async fn serve(
    state: AppState,
    port: Option<u16>,
    host: Option<String>,
    quiet: bool,
) -> anyhow::Result<()> {
    let mut server_config = state.config.server.clone();
    if let Some(port) = port {
        server_config.port = port;
    }
    if let Some(host) = host {
        server_config.host = host;
    }

    let addr = server_config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        addr = %addr,
        key_space = state.config.digest.key_space,
        delay_ms = state.config.digest.processing_delay_ms,
        "hashkey listening"
    );

    if !quiet {
        println!(
            "  {} hashkey listening on {}",
            console::style("⚡").bold(),
            console::style(format!("http://{addr}")).cyan()
        );
        println!(
            "  {}",
            console::style("Press Ctrl+C or POST /shutdown to stop").dim()
        );
    }

    let router = http::router::build_router(state.clone());

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal(state.shutdown.clone()))
        .await?;

    let drained = state
        .digest_service
        .drain(server_config.shutdown_timeout())
        .await;

    if !quiet {
        if drained {
            println!("\n  Server stopped.");
        } else {
            println!(
                "\n  Server stopped with {} digest(s) still pending.",
                state.digest_service.in_flight()
            );
        }
    }

    Ok(())
}

/// Wait for Ctrl+C, SIGTERM, or a shutdown request for graceful shutdown.
async fn shutdown_signal(requested: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("failed to install Ctrl+C handler: {e}");
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
                tracing::warn!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
        _ = requested.cancelled() => tracing::info!("shutdown requested, shutting down"),
    }
}
