use std::process::ExitCode;
use std::sync::Arc;

use session_replay::adapters::http::{build_app, SessionHandlers};
use session_replay::adapters::{FileSessionStore, InMemorySessionStore, PostgresSessionStore};
use session_replay::config::{AppConfig, LogFormat, ServerConfig, StorageBackend, ValidationError};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let handlers = build_handlers(&config).await?;
    let app = build_app(handlers, &config.server)?;

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(%addr, environment = ?config.server.environment, "Starting session replay server");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match server.log_format {
        LogFormat::Pretty => builder.with_target(false).init(),
        LogFormat::Json => builder.json().init(),
    }
}

async fn build_handlers(config: &AppConfig) -> Result<SessionHandlers, Box<dyn std::error::Error>> {
    let handlers = match config.storage.backend {
        StorageBackend::Memory => {
            warn!("Using in-memory session storage; recordings are lost on restart");
            SessionHandlers::from_store(Arc::new(InMemorySessionStore::new()))
        }
        StorageBackend::File => {
            let path = config.storage.data_path();
            info!(path = %path.display(), "Using file session storage");
            SessionHandlers::from_store(Arc::new(FileSessionStore::new(path)))
        }
        StorageBackend::Postgres => {
            let database = config
                .database
                .as_ref()
                .ok_or(ValidationError::MissingRequired("DATABASE__URL"))?;
            let store = PostgresSessionStore::connect(database).await?;
            info!("Using PostgreSQL session storage");
            SessionHandlers::from_store(Arc::new(store))
        }
    };
    Ok(handlers)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
