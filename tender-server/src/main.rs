use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tender_server::config::Config;
use tender_server::db::{ConnectionManager, PgSessionFactory, schema};
use tender_server::routes::{AppState, create_router};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "tender-server")]
#[command(
    about = "Query gateway and resilient database session manager for the \
             Tender-Track dashboard"
)]
struct Cli {
    /// Server port (overrides config)
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long, env = "HOST")]
    host: Option<String>,

    /// Directory holding the prebuilt dashboard assets
    #[arg(long, env = "STATIC_ROOT")]
    static_root: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config =
        Config::from_env().context("failed to load configuration")?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(static_root) = cli.static_root {
        config.static_root = static_root;
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if config.env_file_loaded {
        info!("loaded .env file");
    }

    let factory = PgSessionFactory::new(&config.database);
    let manager = Arc::new(ConnectionManager::new(Box::new(factory)));
    let state = AppState::new(Arc::clone(&manager));
    let router = create_router(state, &config.static_root);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "server running");
    info!("health check available at http://{addr}/api/health");

    // Bind first, then bring the database up; until the session is
    // established the server runs degraded and the gateway answers 503.
    let startup_manager = Arc::clone(&manager);
    tokio::spawn(async move {
        if startup_manager.connect().await {
            if let Err(err) = schema::ensure_schema(&startup_manager).await {
                warn!(error = %err, "schema bootstrap failed");
            }
        } else {
            info!("server started without database connection");
        }
    });

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shutting down gracefully");
    manager.shutdown().await;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
