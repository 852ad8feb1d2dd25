use clap::Parser;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

use taglink::db::{self, store::SeaOrmStore};
use taglink::server::config::ServerConfig;
use taglink::server::logging::init_logging;
use taglink::version::{self, VERSION};
use taglink::web::{self, validation::RequiredFieldValidator};

#[derive(Parser, Debug)]
#[command(author, version = VERSION, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long)]
    config: Option<String>,
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C.");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => error!(error = %e, "Failed to listen for SIGTERM."),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received.");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    // --- Server Config Setup ---
    let server_config = match ServerConfig::load(args.config.as_deref()) {
        Ok(config) => Arc::new(config),
        Err(e) => {
            eprintln!("Failed to load server configuration: {e}");
            return Err(e.into());
        }
    };

    init_logging(&server_config.log_dir);
    info!("Starting {}", version::banner());

    // --- Database Setup ---
    let db_conn = match db::connect(&server_config).await {
        Ok(conn) => conn,
        Err(e) => {
            error!(error = %e, "Failed to connect to database.");
            return Err(e.into());
        }
    };
    if let Err(e) = db::create_tables(&db_conn).await {
        error!(error = %e, "Failed to migrate tables.");
        return Err(e.into());
    }

    // --- Axum HTTP Server Setup ---
    let http_router = web::create_axum_router(
        Arc::new(SeaOrmStore::new(db_conn)),
        Arc::new(RequiredFieldValidator),
    );

    let listener = TcpListener::bind(server_config.listen_addr()).await?;
    let addr = listener.local_addr()?;
    info!(address = %addr, "HTTP server listening");

    axum::serve(listener, http_router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped.");
    Ok(())
}
