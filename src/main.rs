//! linekv - An In-Memory Key-Value Store over a Line Protocol
//!
//! This is the main entry point for the linekv server.
//! It sets up logging, the store and its sweeper, the router, and the listener.

use anyhow::Context;
use clap::Parser;
use linekv::commands::default_router;
use linekv::server::Server;
use linekv::storage::{ExpirySweeper, StorageEngine};
use linekv::Config;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Set up logging; RUST_LOG wins over --log-level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .with_context(|| format!("invalid log filter {:?}", config.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // Create the storage engine (shared across all connections)
    let storage = Arc::new(StorageEngine::new());

    // Start the background expiry sweeper
    let sweeper = ExpirySweeper::start(Arc::clone(&storage), config.expiry());

    // All registration happens before the listener accepts anything
    let router = Arc::new(default_router(storage.clone()));
    info!(commands = ?router.commands(), "Commands registered");

    let tls = config.tls();
    let server = Server::bind(&config.bind_address(), tls.as_ref(), router)
        .await
        .context("listener setup failed")?;

    info!(
        addr = %server.local_addr()?,
        tls = server.is_tls(),
        version = linekv::VERSION,
        "linekv listening"
    );

    let stats = server.stats();

    // Set up graceful shutdown
    server
        .run_until(async {
            if let Err(e) = signal::ctrl_c().await {
                warn!(error = %e, "Failed to listen for Ctrl+C, shutting down");
            }
            info!("Shutdown signal received, stopping server...");
        })
        .await;

    sweeper.stop();

    info!(
        storage = ?storage.stats(),
        connections = ?stats,
        "Server shutdown complete"
    );
    Ok(())
}
