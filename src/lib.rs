//! # linekv - An In-Memory Key-Value Store over a Line Protocol
//!
//! linekv keeps ephemeral shared state in memory and serves it to many
//! concurrent clients over a newline-delimited text protocol, with optional
//! per-key expiry and optional TLS.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                             linekv                               │
//! │                                                                  │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐           │
//! │  │  Listener   │───>│ Connection  │───>│   Router    │           │
//! │  │ (TCP / TLS) │    │   Handler   │    │             │           │
//! │  └─────────────┘    └─────────────┘    └──────┬──────┘           │
//! │                                               │ Command          │
//! │                                               ▼                  │
//! │                     ┌───────────────────────────────────────┐    │
//! │                     │            StorageEngine              │    │
//! │                     │    RwLock<HashMap<String, Entry>>     │    │
//! │                     └───────────────────────────────────────┘    │
//! │                                               ▲                  │
//! │                     ┌─────────────────────────┴─────────────┐    │
//! │                     │           ExpirySweeper               │    │
//! │                     │      (Background Tokio Task)          │    │
//! │                     └───────────────────────────────────────┘    │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use linekv::commands::default_router;
//! use linekv::server::Server;
//! use linekv::storage::{ExpiryConfig, ExpirySweeper, StorageEngine};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let storage = Arc::new(StorageEngine::new());
//!     let sweeper = ExpirySweeper::start(Arc::clone(&storage), ExpiryConfig::default());
//!
//!     let router = Arc::new(default_router(storage));
//!     let server = Server::bind("127.0.0.1:8080", None, router).await?;
//!
//!     server.run_until(async { tokio::signal::ctrl_c().await.ok(); }).await;
//!     sweeper.stop();
//!     Ok(())
//! }
//! ```
//!
//! ## Protocol
//!
//! ```text
//! SET a 1              -> OK
//! GET a                -> 1
//! SET_WITH_TTL b 2 60  -> OK (TTL: 60)
//! DELETE a             -> true
//! GET a                -> (nil)
//! FOO                  -> Error process your command unknown command: FOO
//! ```
//!
//! ## Module Overview
//!
//! - [`storage`]: Thread-safe store with lazy and active expiry
//! - [`commands`]: Command variants and the router
//! - [`protocol`]: Line splitting and reply serialization
//! - [`connection`]: Per-client read/dispatch/reply loop
//! - [`server`]: The listener
//! - [`tls`]: Certificate loading for TLS termination
//! - [`config`]: Command line configuration

pub mod commands;
pub mod config;
pub mod connection;
pub mod protocol;
pub mod server;
pub mod storage;
pub mod tls;

// Re-export commonly used types for convenience
pub use commands::{default_router, Router};
pub use config::Config;
pub use connection::{handle_connection, ConnectionStats};
pub use protocol::{LineParser, ParseError, Reply};
pub use server::{Server, ServerError};
pub use storage::{ExpiryConfig, ExpirySweeper, KeyValueStore, StorageEngine};

/// The default port linekv listens on
pub const DEFAULT_PORT: u16 = 8080;

/// The default host linekv binds to
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Version of linekv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
