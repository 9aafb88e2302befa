//! The listener: binds the port, optionally terminates TLS, and spawns one
//! connection task per accepted socket.

use crate::commands::Router;
use crate::connection::{handle_connection, ConnectionStats};
use crate::tls::{TlsConfig, TlsError};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tokio_rustls::TlsAcceptor;
use tracing::{debug, error, info, warn};

/// Errors that prevent the listener from starting.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to set up TLS: {0}")]
    Tls(#[from] TlsError),
}

/// A bound listener, ready to accept connections.
pub struct Server {
    listener: TcpListener,
    tls: Option<TlsAcceptor>,
    router: Arc<Router>,
    stats: Arc<ConnectionStats>,
}

impl Server {
    /// Binds `addr` and, when `tls` is given, loads the certificate material.
    ///
    /// TLS material is loaded before binding so a bad certificate never
    /// leaves a half-started listener behind.
    pub async fn bind(
        addr: &str,
        tls: Option<&TlsConfig>,
        router: Arc<Router>,
    ) -> Result<Self, ServerError> {
        let tls = tls.map(TlsConfig::build_acceptor).transpose()?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.to_string(),
                source,
            })?;

        Ok(Self {
            listener,
            tls,
            router,
            stats: Arc::new(ConnectionStats::new()),
        })
    }

    /// The address actually bound (useful when binding port 0).
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Whether accepted connections are TLS-terminated.
    pub fn is_tls(&self) -> bool {
        self.tls.is_some()
    }

    /// Shared connection statistics.
    pub fn stats(&self) -> Arc<ConnectionStats> {
        Arc::clone(&self.stats)
    }

    /// Accepts connections until `shutdown` completes.
    pub async fn run_until<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            _ = self.accept_loop() => {}
            _ = shutdown => {
                info!("Listener shutting down");
            }
        }
    }

    /// Main loop that accepts incoming connections.
    ///
    /// An accept error is logged and the loop keeps going.
    pub async fn accept_loop(&self) {
        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => self.spawn_connection(stream, addr),
                Err(e) => {
                    error!("Failed to accept connection: {}", e);
                }
            }
        }
    }

    fn spawn_connection(&self, stream: TcpStream, addr: SocketAddr) {
        let router = Arc::clone(&self.router);
        let stats = Arc::clone(&self.stats);

        if let Err(e) = stream.set_nodelay(true) {
            debug!(client = %addr, error = %e, "Failed to set TCP_NODELAY");
        }

        match self.tls.clone() {
            None => {
                tokio::spawn(handle_connection(stream, addr, router, stats));
            }
            Some(acceptor) => {
                // The handshake runs inside the task so a slow client cannot
                // stall the accept loop.
                tokio::spawn(async move {
                    match acceptor.accept(stream).await {
                        Ok(tls_stream) => handle_connection(tls_stream, addr, router, stats).await,
                        Err(e) => warn!(client = %addr, error = %e, "TLS handshake failed"),
                    }
                });
            }
        }
    }
}
