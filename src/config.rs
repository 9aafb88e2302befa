//! Command line configuration.

use crate::storage::ExpiryConfig;
use crate::tls::TlsConfig;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// An in-memory key-value store served over a line-oriented text protocol.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "linekv", version, about)]
pub struct Config {
    /// Host to bind to
    #[arg(long, default_value = crate::DEFAULT_HOST)]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = crate::DEFAULT_PORT)]
    pub port: u16,

    /// PEM certificate chain; enables TLS together with --key
    #[arg(long, requires = "key", env = "LINEKV_CERT")]
    pub cert: Option<PathBuf>,

    /// PEM private key; enables TLS together with --cert
    #[arg(long, requires = "cert", env = "LINEKV_KEY")]
    pub key: Option<PathBuf>,

    /// Milliseconds between background sweeps for expired keys
    #[arg(long, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(1..))]
    pub sweep_interval_ms: u64,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: crate::DEFAULT_HOST.to_string(),
            port: crate::DEFAULT_PORT,
            cert: None,
            key: None,
            sweep_interval_ms: 1000,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Returns the bind address as a string
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// TLS settings, present only when both files were given.
    pub fn tls(&self) -> Option<TlsConfig> {
        match (&self.cert, &self.key) {
            (Some(cert), Some(key)) => Some(TlsConfig::new(cert, key)),
            _ => None,
        }
    }

    pub fn expiry(&self) -> ExpiryConfig {
        ExpiryConfig {
            interval: Duration::from_millis(self.sweep_interval_ms),
        }
    }
}
