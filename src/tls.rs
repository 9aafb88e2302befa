//! TLS termination for the listener.
//!
//! Loads a PEM certificate chain and private key and builds a
//! [`TlsAcceptor`]. The acceptor wraps accepted sockets before they reach the
//! connection loop; command handling is identical with or without TLS.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::ServerConfig;
use thiserror::Error;
use tokio_rustls::TlsAcceptor;

/// Paths to the PEM files that enable TLS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsConfig {
    /// Server certificate chain (PEM)
    pub cert_path: PathBuf,
    /// Server private key (PEM)
    pub key_path: PathBuf,
}

/// TLS setup errors. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum TlsError {
    #[error("certificate load error: {0}")]
    CertificateLoad(String),

    #[error("key load error: {0}")]
    KeyLoad(String),

    #[error("TLS configuration error: {0}")]
    Configuration(#[from] rustls::Error),
}

impl TlsConfig {
    pub fn new(cert_path: impl Into<PathBuf>, key_path: impl Into<PathBuf>) -> Self {
        Self {
            cert_path: cert_path.into(),
            key_path: key_path.into(),
        }
    }

    fn load_certs(path: &Path) -> Result<Vec<CertificateDer<'static>>, TlsError> {
        let file = File::open(path).map_err(|e| {
            TlsError::CertificateLoad(format!("failed to open {}: {}", path.display(), e))
        })?;
        let mut reader = BufReader::new(file);

        let certs = rustls_pemfile::certs(&mut reader)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| TlsError::CertificateLoad(format!("failed to parse certificates: {}", e)))?;

        if certs.is_empty() {
            return Err(TlsError::CertificateLoad(format!(
                "no certificates found in {}",
                path.display()
            )));
        }

        Ok(certs)
    }

    fn load_key(path: &Path) -> Result<PrivateKeyDer<'static>, TlsError> {
        let file = File::open(path)
            .map_err(|e| TlsError::KeyLoad(format!("failed to open {}: {}", path.display(), e)))?;
        let mut reader = BufReader::new(file);

        rustls_pemfile::private_key(&mut reader)
            .map_err(|e| TlsError::KeyLoad(format!("failed to parse key: {}", e)))?
            .ok_or_else(|| TlsError::KeyLoad(format!("no private key found in {}", path.display())))
    }

    /// Builds a TLS acceptor from the certificate and key files.
    pub fn build_acceptor(&self) -> Result<TlsAcceptor, TlsError> {
        let certs = Self::load_certs(&self.cert_path)?;
        let key = Self::load_key(&self.key_path)?;

        let config = ServerConfig::builder()
            .with_no_client_auth()
            .with_single_cert(certs, key)?;

        Ok(TlsAcceptor::from(Arc::new(config)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_file(name: &str, contents: &[u8]) -> PathBuf {
        let path = std::env::temp_dir().join(format!("linekv-{}-{}", std::process::id(), name));
        let mut file = File::create(&path).unwrap();
        file.write_all(contents).unwrap();
        path
    }

    #[test]
    fn test_missing_certificate_file() {
        let config = TlsConfig::new("/nonexistent/cert.pem", "/nonexistent/key.pem");

        let err = config.build_acceptor().err().unwrap();
        assert!(matches!(err, TlsError::CertificateLoad(_)));
        assert!(err.to_string().contains("/nonexistent/cert.pem"));
    }

    #[test]
    fn test_file_without_certificates() {
        let cert = temp_file("empty-cert.pem", b"not a certificate\n");
        let config = TlsConfig::new(&cert, "/nonexistent/key.pem");

        let err = config.build_acceptor().err().unwrap();
        assert!(err.to_string().contains("no certificates found"));

        std::fs::remove_file(cert).unwrap();
    }

    #[test]
    fn test_missing_key_file() {
        // A syntactically valid PEM block is enough to get past certificate loading
        let cert = temp_file(
            "cert.pem",
            b"-----BEGIN CERTIFICATE-----\nAAAA\n-----END CERTIFICATE-----\n",
        );
        let config = TlsConfig::new(&cert, "/nonexistent/key.pem");

        let err = config.build_acceptor().err().unwrap();
        assert!(matches!(err, TlsError::KeyLoad(_)));

        std::fs::remove_file(cert).unwrap();
    }
}
