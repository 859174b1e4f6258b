//! Client configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Default gateway address.
pub const DEFAULT_ADDRESS: &str = "127.0.0.1:8080";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// TLS settings for the connection to the gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TlsOptions {
    /// CA that signed the server certificate (PEM). The system roots are
    /// not consulted.
    pub ca: Option<PathBuf>,

    /// Client certificate and key (PEM), for certificate authentication.
    pub identity: Option<(PathBuf, PathBuf)>,

    /// Name to verify the server certificate against, when it differs from
    /// the address host.
    pub domain: Option<String>,
}

impl TlsOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trust `ca` for the server certificate.
    pub fn with_ca(mut self, ca: impl Into<PathBuf>) -> Self {
        self.ca = Some(ca.into());
        self
    }

    /// Present a client certificate.
    pub fn with_identity(mut self, cert: impl Into<PathBuf>, key: impl Into<PathBuf>) -> Self {
        self.identity = Some((cert.into(), key.into()));
        self
    }

    /// Override the name checked against the server certificate.
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Gateway address as `host:port`.
    pub address: String,

    /// Request timeout.
    pub timeout: Duration,

    /// TLS settings. None connects in plaintext.
    pub tls: Option<TlsOptions>,

    /// Bearer token attached to every call.
    pub access_token: Option<String>,
}

impl ClientConfig {
    /// Create a new client configuration with the specified address.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            timeout: DEFAULT_TIMEOUT,
            tls: None,
            access_token: None,
        }
    }

    /// Create a configuration for connecting to localhost on the default port.
    pub fn localhost() -> Self {
        Self::new(DEFAULT_ADDRESS)
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Connect over TLS.
    pub fn with_tls(mut self, tls: TlsOptions) -> Self {
        self.tls = Some(tls);
        self
    }

    /// Start with a bearer token already set.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// The endpoint URI for the configured address and transport.
    pub fn uri(&self) -> String {
        if self.address.contains("://") {
            return self.address.clone();
        }
        let scheme = if self.tls.is_some() { "https" } else { "http" };
        format!("{}://{}", scheme, self.address)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::localhost()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.address, DEFAULT_ADDRESS);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(config.tls.is_none());
        assert_eq!(config.uri(), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_config_builder() {
        let config = ClientConfig::new("10.0.0.1:8080")
            .with_timeout(Duration::from_secs(60))
            .with_access_token("abc")
            .with_tls(
                TlsOptions::new()
                    .with_ca("ca.crt")
                    .with_identity("client.crt", "client.key")
                    .with_domain("switch1"),
            );

        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.access_token.as_deref(), Some("abc"));
        assert_eq!(config.uri(), "https://10.0.0.1:8080");
        let tls = config.tls.unwrap();
        assert_eq!(tls.domain.as_deref(), Some("switch1"));
        assert_eq!(
            tls.identity,
            Some((PathBuf::from("client.crt"), PathBuf::from("client.key")))
        );
    }

    #[test]
    fn test_explicit_scheme_kept() {
        let config = ClientConfig::new("http://[::1]:9339");
        assert_eq!(config.uri(), "http://[::1]:9339");
    }
}
