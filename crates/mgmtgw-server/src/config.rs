//! Server configuration.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::auth::{
    AuthConfig, AuthScheme, CredentialValidator, TokenSettings, DEFAULT_LOGIN_ENDPOINT,
    DEFAULT_LOGIN_TIMEOUT, DEFAULT_PAM_SERVICE, DEFAULT_REFRESH_WINDOW_SECS,
    DEFAULT_TOKEN_LIFETIME_SECS,
};
use crate::backend::{MemoryBackend, SharedBackend};
use crate::error::Error;

/// Default address the gRPC server listens on.
pub const DEFAULT_LISTEN_ADDRESS: &str = "0.0.0.0:8080";

/// Default enabled authentication schemes.
pub const DEFAULT_CLIENT_AUTH: &str = "password,jwt,cert";

/// How passwords are validated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum PasswordStrategy {
    /// SSH password handshake against the login endpoint.
    #[default]
    Remote,
    /// Host PAM stack.
    Local,
}

/// Which backend serves configuration and actions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    /// In-process store with the self-test action registered.
    #[default]
    Memory,
}

impl BackendKind {
    pub fn build(self) -> SharedBackend {
        match self {
            BackendKind::Memory => Arc::new(MemoryBackend::with_self_test()),
        }
    }
}

/// Server certificate, key and optional client CA, all PEM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
    /// CA used to verify client certificates.
    pub client_ca: Option<PathBuf>,
}

/// Gateway server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on.
    pub listen_address: SocketAddr,

    /// TLS material. None serves plaintext.
    pub tls: Option<TlsPaths>,

    /// Enabled authentication schemes.
    pub auth: AuthConfig,

    /// Password validation strategy.
    pub password_strategy: PasswordStrategy,

    /// SSH endpoint for the remote strategy.
    pub login_endpoint: String,

    /// PAM service for the local strategy.
    pub pam_service: String,

    /// Timeout for one password check.
    pub login_timeout: Duration,

    /// Token lifetime and refresh window.
    pub token_settings: TokenSettings,

    pub backend: BackendKind,
}

impl ServerConfig {
    /// Create a configuration listening on `listen_address` with defaults
    /// for everything else.
    pub fn new(listen_address: SocketAddr) -> Self {
        Self {
            listen_address,
            tls: None,
            auth: AuthConfig::new([AuthScheme::Password, AuthScheme::Token, AuthScheme::ClientCert]),
            password_strategy: PasswordStrategy::default(),
            login_endpoint: DEFAULT_LOGIN_ENDPOINT.to_string(),
            pam_service: DEFAULT_PAM_SERVICE.to_string(),
            login_timeout: DEFAULT_LOGIN_TIMEOUT,
            token_settings: TokenSettings::default(),
            backend: BackendKind::default(),
        }
    }

    /// Serve TLS with the given certificate and key.
    pub fn with_tls(mut self, cert: impl Into<PathBuf>, key: impl Into<PathBuf>) -> Self {
        self.tls = Some(TlsPaths {
            cert: cert.into(),
            key: key.into(),
            client_ca: None,
        });
        self
    }

    /// Verify client certificates against `ca`. Requires TLS.
    pub fn with_client_ca(mut self, ca: impl Into<PathBuf>) -> Self {
        if let Some(tls) = self.tls.as_mut() {
            tls.client_ca = Some(ca.into());
        }
        self
    }

    /// Set the enabled authentication schemes.
    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.auth = auth;
        self
    }

    /// Set the password validation strategy.
    pub fn with_password_strategy(mut self, strategy: PasswordStrategy) -> Self {
        self.password_strategy = strategy;
        self
    }

    /// Set the SSH endpoint used by the remote strategy.
    pub fn with_login_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.login_endpoint = endpoint.into();
        self
    }

    /// Set the token lifetime and refresh window.
    pub fn with_token_settings(mut self, settings: TokenSettings) -> Self {
        self.token_settings = settings;
        self
    }

    /// Check if the server speaks TLS.
    pub fn has_tls(&self) -> bool {
        self.tls.is_some()
    }

    /// Check the configuration for contradictions.
    pub fn validate(&self) -> Result<(), Error> {
        self.token_settings.validate().map_err(Error::Config)?;

        if let Some(tls) = &self.tls {
            if self.auth.is_enabled(AuthScheme::ClientCert) && tls.client_ca.is_none() {
                return Err(Error::Config(
                    "client certificate authentication requires --client-ca".to_string(),
                ));
            }
        }

        if self.auth.is_enabled(AuthScheme::Password) {
            match self.password_strategy {
                PasswordStrategy::Remote if !cfg!(feature = "ssh-login") => {
                    return Err(Error::Config(
                        "remote password validation requires the ssh-login feature".to_string(),
                    ));
                }
                PasswordStrategy::Local if !cfg!(feature = "pam") => {
                    return Err(Error::Config(
                        "local password validation requires the pam feature".to_string(),
                    ));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Build the password validator for the configured strategy.
    ///
    /// Password login disabled yields [`CredentialValidator::None`].
    pub fn credential_validator(&self) -> Result<CredentialValidator, Error> {
        if !self.auth.is_enabled(AuthScheme::Password) {
            return Ok(CredentialValidator::None);
        }

        match self.password_strategy {
            #[cfg(feature = "ssh-login")]
            PasswordStrategy::Remote => Ok(CredentialValidator::RemoteLogin(
                crate::auth::RemoteLogin::new(self.login_endpoint.as_str())
                    .with_timeout(self.login_timeout),
            )),
            #[cfg(feature = "pam")]
            PasswordStrategy::Local => Ok(CredentialValidator::LocalPam(
                crate::auth::PamLogin::new(self.pam_service.as_str()),
            )),
            #[allow(unreachable_patterns)]
            other => Err(Error::Config(format!(
                "password strategy {:?} is not compiled in",
                other
            ))),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(SocketAddr::from(([0, 0, 0, 0], 8080)))
    }
}

/// Command-line arguments for the server.
#[derive(Parser, Debug)]
#[command(name = "mgmtgw-server")]
#[command(version, about = "gNMI/gNOI management gateway", long_about = None)]
pub struct Args {
    /// Address to listen on.
    #[arg(short, long, default_value = DEFAULT_LISTEN_ADDRESS)]
    pub listen: SocketAddr,

    /// Server certificate (PEM). Plaintext when omitted.
    #[arg(long, requires = "tls_key")]
    pub tls_cert: Option<PathBuf>,

    /// Server private key (PEM).
    #[arg(long, requires = "tls_cert")]
    pub tls_key: Option<PathBuf>,

    /// CA used to verify client certificates (PEM).
    #[arg(long, requires = "tls_cert")]
    pub client_ca: Option<PathBuf>,

    /// Comma-separated authentication schemes: password, jwt, cert.
    #[arg(long, default_value = DEFAULT_CLIENT_AUTH)]
    pub client_auth: AuthConfig,

    /// Password validation strategy.
    #[arg(long, value_enum, default_value_t = PasswordStrategy::Remote)]
    pub password_strategy: PasswordStrategy,

    /// SSH endpoint for remote password validation.
    #[arg(long, default_value = DEFAULT_LOGIN_ENDPOINT)]
    pub login_endpoint: String,

    /// PAM service for local password validation.
    #[arg(long, default_value = DEFAULT_PAM_SERVICE)]
    pub pam_service: String,

    /// Timeout for one password check, in seconds.
    #[arg(long, default_value_t = DEFAULT_LOGIN_TIMEOUT.as_secs())]
    pub login_timeout: u64,

    /// Token lifetime in seconds.
    #[arg(long, default_value_t = DEFAULT_TOKEN_LIFETIME_SECS)]
    pub token_lifetime: u64,

    /// Seconds before expiry during which a token may be refreshed.
    #[arg(long, default_value_t = DEFAULT_REFRESH_WINDOW_SECS)]
    pub refresh_window: u64,

    /// Backend serving configuration and actions.
    #[arg(long, value_enum, default_value_t = BackendKind::Memory)]
    pub backend: BackendKind,
}

impl Args {
    /// Convert command-line arguments to server configuration.
    pub fn into_config(self) -> ServerConfig {
        let tls = match (self.tls_cert, self.tls_key) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert,
                key,
                client_ca: self.client_ca,
            }),
            _ => None,
        };

        ServerConfig {
            listen_address: self.listen,
            tls,
            auth: self.client_auth,
            password_strategy: self.password_strategy,
            login_endpoint: self.login_endpoint,
            pam_service: self.pam_service,
            login_timeout: Duration::from_secs(self.login_timeout),
            token_settings: TokenSettings::new(
                Duration::from_secs(self.token_lifetime),
                Duration::from_secs(self.refresh_window),
            ),
            backend: self.backend,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.listen_address.to_string(), DEFAULT_LISTEN_ADDRESS);
        assert_eq!(config.auth.to_string(), "cert,jwt,password");
        assert_eq!(config.login_endpoint, DEFAULT_LOGIN_ENDPOINT);
        assert_eq!(config.token_settings, TokenSettings::default());
        assert!(!config.has_tls());
    }

    #[test]
    fn test_args_defaults_match_config() {
        let config = Args::parse_from(["mgmtgw-server"]).into_config();
        let default = ServerConfig::default();
        assert_eq!(config.listen_address, default.listen_address);
        assert_eq!(config.auth, default.auth);
        assert_eq!(config.password_strategy, PasswordStrategy::Remote);
        assert_eq!(config.pam_service, "login");
        assert_eq!(config.login_timeout, Duration::from_secs(10));
        assert_eq!(config.token_settings, default.token_settings);
        assert!(config.tls.is_none());
    }

    #[test]
    fn test_args_tls_and_schemes() {
        let config = Args::parse_from([
            "mgmtgw-server",
            "--listen",
            "127.0.0.1:9339",
            "--tls-cert",
            "server.crt",
            "--tls-key",
            "server.key",
            "--client-ca",
            "ca.crt",
            "--client-auth",
            "jwt,password",
            "--token-lifetime",
            "600",
        ])
        .into_config();

        let tls = config.tls.as_ref().unwrap();
        assert_eq!(tls.cert, PathBuf::from("server.crt"));
        assert_eq!(tls.client_ca, Some(PathBuf::from("ca.crt")));
        assert!(!config.auth.is_enabled(AuthScheme::ClientCert));
        assert_eq!(config.token_settings.lifetime, Duration::from_secs(600));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_tls_key_requires_cert() {
        assert!(Args::try_parse_from(["mgmtgw-server", "--tls-key", "server.key"]).is_err());
    }

    #[test]
    fn test_unknown_scheme_rejected() {
        assert!(Args::try_parse_from(["mgmtgw-server", "--client-auth", "kerberos"]).is_err());
    }

    #[test]
    fn test_cert_scheme_needs_ca_under_tls() {
        let config = ServerConfig::default().with_tls("server.crt", "server.key");
        assert!(matches!(config.validate(), Err(Error::Config(_))));
        assert!(config.with_client_ca("ca.crt").validate().is_ok());
    }

    #[test]
    fn test_window_must_be_shorter_than_lifetime() {
        let config = ServerConfig::default()
            .with_token_settings(TokenSettings::new(Duration::from_secs(10), Duration::from_secs(10)));
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validator_follows_scheme_and_strategy() {
        let config = ServerConfig::default().with_auth("jwt".parse().unwrap());
        assert!(matches!(
            config.credential_validator().unwrap(),
            CredentialValidator::None
        ));

        let config = ServerConfig::default().with_login_endpoint("10.0.0.1:22");
        #[cfg(feature = "ssh-login")]
        assert_eq!(config.credential_validator().unwrap().name(), "remote-login");
        #[cfg(not(feature = "ssh-login"))]
        assert!(config.credential_validator().is_err());

        let local = ServerConfig::default().with_password_strategy(PasswordStrategy::Local);
        #[cfg(feature = "pam")]
        assert_eq!(local.credential_validator().unwrap().name(), "pam");
        #[cfg(not(feature = "pam"))]
        assert!(local.validate().is_err());
    }
}
