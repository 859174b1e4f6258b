//! mgmtgw client API.
//!
//! This module provides the main `Client` struct for talking to a gateway.

use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use tonic::metadata::AsciiMetadataValue;
use tonic::service::interceptor::InterceptedService;
use tonic::service::Interceptor;
use tonic::transport::{Certificate, Channel, ClientTlsConfig, Endpoint, Identity};
use tonic::{Request, Status};

use mgmtgw_proto::gnmi::gnmi_client::GnmiClient;
use mgmtgw_proto::gnmi::{CapabilityRequest, CapabilityResponse};
use mgmtgw_proto::jwt::jwt_service_client::JwtServiceClient;
use mgmtgw_proto::jwt::{AuthenticateRequest, RefreshRequest};
use mgmtgw_proto::sonic::sonic_service_client::SonicServiceClient;
use mgmtgw_proto::sonic::{SumInput, SumRequest};
use mgmtgw_proto::system::system_client::SystemClient;
use mgmtgw_proto::system::TimeRequest;
use mgmtgw_proto::{GetRequest, GetResponse, JwtToken, Path as GnmiPath, SetRequest, SetResponse, ACCESS_TOKEN_KEY};

use crate::config::{ClientConfig, TlsOptions};
use crate::error::Error;

type SharedToken = Arc<RwLock<Option<AsciiMetadataValue>>>;

/// Attaches the current bearer token to every outgoing call.
#[derive(Clone, Default)]
pub struct TokenInterceptor {
    token: SharedToken,
}

impl Interceptor for TokenInterceptor {
    fn call(&mut self, mut request: Request<()>) -> Result<Request<()>, Status> {
        if let Some(token) = self.token.read().clone() {
            request.metadata_mut().insert(ACCESS_TOKEN_KEY, token);
        }
        Ok(request)
    }
}

/// Channel wrapped with the token interceptor.
pub type AuthChannel = InterceptedService<Channel, TokenInterceptor>;

fn read_pem(path: &Path) -> Result<Vec<u8>, Error> {
    std::fs::read(path).map_err(|source| Error::Tls {
        path: path.to_path_buf(),
        source,
    })
}

fn tls_config(options: &TlsOptions) -> Result<ClientTlsConfig, Error> {
    let mut tls = ClientTlsConfig::new();
    if let Some(ca) = &options.ca {
        tls = tls.ca_certificate(Certificate::from_pem(read_pem(ca)?));
    }
    if let Some((cert, key)) = &options.identity {
        tls = tls.identity(Identity::from_pem(read_pem(cert)?, read_pem(key)?));
    }
    if let Some(domain) = &options.domain {
        tls = tls.domain_name(domain.clone());
    }
    Ok(tls)
}

/// A client for the gateway's services.
///
/// All service stubs share one channel and one token; a successful
/// [`Client::authenticate`] or [`Client::refresh`] replaces the token for
/// every later call.
///
/// # Example
///
/// ```ignore
/// use mgmtgw_client::{Client, ClientConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = Client::connect(ClientConfig::localhost()).await?;
///     client.authenticate("admin", "password").await?;
///
///     let nanos = client.time().await?;
///     println!("device time: {}", nanos);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Client {
    channel: Channel,
    token: SharedToken,
}

impl Client {
    /// Connect to a gateway.
    pub async fn connect(config: ClientConfig) -> Result<Self, Error> {
        let uri = config.uri();
        let mut endpoint = Endpoint::from_shared(uri.clone())
            .map_err(|_| Error::InvalidAddress(uri.clone()))?
            .timeout(config.timeout)
            .connect_timeout(config.timeout);
        if let Some(tls) = &config.tls {
            endpoint = endpoint.tls_config(tls_config(tls)?)?;
        }

        let channel = endpoint.connect().await?;
        tracing::debug!(uri = %uri, tls = config.tls.is_some(), "connected");

        let client = Self::from_channel(channel);
        if let Some(token) = &config.access_token {
            client.set_token(token)?;
        }
        Ok(client)
    }

    /// Connect to a gateway at the given address.
    pub async fn connect_to(address: impl Into<String>) -> Result<Self, Error> {
        Self::connect(ClientConfig::new(address)).await
    }

    /// Wrap an existing channel.
    pub fn from_channel(channel: Channel) -> Self {
        Self {
            channel,
            token: SharedToken::default(),
        }
    }

    /// Use `token` for subsequent calls.
    pub fn set_token(&self, token: &str) -> Result<(), Error> {
        let value = token.parse().map_err(|_| Error::InvalidToken)?;
        *self.token.write() = Some(value);
        Ok(())
    }

    /// Stop sending a token.
    pub fn clear_token(&self) {
        *self.token.write() = None;
    }

    /// Check if a token is attached to calls.
    pub fn has_token(&self) -> bool {
        self.token.read().is_some()
    }

    fn interceptor(&self) -> TokenInterceptor {
        TokenInterceptor {
            token: Arc::clone(&self.token),
        }
    }

    /// `gnoi.system.System` stub.
    pub fn system(&self) -> SystemClient<AuthChannel> {
        SystemClient::with_interceptor(self.channel.clone(), self.interceptor())
    }

    /// `gnoi.sonic.SonicService` stub.
    pub fn sonic(&self) -> SonicServiceClient<AuthChannel> {
        SonicServiceClient::with_interceptor(self.channel.clone(), self.interceptor())
    }

    /// `gnoi.jwt.JwtService` stub.
    pub fn jwt(&self) -> JwtServiceClient<AuthChannel> {
        JwtServiceClient::with_interceptor(self.channel.clone(), self.interceptor())
    }

    /// `gnmi.Gnmi` stub.
    pub fn gnmi(&self) -> GnmiClient<AuthChannel> {
        GnmiClient::with_interceptor(self.channel.clone(), self.interceptor())
    }

    fn keep_token(&self, token: Option<JwtToken>) -> Result<JwtToken, Error> {
        let token = token.ok_or_else(|| Error::UnexpectedResponse("no token in response".to_string()))?;
        self.set_token(&token.access_token)?;
        Ok(token)
    }

    /// Log in with a password and use the issued token from now on.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<JwtToken, Error> {
        let response = self
            .jwt()
            .authenticate(AuthenticateRequest::new(username, password))
            .await?
            .into_inner();
        self.keep_token(response.token)
    }

    /// Exchange the current token for a fresh one.
    pub async fn refresh(&self) -> Result<JwtToken, Error> {
        let response = self.jwt().refresh(RefreshRequest {}).await?.into_inner();
        self.keep_token(response.token)
    }

    /// Device time in nanoseconds since the Unix epoch.
    pub async fn time(&self) -> Result<u64, Error> {
        Ok(self.system().time(TimeRequest {}).await?.into_inner().time)
    }

    /// Add two numbers on the device; a liveness check for the action path.
    pub async fn sum(&self, left: i32, right: i32) -> Result<i32, Error> {
        let request = SumRequest {
            input: SumInput { left, right },
        };
        Ok(self.sonic().sum(request).await?.into_inner().output.result)
    }

    pub async fn capabilities(&self) -> Result<CapabilityResponse, Error> {
        Ok(self
            .gnmi()
            .capabilities(CapabilityRequest::default())
            .await?
            .into_inner())
    }

    /// Read the given paths.
    pub async fn get(&self, paths: Vec<GnmiPath>) -> Result<GetResponse, Error> {
        let request = GetRequest {
            path: paths,
            ..Default::default()
        };
        Ok(self.gnmi().get(request).await?.into_inner())
    }

    /// Apply a configuration change.
    pub async fn set(&self, request: SetRequest) -> Result<SetResponse, Error> {
        Ok(self.gnmi().set(request).await?.into_inner())
    }
}
