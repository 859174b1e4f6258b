//! gRPC transport.
//!
//! Serves the system, vendor, login and configuration services on one
//! listener, optionally over TLS. Client certificates the handshake verified
//! are copied into each request's extensions as [`PeerCertificates`] before
//! the handler runs.

use std::future::Future;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::server::Router;
use tonic::transport::{Certificate, Server, ServerTlsConfig};
use tonic::{Request, Status};

use mgmtgw_proto::gnmi::gnmi_server::GnmiServer;
use mgmtgw_proto::jwt::jwt_service_server::JwtServiceServer;
use mgmtgw_proto::sonic::sonic_service_server::SonicServiceServer;
use mgmtgw_proto::system::system_server::SystemServer;

use crate::auth::PeerCertificates;
use crate::config::{ServerConfig, TlsPaths};
use crate::error::Error;
use crate::service::ServiceContext;

/// Transport metrics for monitoring.
#[derive(Debug)]
pub struct TransportMetrics {
    /// Total number of requests received.
    requests_total: AtomicU64,
    /// Requests that arrived with a verified client certificate.
    requests_with_certificate: AtomicU64,
    started_at: Instant,
}

impl TransportMetrics {
    fn new() -> Self {
        Self {
            requests_total: AtomicU64::new(0),
            requests_with_certificate: AtomicU64::new(0),
            started_at: Instant::now(),
        }
    }

    fn record_request(&self, with_certificate: bool) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
        if with_certificate {
            self.requests_with_certificate.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Get the uptime duration.
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Get total requests count.
    pub fn total_requests(&self) -> u64 {
        self.requests_total.load(Ordering::Relaxed)
    }

    /// Get the count of requests carrying a client certificate.
    pub fn certificate_requests(&self) -> u64 {
        self.requests_with_certificate.load(Ordering::Relaxed)
    }
}

impl Default for TransportMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Copy the verified peer certificate chain into the request extensions.
///
/// Nothing is inserted for plaintext connections or when the client
/// presented no certificate.
pub fn lift_peer_certificates(mut request: Request<()>) -> Result<Request<()>, Status> {
    if let Some(certs) = request.peer_certs() {
        let chain: Vec<Vec<u8>> = certs
            .iter()
            .map(|c| {
                let der: &[u8] = c.as_ref();
                der.to_vec()
            })
            .collect();
        if !chain.is_empty() {
            request.extensions_mut().insert(PeerCertificates::new(chain));
        }
    }
    Ok(request)
}

fn read_pem(path: &Path) -> Result<Vec<u8>, Error> {
    std::fs::read(path).map_err(|source| Error::Tls {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the server identity and, when configured, the client CA.
///
/// Client certificates are requested but optional, so token and password
/// callers can still connect.
pub fn load_tls(paths: &TlsPaths) -> Result<ServerTlsConfig, Error> {
    let identity = tonic::transport::Identity::from_pem(read_pem(&paths.cert)?, read_pem(&paths.key)?);
    let mut tls = ServerTlsConfig::new().identity(identity);
    if let Some(ca) = &paths.client_ca {
        tls = tls
            .client_ca_root(Certificate::from_pem(read_pem(ca)?))
            .client_auth_optional(true);
    }
    Ok(tls)
}

/// Server transport that handles incoming connections.
pub struct Transport {
    listen_address: SocketAddr,
    tls: Option<ServerTlsConfig>,
    context: ServiceContext,
    metrics: Arc<TransportMetrics>,
}

impl Transport {
    /// Create a transport; TLS files are read here.
    pub fn new(config: &ServerConfig, context: ServiceContext) -> Result<Self, Error> {
        let tls = config.tls.as_ref().map(load_tls).transpose()?;
        Ok(Self {
            listen_address: config.listen_address,
            tls,
            context,
            metrics: Arc::new(TransportMetrics::new()),
        })
    }

    pub fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Get a reference to the transport metrics.
    pub fn metrics(&self) -> &TransportMetrics {
        &self.metrics
    }

    fn router(&self) -> Result<Router, Error> {
        let mut builder = Server::builder();
        if let Some(tls) = &self.tls {
            builder = builder.tls_config(tls.clone())?;
        }

        let metrics = Arc::clone(&self.metrics);
        let intercept = move |request: Request<()>| -> Result<Request<()>, Status> {
            let request = lift_peer_certificates(request)?;
            metrics.record_request(request.extensions().get::<PeerCertificates>().is_some());
            Ok(request)
        };

        let (system, sonic, jwt, gnmi) = self.context.handlers();
        Ok(builder
            .add_service(SystemServer::with_interceptor(system, intercept.clone()))
            .add_service(SonicServiceServer::with_interceptor(sonic, intercept.clone()))
            .add_service(JwtServiceServer::with_interceptor(jwt, intercept.clone()))
            .add_service(GnmiServer::with_interceptor(gnmi, intercept)))
    }

    /// Serve on the configured address until `shutdown` fires.
    pub async fn run_until_shutdown(
        &self,
        mut shutdown: tokio::sync::broadcast::Receiver<()>,
    ) -> Result<(), Error> {
        let router = self.router()?;
        tracing::info!(
            address = %self.listen_address,
            tls = self.tls.is_some(),
            "transport ready, accepting requests"
        );

        let metrics = Arc::clone(&self.metrics);
        router
            .serve_with_shutdown(self.listen_address, async move {
                let _ = shutdown.recv().await;
                tracing::info!(
                    total_requests = metrics.total_requests(),
                    certificate_requests = metrics.certificate_requests(),
                    uptime_secs = metrics.uptime().as_secs(),
                    "shutdown signal received, stopping transport"
                );
            })
            .await?;
        Ok(())
    }

    /// Serve on an already-bound listener until `shutdown` completes.
    pub async fn serve_with_listener<F>(&self, listener: TcpListener, shutdown: F) -> Result<(), Error>
    where
        F: Future<Output = ()>,
    {
        let router = self.router()?;
        if let Ok(address) = listener.local_addr() {
            tracing::info!(address = %address, tls = self.tls.is_some(), "transport ready, accepting requests");
        }
        router
            .serve_with_incoming_shutdown(TcpListenerStream::new(listener), shutdown)
            .await?;
        Ok(())
    }
}

/// Build the service context and transport described by `config`.
pub fn create_transport(config: &ServerConfig) -> Result<Transport, Error> {
    let context = ServiceContext::from_config(config)?;
    Transport::new(config, context)
}
