//! Authenticated identities and the per-call credential view.

use std::fmt;
use std::sync::Arc;

use mgmtgw_proto::ACCESS_TOKEN_KEY;

/// How a caller was authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    ClientCert,
    Token,
    Password,
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AuthMethod::ClientCert => "cert",
            AuthMethod::Token => "jwt",
            AuthMethod::Password => "password",
        })
    }
}

/// An authenticated caller.
///
/// Roles are the caller's OS group names, captured at authentication time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    pub roles: Vec<String>,
    pub method: AuthMethod,
}

impl Identity {
    pub fn new(username: impl Into<String>, roles: Vec<String>, method: AuthMethod) -> Self {
        Self {
            username: username.into(),
            roles,
            method,
        }
    }
}

/// DER-encoded certificates the peer presented during the TLS handshake,
/// leaf first.
///
/// The transport stores this in the request extensions; it is only present
/// when the handshake verified the chain against the configured client CA.
#[derive(Debug, Clone, Default)]
pub struct PeerCertificates(Arc<Vec<Vec<u8>>>);

impl PeerCertificates {
    pub fn new(chain: Vec<Vec<u8>>) -> Self {
        Self(Arc::new(chain))
    }

    /// The end-entity certificate.
    pub fn leaf(&self) -> Option<&[u8]> {
        self.0.first().map(Vec::as_slice)
    }
}

/// Credentials attached to one inbound call.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    peer_certificates: Option<PeerCertificates>,
    access_token: Option<String>,
}

impl CallContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the credentials carried by a request.
    pub fn from_request<T>(request: &tonic::Request<T>) -> Self {
        let access_token = request
            .metadata()
            .get(ACCESS_TOKEN_KEY)
            .and_then(|value| value.to_str().ok())
            .filter(|token| !token.is_empty())
            .map(str::to_owned);

        Self {
            peer_certificates: request.extensions().get::<PeerCertificates>().cloned(),
            access_token,
        }
    }

    pub fn with_peer_certificates(mut self, certs: PeerCertificates) -> Self {
        self.peer_certificates = Some(certs);
        self
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// The verified client certificate, if any.
    pub fn client_certificate(&self) -> Option<&[u8]> {
        self.peer_certificates.as_ref().and_then(PeerCertificates::leaf)
    }

    /// The bearer token from call metadata, if any.
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_request_reads_metadata_and_extensions() {
        let mut request = tonic::Request::new(());
        request
            .metadata_mut()
            .insert(ACCESS_TOKEN_KEY, "abc.def.ghi".parse().unwrap());
        request
            .extensions_mut()
            .insert(PeerCertificates::new(vec![vec![1, 2, 3], vec![4]]));

        let ctx = CallContext::from_request(&request);
        assert_eq!(ctx.access_token(), Some("abc.def.ghi"));
        assert_eq!(ctx.client_certificate(), Some(&[1u8, 2, 3][..]));
    }

    #[test]
    fn test_empty_request_has_no_credentials() {
        let mut request = tonic::Request::new(());
        request.metadata_mut().insert(ACCESS_TOKEN_KEY, "".parse().unwrap());

        let ctx = CallContext::from_request(&request);
        assert!(ctx.access_token().is_none());
        assert!(ctx.client_certificate().is_none());
    }
}
