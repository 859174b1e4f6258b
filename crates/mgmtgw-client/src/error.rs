//! Client error types.

use std::path::PathBuf;

use thiserror::Error;

/// Client errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Connection failed.
    #[error("connection error: {0}")]
    Connection(#[from] tonic::transport::Error),

    /// The gateway address is not a valid URI.
    #[error("invalid address '{0}'")]
    InvalidAddress(String),

    /// TLS material could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Tls {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The token cannot be carried in call metadata.
    #[error("invalid access token")]
    InvalidToken,

    /// The gateway answered with an error status.
    #[error("{}: {}", .0.code(), .0.message())]
    Status(#[from] tonic::Status),

    /// The gateway answered without the expected content.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Protocol error.
    #[error("protocol error: {0}")]
    Protocol(#[from] mgmtgw_proto::Error),
}

impl Error {
    /// The gRPC status code, when the gateway returned one.
    pub fn code(&self) -> Option<tonic::Code> {
        match self {
            Error::Status(status) => Some(status.code()),
            _ => None,
        }
    }
}
