//! Password validation through an SSH login handshake.

use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use ssh2::Session;

use super::credential::{PasswordVerifier, DEFAULT_LOGIN_ENDPOINT, DEFAULT_LOGIN_TIMEOUT};
use super::error::AuthError;

/// Verifies passwords by authenticating against an SSH daemon.
///
/// The session is closed as soon as the daemon accepts the password.
#[derive(Debug, Clone)]
pub struct RemoteLogin {
    endpoint: String,
    timeout: Duration,
}

impl RemoteLogin {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: DEFAULT_LOGIN_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn connect(&self) -> Result<TcpStream, String> {
        let addr = self
            .endpoint
            .to_socket_addrs()
            .map_err(|e| format!("cannot resolve {}: {}", self.endpoint, e))?
            .next()
            .ok_or_else(|| format!("{} resolved to no address", self.endpoint))?;

        let stream = TcpStream::connect_timeout(&addr, self.timeout)
            .map_err(|e| format!("cannot connect to {}: {}", addr, e))?;
        stream
            .set_read_timeout(Some(self.timeout))
            .and_then(|_| stream.set_write_timeout(Some(self.timeout)))
            .map_err(|e| format!("cannot configure socket: {}", e))?;
        Ok(stream)
    }

    fn login(&self, username: &str, password: &str) -> Result<(), String> {
        let stream = self.connect()?;

        let mut session = Session::new().map_err(|e| format!("ssh session: {}", e))?;
        session.set_timeout(u32::try_from(self.timeout.as_millis()).unwrap_or(u32::MAX));
        session.set_tcp_stream(stream);
        session
            .handshake()
            .map_err(|e| format!("ssh handshake: {}", e))?;
        session
            .userauth_password(username, password)
            .map_err(|e| format!("ssh auth: {}", e))?;
        if !session.authenticated() {
            return Err("ssh daemon did not authenticate the session".to_string());
        }

        let _ = session.disconnect(None, "login verified", None);
        Ok(())
    }
}

impl Default for RemoteLogin {
    fn default() -> Self {
        Self::new(DEFAULT_LOGIN_ENDPOINT)
    }
}

impl PasswordVerifier for RemoteLogin {
    fn verify(&self, username: &str, password: &str) -> Result<(), AuthError> {
        self.login(username, password).map_err(|reason| {
            tracing::info!(
                user = %username,
                endpoint = %self.endpoint,
                %reason,
                "remote login failed"
            );
            AuthError::credentials(username, reason)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::net::TcpListener;

    #[test]
    fn test_closed_port_is_rejected() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let login = RemoteLogin::new(format!("127.0.0.1:{}", port))
            .with_timeout(Duration::from_secs(2));

        assert!(matches!(
            login.verify("admin", "admin"),
            Err(AuthError::InvalidCredentials { .. })
        ));
    }

    #[test]
    fn test_non_ssh_peer_is_rejected() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let _ = stream.write_all(b"HTTP/1.1 400 Bad Request\r\n\r\n");
            }
        });

        let login = RemoteLogin::new(addr.to_string()).with_timeout(Duration::from_secs(2));
        assert!(login.verify("admin", "admin").is_err());
        server.join().unwrap();
    }

    #[test]
    fn test_unresolvable_endpoint() {
        let login = RemoteLogin::new("not an address");
        assert!(login.verify("admin", "admin").is_err());
    }
}
