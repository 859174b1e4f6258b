//! Which authentication schemes are enabled.

use std::fmt;
use std::str::FromStr;

/// An authentication scheme.
///
/// Declaration order is evaluation priority: a client certificate wins over
/// a token, a token over a password.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AuthScheme {
    /// Verified TLS client certificate.
    ClientCert,
    /// Bearer token in call metadata.
    Token,
    /// Username/password login.
    Password,
}

impl AuthScheme {
    /// Name used on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthScheme::ClientCert => "cert",
            AuthScheme::Token => "jwt",
            AuthScheme::Password => "password",
        }
    }
}

impl fmt::Display for AuthScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "cert" | "client-cert" => Ok(AuthScheme::ClientCert),
            "jwt" | "token" => Ok(AuthScheme::Token),
            "password" => Ok(AuthScheme::Password),
            other => Err(format!("unknown authentication scheme '{}'", other)),
        }
    }
}

/// The enabled schemes, kept in priority order. Read-only after startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthConfig {
    schemes: Vec<AuthScheme>,
}

impl AuthConfig {
    /// Enable the given schemes; order and duplicates are normalized.
    pub fn new(schemes: impl IntoIterator<Item = AuthScheme>) -> Self {
        let mut schemes: Vec<AuthScheme> = schemes.into_iter().collect();
        schemes.sort();
        schemes.dedup();
        Self { schemes }
    }

    /// A configuration with every scheme disabled.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self, scheme: AuthScheme) -> bool {
        self.schemes.contains(&scheme)
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }

    /// Enabled schemes in evaluation order.
    pub fn schemes(&self) -> &[AuthScheme] {
        &self.schemes
    }
}

/// Parses a comma-separated list such as `password,jwt,cert`.
impl FromStr for AuthConfig {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let schemes = s
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(AuthScheme::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(schemes))
    }
}

impl fmt::Display for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.schemes.iter().map(AuthScheme::as_str).collect();
        f.write_str(&names.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_order() {
        let config: AuthConfig = "password,jwt,cert".parse().unwrap();
        assert_eq!(
            config.schemes(),
            &[AuthScheme::ClientCert, AuthScheme::Token, AuthScheme::Password]
        );
        assert_eq!(config.to_string(), "cert,jwt,password");
    }

    #[test]
    fn test_duplicates_and_blanks() {
        let config: AuthConfig = "jwt, jwt,,token".parse().unwrap();
        assert_eq!(config.schemes(), &[AuthScheme::Token]);
        assert!(!config.is_enabled(AuthScheme::Password));
    }

    #[test]
    fn test_empty_list_disables_everything() {
        let config: AuthConfig = "".parse().unwrap();
        assert!(config.is_empty());
        assert_eq!(config, AuthConfig::none());
    }

    #[test]
    fn test_unknown_scheme() {
        assert!("jwt,kerberos".parse::<AuthConfig>().is_err());
    }
}
