//! Connection flags shared by the drivers.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Args;

use mgmtgw_client::{Client, ClientConfig, TlsOptions};

/// Where and how to reach the gateway.
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Gateway address as host:port
    #[arg(long, default_value = "localhost:8080")]
    pub target: String,

    /// Name to verify the server certificate against
    #[arg(long)]
    pub target_name: Option<String>,

    /// CA certificate that signed the server certificate (PEM)
    #[arg(long, conflicts_with = "insecure")]
    pub ca: Option<PathBuf>,

    /// Client certificate for certificate authentication (PEM)
    #[arg(long, requires = "key", conflicts_with = "insecure")]
    pub cert: Option<PathBuf>,

    /// Private key for --cert (PEM)
    #[arg(long, requires = "cert")]
    pub key: Option<PathBuf>,

    /// Connect in plaintext
    #[arg(long)]
    pub insecure: bool,

    /// Bearer token to attach to the call
    #[arg(long)]
    pub jwt_token: Option<String>,
}

impl TargetArgs {
    /// Client configuration for these flags.
    pub fn client_config(&self, timeout: Duration) -> ClientConfig {
        let mut config = ClientConfig::new(self.target.clone()).with_timeout(timeout);

        if !self.insecure {
            let mut tls = TlsOptions::new();
            if let Some(ca) = &self.ca {
                tls = tls.with_ca(ca);
            }
            if let (Some(cert), Some(key)) = (&self.cert, &self.key) {
                tls = tls.with_identity(cert, key);
            }
            if let Some(name) = &self.target_name {
                tls = tls.with_domain(name);
            }
            config = config.with_tls(tls);
        }

        if let Some(token) = self.jwt_token.as_deref().filter(|t| !t.is_empty()) {
            config = config.with_access_token(token);
        }
        config
    }

    /// Connect to the gateway.
    pub async fn connect(&self, timeout: Duration) -> anyhow::Result<Client> {
        let config = self.client_config(timeout);
        Client::connect(config)
            .await
            .with_context(|| format!("cannot connect to {}", self.target))
    }
}

/// Parse a duration like `10s`, `500ms`, `2m` or a bare number of seconds.
pub fn parse_duration(input: &str) -> anyhow::Result<Duration> {
    let input = input.trim();
    let split = input
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(input.len());
    let (digits, unit) = input.split_at(split);
    if digits.is_empty() {
        bail!("invalid duration {:?}", input);
    }
    let amount: u64 = digits
        .parse()
        .with_context(|| format!("invalid duration {:?}", input))?;

    let secs = |scale: u64| match amount.checked_mul(scale) {
        Some(secs) => Ok(Duration::from_secs(secs)),
        None => bail!("duration {:?} is too large", input),
    };
    match unit {
        "" | "s" => Ok(Duration::from_secs(amount)),
        "ms" => Ok(Duration::from_millis(amount)),
        "m" => secs(60),
        "h" => secs(3600),
        other => bail!("unknown duration unit {:?}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Cli {
        #[command(flatten)]
        target: TargetArgs,
    }

    fn parse(args: &[&str]) -> TargetArgs {
        Cli::try_parse_from(std::iter::once("test").chain(args.iter().copied()))
            .unwrap()
            .target
    }

    #[test]
    fn test_durations() {
        assert_eq!(parse_duration("10s").unwrap(), Duration::from_secs(10));
        assert_eq!(parse_duration("10").unwrap(), Duration::from_secs(10));
        assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
        assert_eq!(parse_duration("2m").unwrap(), Duration::from_secs(120));
        assert!(parse_duration("s").is_err());
        assert!(parse_duration("5 days").is_err());
    }

    #[test]
    fn test_duration_overflow_is_an_error() {
        let huge = format!("{}h", u64::MAX / 100);
        assert!(parse_duration(&huge).is_err());
        assert!(parse_duration(&format!("{}m", u64::MAX)).is_err());
        assert_eq!(parse_duration(&format!("{}s", u64::MAX)).unwrap().as_secs(), u64::MAX);
    }

    #[test]
    fn test_insecure_is_plaintext() {
        let config = parse(&["--target", "10.0.0.1:8080", "--insecure", "--jwt-token", "abc"])
            .client_config(Duration::from_secs(5));
        assert!(config.tls.is_none());
        assert_eq!(config.uri(), "http://10.0.0.1:8080");
        assert_eq!(config.access_token.as_deref(), Some("abc"));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_tls_flags() {
        let config = parse(&[
            "--ca", "ca.crt", "--cert", "me.crt", "--key", "me.key", "--target-name", "switch1",
        ])
        .client_config(Duration::from_secs(10));

        let tls = config.tls.unwrap();
        assert_eq!(tls.ca, Some(PathBuf::from("ca.crt")));
        assert_eq!(
            tls.identity,
            Some((PathBuf::from("me.crt"), PathBuf::from("me.key")))
        );
        assert_eq!(tls.domain.as_deref(), Some("switch1"));
        assert!(config.access_token.is_none());
    }

    #[test]
    fn test_cert_needs_key() {
        let result = Cli::try_parse_from(["test", "--cert", "me.crt"]);
        assert!(result.is_err());
        let result = Cli::try_parse_from(["test", "--insecure", "--ca", "ca.crt"]);
        assert!(result.is_err());
    }
}
