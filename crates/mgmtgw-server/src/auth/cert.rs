//! Identity from TLS client certificates.

use sha2::{Digest, Sha256};
use x509_parser::prelude::*;

use super::error::AuthError;

/// Extract the subject common name of a DER-encoded certificate.
pub fn common_name(der: &[u8]) -> Result<String, AuthError> {
    let (_, cert) = parse_x509_certificate(der)
        .map_err(|e| AuthError::Certificate(format!("unparsable certificate: {}", e)))?;

    let cn = cert
        .subject()
        .iter_common_name()
        .next()
        .ok_or_else(|| AuthError::Certificate("subject has no common name".to_string()))?
        .as_str()
        .map_err(|e| AuthError::Certificate(format!("common name is not a string: {}", e)))?;

    if cn.is_empty() {
        return Err(AuthError::Certificate("empty common name".to_string()));
    }
    Ok(cn.to_string())
}

/// SHA-256 fingerprint, hex encoded, for logs.
pub fn fingerprint(der: &[u8]) -> String {
    hex::encode(Sha256::digest(der))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rcgen::{CertificateParams, DistinguishedName, DnType, KeyPair};

    fn certificate(cn: Option<&str>) -> Vec<u8> {
        let mut params = CertificateParams::new(vec!["localhost".to_string()]).unwrap();
        params.distinguished_name = DistinguishedName::new();
        if let Some(cn) = cn {
            params.distinguished_name.push(DnType::CommonName, cn);
        }
        let key = KeyPair::generate().unwrap();
        params.self_signed(&key).unwrap().der().to_vec()
    }

    #[test]
    fn test_common_name() {
        assert_eq!(common_name(&certificate(Some("admin"))).unwrap(), "admin");
    }

    #[test]
    fn test_missing_common_name() {
        assert!(matches!(
            common_name(&certificate(None)),
            Err(AuthError::Certificate(_))
        ));
    }

    #[test]
    fn test_garbage() {
        assert!(common_name(b"not a certificate").is_err());
    }

    #[test]
    fn test_fingerprint() {
        let fp = fingerprint(b"abc");
        assert_eq!(fp.len(), 64);
        assert!(fp.starts_with("ba7816bf"));
    }
}
