//! RS256 assertion for the OAuth2 JWT-bearer grant.

use crate::error::{PublishError, Result};
use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use ring::rand::SystemRandom;
use ring::signature::{RSA_PKCS1_SHA256, RsaKeyPair};
use serde::Serialize;

/// Lifetime of a signed assertion (the token endpoint caps it at one hour)
pub const ASSERTION_LIFETIME_SECS: i64 = 3600;

#[derive(Serialize)]
struct Header<'a> {
    alg: &'a str,
    typ: &'a str,
}

/// Claims of a service-account assertion
#[derive(Debug, Serialize)]
pub struct Claims<'a> {
    /// Service-account email
    pub iss: &'a str,
    /// Space-separated scopes
    pub scope: &'a str,
    /// Token endpoint
    pub aud: &'a str,
    /// Issued-at, unix seconds
    pub iat: i64,
    /// Expiry, unix seconds
    pub exp: i64,
}

impl<'a> Claims<'a> {
    /// Claims issued at `iat` and valid for [`ASSERTION_LIFETIME_SECS`]
    pub fn new(iss: &'a str, scope: &'a str, aud: &'a str, iat: i64) -> Self {
        Self {
            iss,
            scope,
            aud,
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        }
    }
}

/// Parse a PKCS#8 PEM private key into an RSA signing key
pub fn parse_private_key(pem: &str) -> Result<RsaKeyPair> {
    let body: String = pem
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("-----"))
        .collect();

    let der = STANDARD.decode(body).map_err(|e| PublishError::Auth {
        reason: format!("private key is not valid PEM: {}", e),
    })?;

    RsaKeyPair::from_pkcs8(&der).map_err(|e| PublishError::Auth {
        reason: format!("private key rejected: {}", e),
    })
}

/// Build and sign `header.claims.signature`
pub fn sign_assertion(key: &RsaKeyPair, claims: &Claims<'_>) -> Result<String> {
    let header = Header {
        alg: "RS256",
        typ: "JWT",
    };

    let signing_input = format!(
        "{}.{}",
        encode_segment(&header)?,
        encode_segment(claims)?
    );

    let mut signature = vec![0; key.public().modulus_len()];
    key.sign(
        &RSA_PKCS1_SHA256,
        &SystemRandom::new(),
        signing_input.as_bytes(),
        &mut signature,
    )
    .map_err(|_| PublishError::Auth {
        reason: "failed to sign assertion".to_string(),
    })?;

    Ok(format!(
        "{}.{}",
        signing_input,
        URL_SAFE_NO_PAD.encode(signature)
    ))
}

fn encode_segment<T: Serialize>(value: &T) -> Result<String> {
    let json = serde_json::to_vec(value).map_err(|e| PublishError::Auth {
        reason: format!("failed to encode assertion: {}", e),
    })?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}
