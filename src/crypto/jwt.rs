//! Bearer JWT generation
//!
//! Bearer tokens prove possession of an API key. A token is either bound to a
//! single REST call (the `uris` claim holds `"<METHOD> <HOST><PATH>"`) or, when
//! no request details are given, usable for a persistent connection.

use super::keys::{self, PrivateKeyHandle};
use crate::types::constants::{DEFAULT_EXPIRES_IN, JWT_ISSUER};
use crate::{AuthError, Result};
use base64::{engine::general_purpose, Engine as _};
use jsonwebtoken::Algorithm;
use rand::RngCore;
use serde::Serialize;

/// Nonce length in bytes before hex encoding
const NONCE_LEN: usize = 16;

/// Audience claim: a single value or a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Audience {
    One(String),
    Many(Vec<String>),
}

impl From<&str> for Audience {
    fn from(value: &str) -> Self {
        Audience::One(value.to_string())
    }
}

impl From<String> for Audience {
    fn from(value: String) -> Self {
        Audience::One(value)
    }
}

impl From<Vec<String>> for Audience {
    fn from(values: Vec<String>) -> Self {
        Audience::Many(values)
    }
}

/// JWT options for authentication
#[derive(Clone)]
pub struct JwtOptions {
    /// API key id, used as `kid` and `sub`
    pub key_id: String,
    /// Raw API key secret (PEM EC key or base64 Ed25519 key)
    pub key_secret: String,
    /// HTTP method of the request the token is bound to
    pub request_method: Option<String>,
    /// Host of the request the token is bound to
    pub request_host: Option<String>,
    /// Path of the request the token is bound to
    pub request_path: Option<String>,
    /// Optional `aud` claim
    pub audience: Option<Audience>,
    /// Token lifetime in seconds; `None` or zero means [`DEFAULT_EXPIRES_IN`]
    pub expires_in: Option<u64>,
}

impl std::fmt::Debug for JwtOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtOptions")
            .field("key_id", &self.key_id)
            .field("key_secret", &"<redacted>")
            .field("request_method", &self.request_method)
            .field("request_host", &self.request_host)
            .field("request_path", &self.request_path)
            .field("audience", &self.audience)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

impl JwtOptions {
    /// Start building options for the given key pair
    pub fn builder(key_id: impl Into<String>, key_secret: impl Into<String>) -> JwtOptionsBuilder {
        JwtOptionsBuilder {
            options: JwtOptions {
                key_id: key_id.into(),
                key_secret: key_secret.into(),
                request_method: None,
                request_host: None,
                request_path: None,
                audience: None,
                expires_in: None,
            },
        }
    }

    /// Lifetime actually applied to the token
    pub fn effective_expires_in(&self) -> u64 {
        match self.expires_in {
            Some(seconds) if seconds > 0 => seconds,
            _ => DEFAULT_EXPIRES_IN,
        }
    }

    /// Whether the token is bound to a single REST call
    pub fn is_rest_request(&self) -> bool {
        self.request_parts().is_some()
    }

    /// The `uris` claim entry, for REST-bound tokens
    pub fn uri(&self) -> Option<String> {
        self.request_parts()
            .map(|(method, host, path)| format!("{} {}{}", method, host, path))
    }

    /// Validate required fields and the all-or-none rule for request details
    pub fn validate(&self) -> Result<()> {
        if self.key_id.trim().is_empty() {
            return Err(AuthError::validation("keyId", "is required"));
        }

        if self.key_secret.trim().is_empty() {
            return Err(AuthError::validation("keySecret", "is required"));
        }

        let request = [
            ("requestMethod", &self.request_method),
            ("requestHost", &self.request_host),
            ("requestPath", &self.request_path),
        ];
        let provided = request.iter().filter(|(_, value)| value.is_some()).count();

        if provided != 0 && provided != request.len() {
            return Err(AuthError::validation(
                "request",
                "either all request details (method, host, path) must be provided, \
                 or none for connection-bound tokens",
            ));
        }

        // Supplied details must be non-blank
        for (field, value) in request {
            if value.is_some() && present(value).is_none() {
                return Err(AuthError::validation(field, "is required"));
            }
        }

        if i64::try_from(self.effective_expires_in()).is_err() {
            return Err(AuthError::validation("expiresIn", "is out of range"));
        }

        Ok(())
    }

    fn request_parts(&self) -> Option<(&str, &str, &str)> {
        match (
            present(&self.request_method),
            present(&self.request_host),
            present(&self.request_path),
        ) {
            (Some(method), Some(host), Some(path)) => Some((method, host, path)),
            _ => None,
        }
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.trim().is_empty())
}

/// Builder for [`JwtOptions`]
#[derive(Debug, Clone)]
pub struct JwtOptionsBuilder {
    options: JwtOptions,
}

impl JwtOptionsBuilder {
    /// Set the HTTP request method
    pub fn request_method(mut self, method: impl Into<String>) -> Self {
        self.options.request_method = Some(method.into());
        self
    }

    /// Set the request host
    pub fn request_host(mut self, host: impl Into<String>) -> Self {
        self.options.request_host = Some(host.into());
        self
    }

    /// Set the request path
    pub fn request_path(mut self, path: impl Into<String>) -> Self {
        self.options.request_path = Some(path.into());
        self
    }

    /// Set the token lifetime in seconds
    pub fn expires_in(mut self, seconds: u64) -> Self {
        self.options.expires_in = Some(seconds);
        self
    }

    /// Set the audience claim
    pub fn audience(mut self, audience: impl Into<Audience>) -> Self {
        self.options.audience = Some(audience.into());
        self
    }

    /// Validate and build the options
    pub fn build(self) -> Result<JwtOptions> {
        self.options.validate()?;
        Ok(self.options)
    }
}

#[derive(Debug, Serialize)]
struct BearerHeader<'a> {
    alg: Algorithm,
    kid: &'a str,
    typ: &'static str,
    nonce: String,
}

#[derive(Debug, Serialize)]
struct BearerClaims<'a> {
    sub: &'a str,
    iss: &'static str,
    iat: i64,
    nbf: i64,
    exp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    aud: Option<&'a Audience>,
    #[serde(skip_serializing_if = "Option::is_none")]
    uris: Option<Vec<String>>,
}

/// Generate a bearer JWT for API authentication
pub fn generate_jwt(options: &JwtOptions) -> Result<String> {
    options.validate()?;

    let key = keys::parse_api_key(&options.key_secret)
        .map_err(|e| e.into_generation("Failed to generate JWT"))?;
    let algorithm = keys::classify(&key);

    let now = chrono::Utc::now().timestamp();
    let expires_in = i64::try_from(options.effective_expires_in())
        .map_err(|e| AuthError::jwt_generation_with("Token lifetime out of range", e))?;

    let header = BearerHeader {
        alg: algorithm.jwt_algorithm(),
        kid: &options.key_id,
        typ: "JWT",
        nonce: generate_nonce(),
    };

    let uris = options.uri().map(|uri| vec![uri]);
    let rest_bound = uris.is_some();

    let claims = BearerClaims {
        sub: &options.key_id,
        iss: JWT_ISSUER,
        iat: now,
        nbf: now,
        exp: now.saturating_add(expires_in),
        aud: options.audience.as_ref(),
        uris,
    };

    let token = sign_compact(&header, &claims, &key, algorithm.jwt_algorithm())
        .map_err(|e| e.into_generation("Failed to generate JWT"))?;

    tracing::debug!(
        kid = %options.key_id,
        alg = algorithm.as_str(),
        rest_bound,
        expires_in,
        "generated bearer token"
    );

    Ok(token)
}

/// Create an authorization header value (`Bearer <token>`)
pub fn create_auth_header(options: &JwtOptions) -> Result<String> {
    let token = generate_jwt(options)?;
    Ok(format!("Bearer {}", token))
}

/// Generate a random 16-byte nonce, hex encoded
pub fn generate_nonce() -> String {
    let mut bytes = [0u8; NONCE_LEN];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Serialize header and claims, sign the signing input, and join the three segments
pub(crate) fn sign_compact<H, C>(
    header: &H,
    claims: &C,
    key: &PrivateKeyHandle,
    algorithm: Algorithm,
) -> Result<String>
where
    H: Serialize,
    C: Serialize,
{
    let message = format!("{}.{}", encode_segment(header)?, encode_segment(claims)?);

    let encoding_key = key.encoding_key()?;
    let signature = jsonwebtoken::crypto::sign(message.as_bytes(), &encoding_key, algorithm)
        .map_err(|e| AuthError::jwt_generation_with(format!("Failed to sign token: {}", e), e))?;

    Ok(format!("{}.{}", message, signature))
}

fn encode_segment<T: Serialize>(value: &T) -> Result<String> {
    let json = serde_json::to_vec(value)
        .map_err(|e| AuthError::jwt_generation_with("Failed to serialize token segment", e))?;
    Ok(general_purpose::URL_SAFE_NO_PAD.encode(json))
}
