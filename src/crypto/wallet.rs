//! Wallet auth JWT generation
//!
//! Wallet tokens accompany account-mutating calls. Besides the request URI they
//! carry a digest of the request body (`reqHash`), so a token captured in
//! flight cannot be replayed against a different payload.

use super::jwt::sign_compact;
use super::keys;
use super::request_hash;
use crate::types::constants::WALLET_JWT_EXPIRES_IN;
use crate::{AuthError, Result};
use jsonwebtoken::Algorithm;
use serde::Serialize;
use serde_json::{Map, Value};

/// Wallet JWT options
#[derive(Clone)]
pub struct WalletJwtOptions {
    /// Base64 PKCS#8 DER EC key
    pub wallet_secret: String,
    pub request_method: String,
    pub request_host: String,
    pub request_path: String,
    /// Request body as a key-value mapping; key order is irrelevant
    pub request_data: Map<String, Value>,
}

impl std::fmt::Debug for WalletJwtOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletJwtOptions")
            .field("wallet_secret", &"<redacted>")
            .field("request_method", &self.request_method)
            .field("request_host", &self.request_host)
            .field("request_path", &self.request_path)
            .field("request_data", &self.request_data)
            .finish()
    }
}

impl WalletJwtOptions {
    /// Create validated wallet JWT options; an absent body becomes an empty mapping
    pub fn new(
        wallet_secret: impl Into<String>,
        request_method: impl Into<String>,
        request_host: impl Into<String>,
        request_path: impl Into<String>,
        request_data: Option<Map<String, Value>>,
    ) -> Result<Self> {
        let options = Self {
            wallet_secret: wallet_secret.into(),
            request_method: request_method.into(),
            request_host: request_host.into(),
            request_path: request_path.into(),
            request_data: request_data.unwrap_or_default(),
        };
        options.validate()?;
        Ok(options)
    }

    /// Validate that every non-body field is non-blank
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("walletSecret", &self.wallet_secret),
            ("requestMethod", &self.request_method),
            ("requestHost", &self.request_host),
            ("requestPath", &self.request_path),
        ];

        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(AuthError::validation(field, "is required"));
            }
        }

        Ok(())
    }

    /// Whether the body has at least one non-null value to bind
    pub fn has_request_data(&self) -> bool {
        request_hash::has_request_data(&self.request_data)
    }

    /// The `uris` claim entry
    pub fn uri(&self) -> String {
        format!(
            "{} {}{}",
            self.request_method, self.request_host, self.request_path
        )
    }
}

#[derive(Debug, Serialize)]
struct WalletHeader {
    alg: Algorithm,
    typ: &'static str,
}

#[derive(Debug, Serialize)]
struct WalletClaims {
    iat: i64,
    nbf: i64,
    exp: i64,
    jti: String,
    uris: Vec<String>,
    #[serde(rename = "reqHash", skip_serializing_if = "Option::is_none")]
    req_hash: Option<String>,
}

/// Generate a wallet auth JWT
pub fn generate_wallet_jwt(options: &WalletJwtOptions) -> Result<String> {
    options.validate()?;

    let key = keys::parse_wallet_key(&options.wallet_secret)
        .map_err(|e| e.into_generation("Failed to generate wallet JWT"))?;

    let req_hash = if options.has_request_data() {
        Some(request_hash::request_hash(&options.request_data)?)
    } else {
        None
    };

    let now = chrono::Utc::now().timestamp();
    let header = WalletHeader {
        alg: Algorithm::ES256,
        typ: "JWT",
    };
    let claims = WalletClaims {
        iat: now,
        nbf: now,
        exp: now + WALLET_JWT_EXPIRES_IN as i64,
        jti: uuid::Uuid::new_v4().to_string(),
        uris: vec![options.uri()],
        req_hash,
    };
    let body_bound = claims.req_hash.is_some();

    let token = sign_compact(&header, &claims, &key, Algorithm::ES256)
        .map_err(|e| e.into_generation("Failed to generate wallet JWT"))?;

    tracing::debug!(
        method = %options.request_method,
        path = %options.request_path,
        body_bound,
        "generated wallet auth token"
    );

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::test_keys;
    use crate::types::constants::REQUEST_HASH_CLAIM;
    use serde_json::json;

    fn body(value: Value) -> Option<Map<String, Value>> {
        match value {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    fn options(data: Option<Map<String, Value>>) -> WalletJwtOptions {
        WalletJwtOptions::new(
            test_keys::wallet_secret(),
            "POST",
            "api.cdp.coinbase.com",
            "/platform/v1/accounts",
            data,
        )
        .unwrap()
    }

    #[test]
    fn test_generates_signed_es256_token() {
        let token = generate_wallet_jwt(&options(body(json!({"name": "my-account"})))).unwrap();
        assert_eq!(token.split('.').count(), 3);

        let header = test_keys::header(&token);
        assert_eq!(header["alg"], "ES256");
        assert_eq!(header["typ"], "JWT");

        assert!(test_keys::verify_es256(&token, &test_keys::wallet_key()));
        assert!(!test_keys::verify_es256(&token, &test_keys::ec_secret()));
    }

    #[test]
    fn test_claims() {
        let token = generate_wallet_jwt(&options(None)).unwrap();
        let payload = test_keys::payload(&token);

        assert_eq!(
            payload["uris"],
            json!(["POST api.cdp.coinbase.com/platform/v1/accounts"])
        );
        assert!(payload["jti"].as_str().is_some());

        let iat = payload["iat"].as_i64().unwrap();
        assert_eq!(payload["nbf"].as_i64().unwrap(), iat);
        assert_eq!(
            payload["exp"].as_i64().unwrap() - iat,
            WALLET_JWT_EXPIRES_IN as i64
        );
    }

    #[test]
    fn test_req_hash_present_only_with_data() {
        let with_data = options(body(json!({"name": "my-account"})));
        let empty = options(body(json!({})));
        assert!(with_data.has_request_data());
        assert!(!empty.has_request_data());

        let token = generate_wallet_jwt(&with_data).unwrap();
        assert_eq!(
            test_keys::payload(&token)[REQUEST_HASH_CLAIM],
            request_hash::sha256_hex(r#"{"name":"my-account"}"#)
        );

        let token = generate_wallet_jwt(&empty).unwrap();
        assert!(test_keys::payload(&token).get(REQUEST_HASH_CLAIM).is_none());
    }

    #[test]
    fn test_all_null_body_is_not_hashed() {
        let options = options(body(json!({"name": null})));
        assert!(!options.has_request_data());

        let token = generate_wallet_jwt(&options).unwrap();
        assert!(test_keys::payload(&token).get(REQUEST_HASH_CLAIM).is_none());
    }

    #[test]
    fn test_hash_is_deterministic_and_body_sensitive() {
        let a1 = generate_wallet_jwt(&options(body(json!({"name": "a", "n": 1})))).unwrap();
        let a2 = generate_wallet_jwt(&options(body(json!({"n": 1, "name": "a"})))).unwrap();
        let b = generate_wallet_jwt(&options(body(json!({"name": "b", "n": 1})))).unwrap();

        let hash = |token: &str| test_keys::payload(token)[REQUEST_HASH_CLAIM].clone();
        assert_eq!(hash(&a1), hash(&a2));
        assert_ne!(hash(&a1), hash(&b));

        // jti differs even when the body is identical
        assert_ne!(test_keys::payload(&a1)["jti"], test_keys::payload(&a2)["jti"]);
    }

    #[test]
    fn test_rejects_blank_fields() {
        let secret = test_keys::wallet_secret();
        let cases = [
            ("", "POST", "h", "/p", "walletSecret"),
            (secret.as_str(), " ", "h", "/p", "requestMethod"),
            (secret.as_str(), "POST", "", "/p", "requestHost"),
            (secret.as_str(), "POST", "h", "", "requestPath"),
        ];

        for (secret, method, host, path, field) in cases {
            let err = WalletJwtOptions::new(secret, method, host, path, None).unwrap_err();
            assert_eq!(err.field(), Some(field));
        }
    }

    #[test]
    fn test_invalid_wallet_secret() {
        let options = WalletJwtOptions::new("bm90LWEta2V5", "POST", "h", "/p", None).unwrap();
        let err = generate_wallet_jwt(&options).unwrap_err();

        assert!(err.is_jwt_generation());
        let source = std::error::Error::source(&err).unwrap();
        assert!(source.downcast_ref::<AuthError>().unwrap().is_key_parse());
    }
}
