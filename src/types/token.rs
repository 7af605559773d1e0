//! Token request and response types

use super::constants::{headers, DEFAULT_HOST};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A request for the tokens needed to authenticate one API call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequest {
    /// HTTP method, e.g. `POST`
    pub request_method: String,
    /// Host; blank means [`DEFAULT_HOST`]
    #[serde(default)]
    pub request_host: String,
    /// Request path, e.g. `/platform/v2/evm/accounts`
    pub request_path: String,
    /// Whether a wallet auth token must be minted as well
    #[serde(default)]
    pub include_wallet_token: bool,
    /// Request body; must be a JSON object when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<Value>,
}

impl TokenRequest {
    /// Create a request for the given method and path against the default host
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            request_method: method.into(),
            request_host: DEFAULT_HOST.to_string(),
            request_path: path.into(),
            include_wallet_token: false,
            request_body: None,
        }
    }

    /// Set the request host
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.request_host = host.into();
        self
    }

    /// Request a wallet auth token alongside the bearer token
    pub fn with_wallet_token(mut self) -> Self {
        self.include_wallet_token = true;
        self
    }

    /// Set the request body
    pub fn with_request_body(mut self, body: Value) -> Self {
        self.request_body = Some(body);
        self
    }

    /// Set the request body from any serializable payload
    pub fn try_with_request_body<T: Serialize>(mut self, body: &T) -> crate::Result<Self> {
        self.request_body = Some(crate::crypto::request_hash::to_body_value(body)?);
        Ok(self)
    }

    /// Host the tokens are bound to
    pub fn host(&self) -> &str {
        if self.request_host.trim().is_empty() {
            DEFAULT_HOST
        } else {
            &self.request_host
        }
    }

    /// Validate the token request
    pub fn validate(&self) -> crate::Result<()> {
        if self.request_method.trim().is_empty() {
            return Err(crate::AuthError::validation("requestMethod", "is required"));
        }

        if self.request_path.trim().is_empty() {
            return Err(crate::AuthError::validation("requestPath", "is required"));
        }

        Ok(())
    }
}

/// Tokens minted for one request
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    /// Bearer JWT for the `Authorization` header
    pub bearer_token: String,
    /// Wallet JWT for the `X-Wallet-Auth` header
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_auth_token: Option<String>,
}

impl std::fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResponse")
            .field("bearer_token", &"<token>")
            .field(
                "wallet_auth_token",
                &self.wallet_auth_token.as_ref().map(|_| "<token>"),
            )
            .finish()
    }
}

impl TokenResponse {
    /// Response carrying only a bearer token
    pub fn bearer_only(bearer_token: impl Into<String>) -> Self {
        Self {
            bearer_token: bearer_token.into(),
            wallet_auth_token: None,
        }
    }

    /// Attach a wallet auth token
    pub fn with_wallet_auth(mut self, wallet_auth_token: impl Into<String>) -> Self {
        self.wallet_auth_token = Some(wallet_auth_token.into());
        self
    }
}

/// Source of auth tokens for an HTTP transport
pub trait TokenProvider {
    /// Bearer JWT
    fn bearer_token(&self) -> &str;

    /// Wallet JWT, if one was minted
    fn wallet_auth_token(&self) -> Option<&str>;

    /// Headers to attach to the outgoing request
    fn auth_headers(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert(
            headers::AUTHORIZATION.to_string(),
            format!("Bearer {}", self.bearer_token()),
        );
        if let Some(token) = self.wallet_auth_token() {
            map.insert(headers::WALLET_AUTH.to_string(), token.to_string());
        }
        map
    }
}

impl TokenProvider for TokenResponse {
    fn bearer_token(&self) -> &str {
        &self.bearer_token
    }

    fn wallet_auth_token(&self) -> Option<&str> {
        self.wallet_auth_token.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_token_request_defaults() {
        let request = TokenRequest::new("GET", "/platform/v2/evm/accounts");
        assert_eq!(request.host(), DEFAULT_HOST);
        assert!(!request.include_wallet_token);
        assert!(request.request_body.is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_blank_host_falls_back_to_default() {
        let request = TokenRequest::new("GET", "/v1/things").with_host("  ");
        assert_eq!(request.host(), DEFAULT_HOST);

        let request = TokenRequest::new("GET", "/v1/things").with_host("api.example.com");
        assert_eq!(request.host(), "api.example.com");
    }

    #[test]
    fn test_token_request_validation() {
        let err = TokenRequest::new("", "/v1/things").validate().unwrap_err();
        assert_eq!(err.field(), Some("requestMethod"));

        let err = TokenRequest::new("GET", " ").validate().unwrap_err();
        assert_eq!(err.field(), Some("requestPath"));
    }

    #[test]
    fn test_try_with_request_body() {
        #[derive(Serialize)]
        struct CreateAccount {
            name: String,
        }

        let request = TokenRequest::new("POST", "/platform/v2/evm/accounts")
            .with_wallet_token()
            .try_with_request_body(&CreateAccount {
                name: "my-account".to_string(),
            })
            .unwrap();

        assert!(request.include_wallet_token);
        assert_eq!(request.request_body, Some(json!({"name": "my-account"})));
    }

    #[test]
    fn test_token_request_deserialization() {
        let request: TokenRequest = serde_json::from_value(json!({
            "requestMethod": "POST",
            "requestPath": "/platform/v2/evm/accounts",
            "includeWalletToken": true,
            "requestBody": {"name": "my-account"}
        }))
        .unwrap();

        assert_eq!(request.host(), DEFAULT_HOST);
        assert!(request.include_wallet_token);
    }

    #[test]
    fn test_auth_headers() {
        let response = TokenResponse::bearer_only("b.b.b");
        let map = response.auth_headers();
        assert_eq!(map.len(), 1);
        assert_eq!(map[headers::AUTHORIZATION], "Bearer b.b.b");

        let response = response.with_wallet_auth("w.w.w");
        let map = response.auth_headers();
        assert_eq!(map.len(), 2);
        assert_eq!(map[headers::WALLET_AUTH], "w.w.w");
    }

    #[test]
    fn test_token_response_serialization() {
        let json = serde_json::to_value(TokenResponse::bearer_only("b.b.b")).unwrap();
        assert_eq!(json, json!({"bearerToken": "b.b.b"}));
    }

    #[test]
    fn test_token_response_debug_hides_tokens() {
        let response = TokenResponse::bearer_only("secret.token.value").with_wallet_auth("w.w.w");
        let debug = format!("{:?}", response);
        assert!(!debug.contains("secret.token.value"));
        assert!(!debug.contains("w.w.w"));
    }
}
