//! Credential configuration
//!
//! Credentials can be given explicitly or read from the environment:
//!
//! | Variable | Meaning |
//! |---|---|
//! | `CDP_API_KEY_ID` | API key id |
//! | `CDP_API_KEY_SECRET` | API key secret (PEM EC key or base64 Ed25519 key) |
//! | `CDP_WALLET_SECRET` | Wallet secret, optional |
//!
//! Blank variables are treated as unset.

use crate::generator::TokenGenerator;
use crate::types::constants::{env_vars, DEFAULT_EXPIRES_IN};
use crate::{AuthError, Result};
use std::env;

/// Configuration for a [`TokenGenerator`]
#[derive(Clone)]
pub struct TokenGeneratorConfig {
    /// API key id
    pub api_key_id: String,
    /// API key secret
    pub api_key_secret: String,
    /// Wallet secret, needed only for wallet auth tokens
    pub wallet_secret: Option<String>,
    /// Bearer token lifetime in seconds
    pub expires_in: u64,
}

impl std::fmt::Debug for TokenGeneratorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenGeneratorConfig")
            .field("api_key_id", &self.api_key_id)
            .field("api_key_secret", &"<redacted>")
            .field(
                "wallet_secret",
                &self.wallet_secret.as_ref().map(|_| "<redacted>"),
            )
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

impl TokenGeneratorConfig {
    /// Create a new config
    pub fn new(api_key_id: impl Into<String>, api_key_secret: impl Into<String>) -> Self {
        Self {
            api_key_id: api_key_id.into(),
            api_key_secret: api_key_secret.into(),
            wallet_secret: None,
            expires_in: DEFAULT_EXPIRES_IN,
        }
    }

    /// Load the config from environment variables
    pub fn from_env() -> Result<Self> {
        let api_key_id = read_env(env_vars::API_KEY_ID);
        let api_key_secret = read_env(env_vars::API_KEY_SECRET);

        let (api_key_id, api_key_secret) = match (api_key_id, api_key_secret) {
            (Some(id), Some(secret)) => (id, secret),
            _ => {
                return Err(AuthError::validation(
                    "apiKey",
                    format!(
                        "missing credentials: {} and {} must be set",
                        env_vars::API_KEY_ID,
                        env_vars::API_KEY_SECRET
                    ),
                ))
            }
        };

        let mut config = Self::new(api_key_id, api_key_secret);
        config.wallet_secret = read_env(env_vars::WALLET_SECRET);

        tracing::debug!(
            api_key_id = %config.api_key_id,
            wallet_secret = config.wallet_secret.is_some(),
            "loaded credentials from environment"
        );

        Ok(config)
    }

    /// Set the wallet secret
    pub fn with_wallet_secret(mut self, wallet_secret: impl Into<String>) -> Self {
        self.wallet_secret = Some(wallet_secret.into());
        self
    }

    /// Set the bearer token lifetime; zero means the default
    pub fn with_expires_in(mut self, seconds: u64) -> Self {
        self.expires_in = if seconds == 0 {
            DEFAULT_EXPIRES_IN
        } else {
            seconds
        };
        self
    }

    /// Validate the config
    pub fn validate(&self) -> Result<()> {
        if self.api_key_id.trim().is_empty() {
            return Err(AuthError::validation("apiKeyId", "is required"));
        }

        if self.api_key_secret.trim().is_empty() {
            return Err(AuthError::validation("apiKeySecret", "is required"));
        }

        if i64::try_from(self.expires_in).is_err() {
            return Err(AuthError::validation("expiresIn", "is out of range"));
        }

        Ok(())
    }

    /// Build a token generator from this config
    pub fn build(self) -> Result<TokenGenerator> {
        self.validate()?;
        let expires_in = i64::try_from(self.expires_in)
            .map_err(|_| AuthError::validation("expiresIn", "is out of range"))?;

        TokenGenerator::with_expires_in(
            self.api_key_id,
            self.api_key_secret,
            self.wallet_secret,
            expires_in,
        )
    }
}

fn read_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}
