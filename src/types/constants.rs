//! Common constants for token generation

/// Issuer claim carried by every bearer token
pub const JWT_ISSUER: &str = "cdp";

/// Default bearer token lifetime in seconds
pub const DEFAULT_EXPIRES_IN: u64 = 120;

/// Wallet token lifetime in seconds; minted once per request
pub const WALLET_JWT_EXPIRES_IN: u64 = 60;

/// Host used when a token request leaves it blank
pub const DEFAULT_HOST: &str = "api.cdp.coinbase.com";

/// Claim holding the request body digest in wallet tokens
pub const REQUEST_HASH_CLAIM: &str = "reqHash";

/// HTTP header names the transport attaches tokens under
pub mod headers {
    /// Bearer token header
    pub const AUTHORIZATION: &str = "Authorization";
    /// Wallet auth token header
    pub const WALLET_AUTH: &str = "X-Wallet-Auth";
}

/// Environment variables read by [`crate::config::TokenGeneratorConfig::from_env`]
pub mod env_vars {
    /// API key id
    pub const API_KEY_ID: &str = "CDP_API_KEY_ID";
    /// API key secret (PEM EC key or base64 Ed25519 key)
    pub const API_KEY_SECRET: &str = "CDP_API_KEY_SECRET";
    /// Wallet secret (base64 PKCS#8 DER EC key)
    pub const WALLET_SECRET: &str = "CDP_WALLET_SECRET";

    /// All variables consulted when loading configuration
    pub fn all() -> Vec<&'static str> {
        vec![API_KEY_ID, API_KEY_SECRET, WALLET_SECRET]
    }
}
