//! # CDP auth token generation
//!
//! Mints the short-lived JWTs that authenticate calls to the Coinbase
//! Developer Platform (CDP) APIs.
//!
//! ## Features
//!
//! - **Bearer tokens**: ES256 or EdDSA, picked from the API key type, optionally bound to a single REST call
//! - **Wallet auth tokens**: ES256 tokens that bind the request body through a SHA-256 `reqHash` claim
//! - **Flexible key input**: SEC1 and PKCS#8 PEM EC keys, base64 Ed25519 keypairs, single-line env values
//! - **Environment config**: `CDP_API_KEY_ID`, `CDP_API_KEY_SECRET`, `CDP_WALLET_SECRET`
//! - **Thread safe**: generators hold no mutable state and can be shared freely
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cdp_auth::{TokenGeneratorConfig, TokenProvider, TokenRequest};
//! use serde_json::json;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let generator = TokenGeneratorConfig::from_env()?.build()?;
//!
//!     // Bearer token only
//!     let tokens = generator.generate_tokens(&TokenRequest::new("GET", "/platform/v2/evm/accounts"))?;
//!     println!("Authorization: Bearer {}", tokens.bearer_token);
//!
//!     // Account-mutating call: bearer plus wallet auth token
//!     let request = TokenRequest::new("POST", "/platform/v2/evm/accounts")
//!         .with_wallet_token()
//!         .with_request_body(json!({"name": "my-account"}));
//!     let tokens = generator.generate_tokens(&request)?;
//!     for (name, value) in tokens.auth_headers() {
//!         println!("{}: {}", name, value);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **`generator`**: The [`TokenGenerator`] façade
//! - **`config`**: Explicit and environment-based credential configuration
//! - **`crypto`**: Key parsing, bearer and wallet JWT generation, request body hashing
//! - **`types`**: Token requests and responses, constants
//! - **`error`**: Error handling

pub mod config;
pub mod crypto;
pub mod error;
pub mod generator;
pub mod types;

// Re-exports for convenience
pub use config::TokenGeneratorConfig;
pub use crypto::jwt::{generate_jwt, JwtOptions};
pub use crypto::keys::{parse_api_key, parse_wallet_key, KeyAlgorithm, PrivateKeyHandle};
pub use crypto::wallet::{generate_wallet_jwt, WalletJwtOptions};
pub use error::{AuthError, Result};
pub use generator::TokenGenerator;
pub use types::*;

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
