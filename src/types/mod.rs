//! Core types for CDP token generation
//!
//! # Architecture
//!
//! The types module is organized as follows:
//! - [`token`] - Token requests, minted token pairs, and the [`TokenProvider`] seam
//! - [`constants`] - Issuer, lifetimes, header names, and environment variable names
//!
//! # Examples
//!
//! ```
//! use cdp_auth::types::{TokenProvider, TokenRequest, TokenResponse};
//! use serde_json::json;
//!
//! let request = TokenRequest::new("POST", "/platform/v2/evm/accounts")
//!     .with_wallet_token()
//!     .with_request_body(json!({"name": "my-account"}));
//! assert_eq!(request.host(), "api.cdp.coinbase.com");
//!
//! let response = TokenResponse::bearer_only("eyJ...").with_wallet_auth("eyJ...");
//! let headers = response.auth_headers();
//! assert!(headers.contains_key("X-Wallet-Auth"));
//! ```

pub mod constants;
pub mod token;

// Re-export commonly used items
pub use constants::{env_vars, headers};
pub use token::{TokenProvider, TokenRequest, TokenResponse};
