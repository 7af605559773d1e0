//! Error types for token generation
//!
//! Every failure surfaced by this crate is an [`AuthError`]. The variants are
//! deliberately coarse so callers can tell *what to fix*:
//!
//! - [`AuthError::KeyParse`] - the credential text itself is unusable
//! - [`AuthError::JwtGeneration`] - a token could not be built or signed
//! - [`AuthError::WalletSecret`] - a wallet token was requested without a wallet secret
//! - [`AuthError::Validation`] - a required option was blank or inconsistent

use thiserror::Error;

/// Boxed low-level cause carried by [`AuthError`] variants
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias for token generation
pub type Result<T> = std::result::Result<T, AuthError>;

/// Main error type for the token generation subsystem
#[derive(Error, Debug)]
pub enum AuthError {
    /// Credential is blank, not valid base64/PEM, the wrong length, or an unsupported key shape
    #[error("{message}")]
    KeyParse {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Key could not be used to produce a token
    #[error("{message}")]
    JwtGeneration {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Wallet token requested without a configured wallet secret
    #[error("{message}")]
    WalletSecret { message: String },

    /// Required option missing or inconsistent
    #[error("Validation error for '{field}': {message}")]
    Validation { field: &'static str, message: String },
}

impl AuthError {
    /// Create a key parse error without an underlying cause
    pub fn key_parse(message: impl Into<String>) -> Self {
        Self::KeyParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create a key parse error wrapping the decoder's error
    pub fn key_parse_with<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::KeyParse {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a JWT generation error wrapping a lower-level error
    pub fn jwt_generation_with<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::JwtGeneration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a wallet secret error
    pub fn wallet_secret(message: impl Into<String>) -> Self {
        Self::WalletSecret {
            message: message.into(),
        }
    }

    /// Create a validation error for the named field
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Wrap an error raised while minting a token.
    ///
    /// Generation errors pass through untouched; anything else (most often a
    /// [`AuthError::KeyParse`]) becomes the source of a new generation error.
    pub(crate) fn into_generation(self, context: &str) -> Self {
        match self {
            Self::JwtGeneration { .. } => self,
            other => Self::jwt_generation_with(format!("{}: {}", context, other), other),
        }
    }

    /// Check if the credential text could not be parsed
    pub fn is_key_parse(&self) -> bool {
        matches!(self, Self::KeyParse { .. })
    }

    /// Check if token construction or signing failed
    pub fn is_jwt_generation(&self) -> bool {
        matches!(self, Self::JwtGeneration { .. })
    }

    /// Check if a wallet secret was missing
    pub fn is_wallet_secret(&self) -> bool {
        matches!(self, Self::WalletSecret { .. })
    }

    /// Check if options failed validation
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Name of the offending field for validation errors
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}
