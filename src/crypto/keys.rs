//! Private key parsing
//!
//! API key secrets come in two shapes:
//! - PEM-armored EC (P-256) keys, SEC1 (`EC PRIVATE KEY`) or PKCS#8 (`PRIVATE KEY`)
//! - base64 64-byte Ed25519 keypairs (32-byte seed followed by the 32-byte public key)
//!
//! Wallet secrets are always base64 PKCS#8 DER EC keys.
//!
//! Credentials are often stored as single-line environment values, so literal
//! `\n` escape sequences are turned into real newlines before anything else.

use crate::{AuthError, Result};
use base64::{engine::general_purpose, Engine as _};
use jsonwebtoken::{Algorithm, EncodingKey};
use p256::pkcs8::{DecodePrivateKey, EncodePrivateKey, ObjectIdentifier, PrivateKeyInfo};
use zeroize::Zeroizing;

/// id-ecPublicKey (RFC 5480)
const EC_PUBLIC_KEY_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");

/// id-Ed25519 (RFC 8410)
const ED25519_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.101.112");

/// Minimal PKCS#8 v1 wrapping for an Ed25519 seed:
/// SEQUENCE { INTEGER 0, SEQUENCE { OID 1.3.101.112 }, OCTET STRING { OCTET STRING (32) } }
const ED25519_PKCS8_PREFIX: [u8; 16] = [
    0x30, 0x2e, 0x02, 0x01, 0x00, 0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x70, 0x04, 0x22, 0x04, 0x20,
];

/// Compact Ed25519 keypair length (seed + public key)
const ED25519_KEYPAIR_LEN: usize = 64;

/// Ed25519 seed length
const ED25519_SEED_LEN: usize = 32;

/// Marker that switches parsing to the PEM path
const PEM_MARKER: &str = "-----BEGIN";

/// Signature family of a parsed key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAlgorithm {
    /// P-256 ECDSA, signed as ES256
    Ec,
    /// Ed25519, signed as EdDSA
    Ed25519,
}

impl KeyAlgorithm {
    /// JWS algorithm used for this key family
    pub fn jwt_algorithm(&self) -> Algorithm {
        match self {
            KeyAlgorithm::Ec => Algorithm::ES256,
            KeyAlgorithm::Ed25519 => Algorithm::EdDSA,
        }
    }

    /// Get the algorithm name as used in the JWT `alg` header
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyAlgorithm::Ec => "ES256",
            KeyAlgorithm::Ed25519 => "EdDSA",
        }
    }
}

/// P-256 private key
#[derive(Clone)]
pub struct EcKey {
    secret: p256::SecretKey,
}

impl EcKey {
    fn new(secret: p256::SecretKey) -> Self {
        Self { secret }
    }

    /// Public half of the key
    pub fn public_key(&self) -> p256::PublicKey {
        self.secret.public_key()
    }

    fn encoding_key(&self) -> Result<EncodingKey> {
        let der = self
            .secret
            .to_pkcs8_der()
            .map_err(|e| AuthError::jwt_generation_with("Failed to encode EC key as PKCS#8", e))?;
        Ok(EncodingKey::from_ec_der(der.as_bytes()))
    }
}

/// Ed25519 private key held as minimal PKCS#8 DER
#[derive(Clone)]
pub struct Ed25519Key {
    pkcs8: Zeroizing<Vec<u8>>,
}

impl Ed25519Key {
    /// Wrap a 32-byte seed in the fixed PKCS#8 prefix
    fn from_seed(seed: &[u8]) -> Result<Self> {
        if seed.len() != ED25519_SEED_LEN {
            return Err(AuthError::key_parse(format!(
                "Invalid Ed25519 seed length: expected {} bytes, got {}",
                ED25519_SEED_LEN,
                seed.len()
            )));
        }

        let mut pkcs8 = Zeroizing::new(Vec::with_capacity(ED25519_PKCS8_PREFIX.len() + seed.len()));
        pkcs8.extend_from_slice(&ED25519_PKCS8_PREFIX);
        pkcs8.extend_from_slice(seed);
        Ok(Self { pkcs8 })
    }

    /// PKCS#8 DER encoding of the key
    pub fn pkcs8_der(&self) -> &[u8] {
        &self.pkcs8
    }

    fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_ed_der(&self.pkcs8)
    }
}

/// Algorithm-tagged private key
#[derive(Clone)]
pub enum PrivateKeyHandle {
    /// P-256 key (ES256)
    Ec(EcKey),
    /// Ed25519 key (EdDSA)
    Ed25519(Ed25519Key),
}

impl std::fmt::Debug for PrivateKeyHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKeyHandle")
            .field("algorithm", &self.algorithm())
            .field("key", &"<redacted>")
            .finish()
    }
}

impl PrivateKeyHandle {
    /// Signature family of this key
    pub fn algorithm(&self) -> KeyAlgorithm {
        match self {
            PrivateKeyHandle::Ec(_) => KeyAlgorithm::Ec,
            PrivateKeyHandle::Ed25519(_) => KeyAlgorithm::Ed25519,
        }
    }

    /// Signing key in the form the JWS signer expects
    pub(crate) fn encoding_key(&self) -> Result<EncodingKey> {
        match self {
            PrivateKeyHandle::Ec(key) => key.encoding_key(),
            PrivateKeyHandle::Ed25519(key) => Ok(key.encoding_key()),
        }
    }
}

/// Classify a parsed key so the caller can pick a signature algorithm
pub fn classify(key: &PrivateKeyHandle) -> KeyAlgorithm {
    key.algorithm()
}

/// Parse an API key secret, auto-detecting PEM EC or base64 Ed25519
pub fn parse_api_key(secret: &str) -> Result<PrivateKeyHandle> {
    if secret.trim().is_empty() {
        return Err(AuthError::key_parse("Key data is required"));
    }

    let normalized = secret.replace("\\n", "\n");

    if normalized.contains(PEM_MARKER) {
        return parse_pem_key(&normalized);
    }

    parse_ed25519_key(normalized.trim())
}

/// Parse a wallet secret (base64 PKCS#8 DER EC key)
pub fn parse_wallet_key(secret: &str) -> Result<PrivateKeyHandle> {
    if secret.trim().is_empty() {
        return Err(AuthError::key_parse("Wallet secret is required"));
    }

    let der = Zeroizing::new(
        general_purpose::STANDARD
            .decode(secret.trim())
            .map_err(|e| AuthError::key_parse_with(format!("Failed to parse wallet key: {}", e), e))?,
    );

    let key = p256::SecretKey::from_pkcs8_der(&der)
        .map_err(|e| AuthError::key_parse_with(format!("Failed to parse wallet key: {}", e), e))?;

    Ok(PrivateKeyHandle::Ec(EcKey::new(key)))
}

fn parse_pem_key(pem_data: &str) -> Result<PrivateKeyHandle> {
    let blocks = pem::parse_many(pem_data)
        .map_err(|e| AuthError::key_parse_with(format!("Failed to parse PEM key: {}", e), e))?;

    // OpenSSL may emit the curve parameters ahead of the key itself
    let block = blocks
        .iter()
        .find(|block| block.tag() != "EC PARAMETERS")
        .ok_or_else(|| AuthError::key_parse("PEM data contains no private key"))?;

    match block.tag() {
        "EC PRIVATE KEY" => parse_sec1_der(block.contents()),
        "PRIVATE KEY" => parse_pkcs8_der(block.contents()),
        "ENCRYPTED PRIVATE KEY" => Err(AuthError::key_parse(
            "Encrypted PEM keys are not supported",
        )),
        tag => {
            tracing::warn!(tag, "unexpected PEM label, probing key structure");
            parse_pkcs8_der(block.contents())
                .or_else(|_| parse_sec1_der(block.contents()))
                .map_err(|_| AuthError::key_parse(format!("Unsupported PEM format: {}", tag)))
        }
    }
}

fn parse_sec1_der(der: &[u8]) -> Result<PrivateKeyHandle> {
    let key = p256::SecretKey::from_sec1_der(der)
        .map_err(|e| AuthError::key_parse_with(format!("Failed to parse EC private key: {}", e), e))?;
    Ok(PrivateKeyHandle::Ec(EcKey::new(key)))
}

fn parse_pkcs8_der(der: &[u8]) -> Result<PrivateKeyHandle> {
    let info = PrivateKeyInfo::try_from(der)
        .map_err(|e| AuthError::key_parse_with(format!("Failed to parse PKCS#8 key: {}", e), e))?;

    let oid = info.algorithm.oid;
    if oid == EC_PUBLIC_KEY_OID {
        let key = p256::SecretKey::from_pkcs8_der(der).map_err(|e| {
            AuthError::key_parse_with(format!("Failed to parse EC private key: {}", e), e)
        })?;
        Ok(PrivateKeyHandle::Ec(EcKey::new(key)))
    } else if oid == ED25519_OID {
        // CurvePrivateKey ::= OCTET STRING, nested inside the PKCS#8 privateKey field
        match info.private_key {
            [0x04, 0x20, seed @ ..] => Ok(PrivateKeyHandle::Ed25519(Ed25519Key::from_seed(seed)?)),
            _ => Err(AuthError::key_parse("Malformed Ed25519 PKCS#8 private key")),
        }
    } else {
        Err(AuthError::key_parse(format!(
            "Unsupported key algorithm: {}",
            oid
        )))
    }
}

fn parse_ed25519_key(base64_key: &str) -> Result<PrivateKeyHandle> {
    let decoded = Zeroizing::new(
        general_purpose::STANDARD
            .decode(base64_key)
            .map_err(|e| AuthError::key_parse_with(format!("Failed to parse Ed25519 key: {}", e), e))?,
    );

    if decoded.len() != ED25519_KEYPAIR_LEN {
        return Err(AuthError::key_parse(format!(
            "Invalid Ed25519 key length: expected {} bytes, got {}",
            ED25519_KEYPAIR_LEN,
            decoded.len()
        )));
    }

    // The trailing 32 bytes are the public key; the signer derives it from the seed
    let key = Ed25519Key::from_seed(&decoded[..ED25519_SEED_LEN])?;
    Ok(PrivateKeyHandle::Ed25519(key))
}
