//! Crypto error types.

use thiserror::Error;

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors that can occur while encrypting or decrypting a secret.
///
/// None of these are transient: a corrupted ciphertext or a wrong key
/// produces the same failure on every attempt.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("no public key configured")]
    MissingPublicKey,

    #[error("no private key configured")]
    MissingPrivateKey,

    #[error("public key does not belong to the configured private key")]
    KeyMismatch,

    #[error("random source failed: {0}")]
    Random(String),

    #[error("key wrap failed: {0}")]
    Wrap(String),

    #[error("key unwrap failed (wrong key or corrupted data)")]
    Unwrap,

    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("ciphertext too short: {actual} bytes, need at least {min}")]
    CiphertextTooShort { actual: usize, min: usize },

    #[error("encryption failed: {0}")]
    Encryption(String),

    #[error("integrity check failed (tampered or corrupted ciphertext)")]
    Integrity,

    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    #[error("invalid key encoding: {0}")]
    KeyEncoding(String),
}
