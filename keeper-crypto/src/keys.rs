//! RSA key pair generation and PEM encoding.
//!
//! Public keys use SubjectPublicKeyInfo PEM, private keys PKCS#8 PEM.

use crate::error::{CryptoError, CryptoResult};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::{RsaPrivateKey, RsaPublicKey};
use zeroize::Zeroizing;

/// Modulus size used by `keeper keygen` when none is given.
pub const DEFAULT_KEY_BITS: usize = 2048;

/// Generates a new RSA key pair.
pub fn generate_keypair(bits: usize) -> CryptoResult<(RsaPrivateKey, RsaPublicKey)> {
    let private = RsaPrivateKey::new(&mut rand::rngs::OsRng, bits)
        .map_err(|e| CryptoError::KeyGeneration(e.to_string()))?;
    let public = private.to_public_key();
    Ok((private, public))
}

/// Parses a SubjectPublicKeyInfo PEM public key.
pub fn public_key_from_pem(pem: &str) -> CryptoResult<RsaPublicKey> {
    RsaPublicKey::from_public_key_pem(pem).map_err(|e| CryptoError::KeyEncoding(e.to_string()))
}

/// Parses a PKCS#8 PEM private key.
pub fn private_key_from_pem(pem: &str) -> CryptoResult<RsaPrivateKey> {
    RsaPrivateKey::from_pkcs8_pem(pem).map_err(|e| CryptoError::KeyEncoding(e.to_string()))
}

/// Encodes a public key as SubjectPublicKeyInfo PEM with LF line endings.
pub fn public_key_to_pem(key: &RsaPublicKey) -> CryptoResult<String> {
    key.to_public_key_pem(LineEnding::LF)
        .map_err(|e| CryptoError::KeyEncoding(e.to_string()))
}

/// The returned string is wiped when dropped.
pub fn private_key_to_pem(key: &RsaPrivateKey) -> CryptoResult<Zeroizing<String>> {
    key.to_pkcs8_pem(LineEnding::LF)
        .map_err(|e| CryptoError::KeyEncoding(e.to_string()))
}
