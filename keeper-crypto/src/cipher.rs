//! Symmetric half of the envelope: ChaCha20-Poly1305 with a prepended nonce.

use crate::error::{CryptoError, CryptoResult};
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Size of a data key in bytes (256 bits).
pub const KEY_SIZE: usize = 32;

/// Size of the ChaCha20-Poly1305 nonce in bytes.
pub const NONCE_SIZE: usize = 12;

/// Size of the Poly1305 authentication tag in bytes.
pub const TAG_SIZE: usize = 16;

/// A per-secret symmetric key. Wiped from memory on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DataKey([u8; KEY_SIZE]);

impl DataKey {
    /// Generates a fresh key from the OS random source.
    pub fn generate() -> CryptoResult<Self> {
        let mut bytes = [0u8; KEY_SIZE];
        rand::rngs::OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| CryptoError::Random(e.to_string()))?;
        Ok(Self(bytes))
    }

    /// Rebuilds a key from unwrapped bytes.
    pub fn from_slice(bytes: &[u8]) -> CryptoResult<Self> {
        let array: [u8; KEY_SIZE] =
            bytes
                .try_into()
                .map_err(|_| CryptoError::InvalidKeyLength {
                    expected: KEY_SIZE,
                    actual: bytes.len(),
                })?;
        Ok(Self(array))
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl std::fmt::Debug for DataKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DataKey(..)")
    }
}

/// Encrypts `plaintext` under `key`, returning `nonce || ciphertext || tag`.
pub fn seal(key: &DataKey, plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
    let mut nonce = [0u8; NONCE_SIZE];
    rand::rngs::OsRng
        .try_fill_bytes(&mut nonce)
        .map_err(|e| CryptoError::Random(e.to_string()))?;

    let cipher = ChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));
    let sealed = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|e| CryptoError::Encryption(e.to_string()))?;

    let mut out = Vec::with_capacity(NONCE_SIZE + sealed.len());
    out.extend_from_slice(&nonce);
    out.extend_from_slice(&sealed);
    Ok(out)
}

/// Splits the nonce off `data` and authenticates/decrypts the rest.
pub fn open(key: &DataKey, data: &[u8]) -> CryptoResult<Vec<u8>> {
    if data.len() < NONCE_SIZE {
        return Err(CryptoError::CiphertextTooShort {
            actual: data.len(),
            min: NONCE_SIZE,
        });
    }
    let (nonce, sealed) = data.split_at(NONCE_SIZE);

    let cipher = ChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));
    cipher
        .decrypt(Nonce::from_slice(nonce), sealed)
        .map_err(|_| CryptoError::Integrity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seal_open_roundtrip() {
        let key = DataKey::generate().unwrap();
        let sealed = seal(&key, b"card 4111").unwrap();
        assert_eq!(sealed.len(), NONCE_SIZE + 9 + TAG_SIZE);
        assert_eq!(open(&key, &sealed).unwrap(), b"card 4111");
    }

    #[test]
    fn nonce_is_fresh_per_call() {
        let key = DataKey::generate().unwrap();
        let a = seal(&key, b"same").unwrap();
        let b = seal(&key, b"same").unwrap();
        assert_ne!(a[..NONCE_SIZE], b[..NONCE_SIZE]);
    }

    #[test]
    fn short_input_rejected_before_decrypt() {
        let key = DataKey::generate().unwrap();
        let err = open(&key, &[0u8; NONCE_SIZE - 1]).unwrap_err();
        assert!(matches!(
            err,
            CryptoError::CiphertextTooShort { actual: 11, min: 12 }
        ));
    }

    #[test]
    fn nonce_only_fails_integrity() {
        let key = DataKey::generate().unwrap();
        assert!(matches!(
            open(&key, &[0u8; NONCE_SIZE]),
            Err(CryptoError::Integrity)
        ));
    }

    #[test]
    fn data_key_length_checked() {
        let err = DataKey::from_slice(&[1u8; 16]).unwrap_err();
        assert!(matches!(
            err,
            CryptoError::InvalidKeyLength { expected: 32, actual: 16 }
        ));
    }
}
