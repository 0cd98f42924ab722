//! Hybrid encrypt/decrypt of secret payloads.
//!
//! A [`Cryptor`] is assembled once from named options and is immutable
//! afterwards. Depending on the role of the process it may carry only the
//! public key (can encrypt), only the private key (can decrypt; the public
//! half is derived), or both.

use crate::cipher::{self, DataKey};
use crate::error::{CryptoError, CryptoResult};
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

/// OAEP label used when no other label is configured.
pub const DEFAULT_LABEL: &str = "keeper-secret-key";

/// Ciphertext and wrapped data key produced by a single [`Cryptor::encrypt`].
///
/// The two halves are only meaningful together and are never stored split.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedPayload {
    /// `nonce || ChaCha20-Poly1305 ciphertext || tag`.
    pub ciphertext: Vec<u8>,
    /// Data key encrypted with RSA-OAEP(SHA-256).
    pub wrapped_key: Vec<u8>,
}

/// Envelope encryption with an RSA key pair.
#[derive(Clone)]
pub struct Cryptor {
    public_key: Option<RsaPublicKey>,
    private_key: Option<RsaPrivateKey>,
    label: String,
}

/// Named options for building a [`Cryptor`].
#[derive(Default)]
pub struct CryptorBuilder {
    public_key: Option<RsaPublicKey>,
    private_key: Option<RsaPrivateKey>,
    label: Option<String>,
}

impl CryptorBuilder {
    /// Key used to wrap data keys. Without it the cryptor cannot encrypt.
    pub fn public_key(mut self, key: RsaPublicKey) -> Self {
        self.public_key = Some(key);
        self
    }

    /// Key used to unwrap data keys. The public half is derived from it
    /// when no public key is set.
    pub fn private_key(mut self, key: RsaPrivateKey) -> Self {
        self.private_key = Some(key);
        self
    }

    /// Overrides the OAEP domain-separation label.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Validates the options and freezes them into a [`Cryptor`].
    ///
    /// At least one key is required. When both are given they must form a
    /// pair. A lone private key also enables encryption via its public half.
    pub fn build(self) -> CryptoResult<Cryptor> {
        let public_key = match (self.public_key, &self.private_key) {
            (Some(public), Some(private)) => {
                if public != private.to_public_key() {
                    return Err(CryptoError::KeyMismatch);
                }
                Some(public)
            }
            (Some(public), None) => Some(public),
            (None, Some(private)) => Some(private.to_public_key()),
            (None, None) => return Err(CryptoError::MissingPublicKey),
        };

        Ok(Cryptor {
            public_key,
            private_key: self.private_key,
            label: self.label.unwrap_or_else(|| DEFAULT_LABEL.to_string()),
        })
    }
}

impl Cryptor {
    /// Starts a cryptor with no keys and the default label.
    pub fn builder() -> CryptorBuilder {
        CryptorBuilder::default()
    }

    /// Whether a public key is available.
    pub fn can_encrypt(&self) -> bool {
        self.public_key.is_some()
    }

    /// Whether a private key is available.
    pub fn can_decrypt(&self) -> bool {
        self.private_key.is_some()
    }

    /// OAEP label bound into every wrapped key.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Encrypts `plaintext` under a fresh data key and wraps that key.
    pub fn encrypt(&self, plaintext: &[u8]) -> CryptoResult<EncryptedPayload> {
        let public_key = self
            .public_key
            .as_ref()
            .ok_or(CryptoError::MissingPublicKey)?;

        let data_key = DataKey::generate()?;
        let ciphertext = cipher::seal(&data_key, plaintext)?;

        let wrapped_key = public_key
            .encrypt(
                &mut rand::rngs::OsRng,
                Oaep::new_with_label::<Sha256, _>(&self.label),
                data_key.as_bytes(),
            )
            .map_err(|e| CryptoError::Wrap(e.to_string()))?;

        Ok(EncryptedPayload {
            ciphertext,
            wrapped_key,
        })
    }

    /// Unwraps the data key and authenticates/decrypts the ciphertext.
    pub fn decrypt(&self, ciphertext: &[u8], wrapped_key: &[u8]) -> CryptoResult<Vec<u8>> {
        let private_key = self
            .private_key
            .as_ref()
            .ok_or(CryptoError::MissingPrivateKey)?;

        let mut unwrapped = private_key
            .decrypt(Oaep::new_with_label::<Sha256, _>(&self.label), wrapped_key)
            .map_err(|_| CryptoError::Unwrap)?;
        let data_key = DataKey::from_slice(&unwrapped);
        zeroize::Zeroize::zeroize(&mut unwrapped);

        cipher::open(&data_key?, ciphertext)
    }

    /// Convenience wrapper over [`Cryptor::decrypt`] for a stored pair.
    pub fn decrypt_payload(&self, payload: &EncryptedPayload) -> CryptoResult<Vec<u8>> {
        self.decrypt(&payload.ciphertext, &payload.wrapped_key)
    }
}

impl std::fmt::Debug for Cryptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cryptor")
            .field("can_encrypt", &self.can_encrypt())
            .field("can_decrypt", &self.can_decrypt())
            .field("label", &self.label)
            .finish()
    }
}
