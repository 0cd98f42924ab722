//! Encryption layer for Keeper.
//!
//! Every secret is protected with envelope encryption:
//!
//! 1. **Data Key**: a random 256-bit key generated for each `encrypt` call.
//!    The secret's plaintext is sealed with ChaCha20-Poly1305 under this key,
//!    with the random nonce prepended to the ciphertext.
//!
//! 2. **Wrapped Key**: the data key encrypted with the owner's RSA public key
//!    (OAEP, SHA-256, fixed label). Only the holder of the private key can
//!    unwrap it.
//!
//! The ciphertext and the wrapped key always travel together as an
//! [`EncryptedPayload`]. Synchronization moves that pair between stores
//! without touching the plaintext.

mod cipher;
mod cryptor;
mod error;
pub mod keys;

pub use cipher::{DataKey, KEY_SIZE, NONCE_SIZE, TAG_SIZE, open, seal};
pub use cryptor::{Cryptor, CryptorBuilder, DEFAULT_LABEL, EncryptedPayload};
pub use error::{CryptoError, CryptoResult};
pub use keys::{DEFAULT_KEY_BITS, generate_keypair};

pub use rsa::{RsaPrivateKey, RsaPublicKey};
