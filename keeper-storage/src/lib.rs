//! SQLite storage layer for Keeper.
//!
//! Secrets are stored exactly as they arrive: ciphertext and wrapped key
//! side by side in one row, keyed by `(name, secret_type, owner)`. The
//! store never sees plaintext and never needs a key.

mod error;
mod schema;
mod secret_store;

pub use error::{StorageError, StorageResult};
pub use secret_store::SecretStore;
