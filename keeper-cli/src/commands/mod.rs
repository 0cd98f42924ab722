//! Subcommand implementations.

pub mod add;
pub mod keygen;
pub mod list;
pub mod remove;
pub mod show;
pub mod sync;

use crate::config::KeeperConfig;
use anyhow::{Context, Result};
use keeper_crypto::{Cryptor, keys};
use keeper_storage::SecretStore;
use std::fs;

/// Opens (creating if needed) the local database.
fn open_store(config: &KeeperConfig) -> Result<SecretStore> {
    SecretStore::open(&config.database_path)
        .with_context(|| format!("failed to open {}", config.database_path.display()))
}

/// Encrypt-only cryptor from the configured public key.
fn encryptor(config: &KeeperConfig) -> Result<Cryptor> {
    let path = &config.public_key_path;
    let pem = fs::read_to_string(path)
        .with_context(|| format!("failed to read public key {}", path.display()))?;
    let key = keys::public_key_from_pem(&pem)
        .with_context(|| format!("invalid public key {}", path.display()))?;
    Ok(Cryptor::builder()
        .public_key(key)
        .label(config.key_label.clone())
        .build()?)
}

/// Full cryptor from the configured private key.
fn decryptor(config: &KeeperConfig) -> Result<Cryptor> {
    let path = &config.private_key_path;
    let pem = fs::read_to_string(path)
        .with_context(|| format!("failed to read private key {}", path.display()))?;
    let key = keys::private_key_from_pem(&pem)
        .with_context(|| format!("invalid private key {}", path.display()))?;
    Ok(Cryptor::builder()
        .private_key(key)
        .label(config.key_label.clone())
        .build()?)
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::config::{KeeperConfig, PRIVATE_KEY_FILE, PUBLIC_KEY_FILE};
    use std::path::Path;

    /// Config rooted in `dir` with a fresh 1024-bit key pair on disk.
    pub fn config_with_keys(dir: &Path) -> KeeperConfig {
        super::keygen::run(dir, 1024, false).unwrap();
        KeeperConfig {
            database_path: dir.join("keeper.db"),
            public_key_path: dir.join(PUBLIC_KEY_FILE),
            private_key_path: dir.join(PRIVATE_KEY_FILE),
            ..KeeperConfig::default()
        }
    }
}
