//! CLI configuration file.

use anyhow::{Context, Result};
use keeper_cloud::RemoteConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default name of the config file, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "keeper.json";

pub const PUBLIC_KEY_FILE: &str = "keeper.pub.pem";
pub const PRIVATE_KEY_FILE: &str = "keeper.key.pem";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeeperConfig {
    /// Local SQLite database.
    pub database_path: PathBuf,
    /// PEM-encoded RSA public key used to encrypt new secrets.
    pub public_key_path: PathBuf,
    /// PEM-encoded RSA private key used to decrypt.
    pub private_key_path: PathBuf,
    pub remote: RemoteConfig,
    /// OAEP label bound into every wrapped key.
    pub key_label: String,
}

impl Default for KeeperConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("keeper.db"),
            public_key_path: PathBuf::from(PUBLIC_KEY_FILE),
            private_key_path: PathBuf::from(PRIVATE_KEY_FILE),
            remote: RemoteConfig::default(),
            key_label: keeper_crypto::DEFAULT_LABEL.to_string(),
        }
    }
}

impl KeeperConfig {
    /// Reads the config file; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }
}
