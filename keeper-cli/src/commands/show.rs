//! `keeper show`

use super::{decryptor, open_store};
use crate::config::KeeperConfig;
use crate::display;
use anyhow::{Context, Result, anyhow};
use keeper_types::{SecretContent, SecretIdentity};
use std::fs;
use std::path::Path;

/// Fetches and decrypts one local secret.
pub fn load(config: &KeeperConfig, identity: &SecretIdentity) -> Result<SecretContent> {
    let secret = open_store(config)?
        .get(identity)?
        .ok_or_else(|| anyhow!("no secret {identity}"))?;
    let plaintext = decryptor(config)?
        .decrypt_payload(secret.payload())
        .with_context(|| format!("failed to decrypt {identity}"))?;
    Ok(SecretContent::from_plaintext_as(&plaintext, identity.secret_type)?)
}

pub fn run(config: &KeeperConfig, identity: &SecretIdentity, out: Option<&Path>) -> Result<()> {
    let content = load(config, identity)?;
    match (&content, out) {
        (SecretContent::Binary(blob), Some(path)) => {
            fs::write(path, &blob.data)
                .with_context(|| format!("failed to write {}", path.display()))?;
            display::success(&format!("wrote {} bytes to {}", blob.data.len(), path.display()));
        }
        (_, Some(_)) => {
            display::warning("--out only applies to binary secrets");
            println!("{content}");
        }
        (_, None) => println!("{content}"),
    }
    Ok(())
}
