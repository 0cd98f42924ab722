//! `keeper remove`

use super::open_store;
use crate::config::KeeperConfig;
use crate::display;
use anyhow::{Result, bail};
use keeper_types::SecretIdentity;

/// Deletes a local secret. The remote copy is left alone.
pub fn run(config: &KeeperConfig, identity: &SecretIdentity) -> Result<()> {
    if !open_store(config)?.delete(identity)? {
        bail!("no secret {identity}");
    }
    display::success(&format!("removed {identity}"));
    Ok(())
}
