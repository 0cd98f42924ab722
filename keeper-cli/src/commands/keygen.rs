//! `keeper keygen`

use crate::config::{PRIVATE_KEY_FILE, PUBLIC_KEY_FILE};
use anyhow::{Context, Result, bail};
use keeper_crypto::{generate_keypair, keys};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes a new key pair into `out`. Returns the public and private key paths.
pub fn run(out: &Path, bits: usize, force: bool) -> Result<(PathBuf, PathBuf)> {
    let public_path = out.join(PUBLIC_KEY_FILE);
    let private_path = out.join(PRIVATE_KEY_FILE);
    if !force && (public_path.exists() || private_path.exists()) {
        bail!(
            "key files already exist in {} (use --force to overwrite)",
            out.display()
        );
    }

    fs::create_dir_all(out).with_context(|| format!("failed to create {}", out.display()))?;

    info!("generating {bits}-bit RSA key pair");
    let (private, public) = generate_keypair(bits)?;

    fs::write(&public_path, keys::public_key_to_pem(&public)?)
        .with_context(|| format!("failed to write {}", public_path.display()))?;
    write_private(&private_path, keys::private_key_to_pem(&private)?.as_bytes())?;

    Ok((public_path, private_path))
}

#[cfg(unix)]
fn write_private(path: &Path, pem: &[u8]) -> Result<()> {
    use std::io::Write;
    use std::os::unix::fs::OpenOptionsExt;

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    file.write_all(pem)?;
    Ok(())
}

#[cfg(not(unix))]
fn write_private(path: &Path, pem: &[u8]) -> Result<()> {
    fs::write(path, pem).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_loadable_pair() {
        let dir = tempfile::tempdir().unwrap();
        let (public_path, private_path) = run(dir.path(), 1024, false).unwrap();

        let public = keys::public_key_from_pem(&fs::read_to_string(public_path).unwrap()).unwrap();
        let private =
            keys::private_key_from_pem(&fs::read_to_string(private_path).unwrap()).unwrap();
        assert_eq!(private.to_public_key(), public);
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        run(dir.path(), 1024, false).unwrap();
        let err = run(dir.path(), 1024, false).unwrap_err();
        assert!(err.to_string().contains("--force"));
        assert!(run(dir.path(), 1024, true).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn private_key_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let (_, private_path) = run(dir.path(), 1024, false).unwrap();
        let mode = fs::metadata(private_path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
