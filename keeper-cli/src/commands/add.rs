//! `keeper add`

use super::{encryptor, open_store};
use crate::cli::{AddCommand, AddTarget};
use crate::config::KeeperConfig;
use crate::display;
use anyhow::{Context, Result};
use chrono::Utc;
use keeper_sync::RemoteWriter;
use keeper_types::{
    BankCard, BinaryData, Credentials, Secret, SecretContent, SecretIdentity, TextNote,
};
use std::fs;
use tracing::info;

/// Splits the parsed subcommand into its target and plaintext content.
pub fn into_content(command: AddCommand) -> Result<(AddTarget, SecretContent)> {
    Ok(match command {
        AddCommand::Bankcard {
            target,
            number,
            holder,
            expiry,
            cvv,
        } => {
            let metadata = target.metadata.clone();
            (
                target,
                SecretContent::BankCard(BankCard {
                    number,
                    holder,
                    expiry,
                    cvv,
                    metadata,
                }),
            )
        }
        AddCommand::User {
            target,
            username,
            password,
        } => {
            let metadata = target.metadata.clone();
            (
                target,
                SecretContent::Credentials(Credentials {
                    username,
                    password,
                    metadata,
                }),
            )
        }
        AddCommand::Text { target, body } => {
            let metadata = target.metadata.clone();
            (target, SecretContent::Text(TextNote { body, metadata }))
        }
        AddCommand::Binary { target, file } => {
            let data =
                fs::read(&file).with_context(|| format!("failed to read {}", file.display()))?;
            let metadata = target.metadata.clone();
            (target, SecretContent::Binary(BinaryData { data, metadata }))
        }
    })
}

/// Validates, encrypts and stores `content` locally, then pushes it when asked.
pub async fn run(
    config: &KeeperConfig,
    target: &AddTarget,
    content: &SecretContent,
) -> Result<Secret> {
    content.validate().context("secret rejected")?;

    let cryptor = encryptor(config)?;
    let payload = cryptor.encrypt(&content.to_plaintext()?)?;
    let identity = SecretIdentity::new(&target.name, content.secret_type(), &target.owner);
    let secret = Secret::new(identity.clone(), payload, Utc::now());

    open_store(config)?
        .save(&secret)
        .with_context(|| format!("failed to save {identity}"))?;
    info!("stored {identity} locally");
    display::success(&format!("saved {identity}"));

    if target.push {
        let token = target.token.as_deref().unwrap_or_default();
        let remote = keeper_cloud::connect(&config.remote)?;
        remote
            .save(&secret.name, secret.secret_type, secret.payload(), token)
            .await
            .with_context(|| format!("failed to push {identity}"))?;
        display::success(&format!("pushed {identity} to {}", config.remote.url));
    }

    Ok(secret)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::config_with_keys;
    use keeper_storage::SecretStore;
    use keeper_types::{SecretType, ValidationError};

    fn target(name: &str) -> AddTarget {
        AddTarget {
            name: name.into(),
            owner: "alice".into(),
            metadata: Some("personal".into()),
            push: false,
            token: None,
        }
    }

    #[tokio::test]
    async fn stores_encrypted_secret() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with_keys(dir.path());
        let content = SecretContent::Text(TextNote {
            body: "door code 4711".into(),
            metadata: None,
        });

        let secret = run(&config, &target("door"), &content).await.unwrap();

        let store = SecretStore::open(&config.database_path).unwrap();
        let stored = store.get(&secret.identity()).unwrap().unwrap();
        assert_eq!(stored.payload(), secret.payload());
        assert!(!stored
            .ciphertext()
            .windows(4)
            .any(|w| w == b"door"));
    }

    #[tokio::test]
    async fn invalid_card_is_rejected_before_storing() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with_keys(dir.path());
        let content = SecretContent::BankCard(BankCard {
            number: "1234567812345678".into(),
            holder: "A Person".into(),
            expiry: "12/29".into(),
            cvv: "123".into(),
            metadata: None,
        });

        let err = run(&config, &target("card"), &content).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<ValidationError>(),
            Some(&ValidationError::CardNumberChecksum)
        );
        assert!(!config.database_path.exists());
    }

    #[test]
    fn binary_content_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("blob.bin");
        fs::write(&file, [0u8, 1, 2, 255]).unwrap();

        let (target, content) = into_content(AddCommand::Binary {
            target: target("blob"),
            file,
        })
        .unwrap();
        assert_eq!(target.name, "blob");
        assert_eq!(content.secret_type(), SecretType::Binary);
        assert_eq!(
            content,
            SecretContent::Binary(BinaryData {
                data: vec![0, 1, 2, 255],
                metadata: Some("personal".into()),
            })
        );
    }
}
