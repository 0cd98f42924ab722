//! `keeper list`

use super::open_store;
use crate::config::KeeperConfig;
use crate::display;
use anyhow::{Context, Result};
use keeper_sync::RemoteReader;
use keeper_types::Secret;

pub fn local(config: &KeeperConfig, owner: Option<&str>) -> Result<Vec<Secret>> {
    Ok(open_store(config)?.list(owner)?)
}

/// Remote rows, filtered by owner client-side and ordered like the local list.
pub async fn remote(
    config: &KeeperConfig,
    owner: Option<&str>,
    token: &str,
) -> Result<Vec<Secret>> {
    let remote = keeper_cloud::connect(&config.remote)?;
    let mut secrets = remote
        .list(token)
        .await
        .with_context(|| format!("failed to list {}", config.remote.url))?;
    if let Some(owner) = owner {
        secrets.retain(|s| s.owner == owner);
    }
    secrets.sort_by(|a, b| (&a.name, a.secret_type).cmp(&(&b.name, b.secret_type)));
    Ok(secrets)
}

pub async fn run(
    config: &KeeperConfig,
    owner: Option<&str>,
    remote_token: Option<&str>,
) -> Result<()> {
    let secrets = match remote_token {
        Some(token) => remote(config, owner, token).await?,
        None => local(config, owner)?,
    };
    display::print_secrets(&secrets);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::AddTarget;
    use crate::commands::{add, testing::config_with_keys};
    use keeper_types::{SecretContent, TextNote};
    use pretty_assertions::assert_eq;

    async fn add_note(config: &KeeperConfig, name: &str, owner: &str) {
        let target = AddTarget {
            name: name.into(),
            owner: owner.into(),
            metadata: None,
            push: false,
            token: None,
        };
        let content = SecretContent::Text(TextNote {
            body: "x".into(),
            metadata: None,
        });
        add::run(config, &target, &content).await.unwrap();
    }

    #[tokio::test]
    async fn lists_local_secrets_by_owner() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with_keys(dir.path());
        add_note(&config, "b", "alice").await;
        add_note(&config, "a", "alice").await;
        add_note(&config, "c", "bob").await;

        let names: Vec<String> = local(&config, Some("alice"))
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(local(&config, None).unwrap().len(), 3);

        let bob = local(&config, Some("bob")).unwrap();
        let rows = display::secret_rows(&bob);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "c");
        assert_eq!(rows[0].secret_type, "text");
        assert_eq!(rows[0].owner, "bob");

        let table = display::secret_table(&bob);
        assert!(table.contains("NAME"));
        assert!(table.contains("UPDATED"));
        assert!(table.lines().any(|l| l.contains(" c ") && l.contains(" text ")));
    }
}
