//! `keeper sync`

use super::decryptor;
use crate::config::KeeperConfig;
use anyhow::{Context, Result};
use keeper_storage::SecretStore;
use keeper_sync::{
    InteractiveStrategy, LinePrompt, PassiveStrategy, PushStrategy, StrategyKind, SyncEngine,
    SyncReport, SyncStrategy,
};
use std::sync::Arc;
use tracing::info;

fn strategy(config: &KeeperConfig, kind: StrategyKind) -> Result<Box<dyn SyncStrategy>> {
    Ok(match kind {
        StrategyKind::Push => Box::new(PushStrategy),
        StrategyKind::Passive => Box::new(PassiveStrategy),
        StrategyKind::Interactive => Box::new(InteractiveStrategy::new(
            Arc::new(decryptor(config)?),
            Box::new(LinePrompt::stdio()),
        )),
    })
}

/// Runs one sync pass. Ctrl-C abandons the run between or during steps.
pub async fn run(
    config: &KeeperConfig,
    owner: &str,
    token: &str,
    kind: StrategyKind,
) -> Result<SyncReport> {
    let store = SecretStore::open_read_only(&config.database_path)
        .with_context(|| format!("failed to open {}", config.database_path.display()))?;
    let remote = keeper_cloud::connect(&config.remote)?;
    let mut strategy = strategy(config, kind)?;

    let engine = SyncEngine::new(Arc::new(store), remote, owner, token);
    let cancel = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };
    let report = engine.run_until(strategy.as_mut(), cancel).await?;

    info!(
        "{} examined, {} pushed, {} kept",
        report.examined, report.pushed, report.kept
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::AddTarget;
    use crate::commands::{add, testing::config_with_keys};
    use keeper_cloud::RemoteConfig;
    use keeper_types::{SecretContent, TextNote};
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn push_sync_uploads_missing_secret() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/secrets/text/wifi"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/v1/secrets/text/wifi"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut config = config_with_keys(dir.path());
        config.remote = RemoteConfig::new(server.uri());

        let target = AddTarget {
            name: "wifi".into(),
            owner: "alice".into(),
            metadata: None,
            push: false,
            token: None,
        };
        let content = SecretContent::Text(TextNote {
            body: "hunter2".into(),
            metadata: None,
        });
        add::run(&config, &target, &content).await.unwrap();

        let report = run(&config, "alice", "tok", StrategyKind::Push).await.unwrap();
        assert_eq!(
            report,
            SyncReport {
                examined: 1,
                pushed: 1,
                kept: 0,
                conflicts: 0,
            }
        );
    }

    #[tokio::test]
    async fn passive_sync_makes_no_requests() {
        let server = MockServer::start().await;
        Mock::given(wiremock::matchers::any())
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut config = config_with_keys(dir.path());
        config.remote = RemoteConfig::new(server.uri());
        crate::commands::open_store(&config).unwrap();

        let report = run(&config, "alice", "tok", StrategyKind::Passive).await.unwrap();
        assert_eq!(report, SyncReport::default());
    }

    #[tokio::test]
    async fn sync_without_database_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with_keys(dir.path());
        let err = run(&config, "alice", "tok", StrategyKind::Push).await.unwrap_err();
        assert!(err.to_string().starts_with("failed to open"));
    }
}
