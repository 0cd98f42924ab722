//! Sync run orchestration.
//!
//! One secret at a time, one remote call in flight at a time. The order is
//! fixed: list local, then per secret `get`, decide, maybe `save`.

use crate::contracts::{LocalLister, RemoteSecrets};
use crate::error::{SyncError, SyncResult};
use crate::strategy::{Resolution, SyncStrategy};
use keeper_types::Secret;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// How a local secret relates to its remote counterpart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classification<'a> {
    /// No remote row for the identity triple.
    Absent,
    /// Remote row exists and is strictly older than local.
    Stale(&'a Secret),
    /// Remote row exists and is at least as new as local.
    Fresh(&'a Secret),
}

impl<'a> Classification<'a> {
    pub fn of(local: &Secret, remote: Option<&'a Secret>) -> Self {
        match remote {
            None => Classification::Absent,
            Some(remote) if remote.updated_at < local.updated_at => Classification::Stale(remote),
            Some(remote) => Classification::Fresh(remote),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Classification::Absent => "absent",
            Classification::Stale(_) => "stale",
            Classification::Fresh(_) => "fresh",
        }
    }
}

/// Counters for one finished run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub examined: usize,
    pub pushed: usize,
    pub kept: usize,
    /// Secrets the user was asked about.
    pub conflicts: usize,
}

/// Reconciles the local secrets of one owner against the remote store.
pub struct SyncEngine {
    local: Arc<dyn LocalLister>,
    remote: Arc<dyn RemoteSecrets>,
    owner: String,
    token: String,
}

impl SyncEngine {
    pub fn new(
        local: Arc<dyn LocalLister>,
        remote: Arc<dyn RemoteSecrets>,
        owner: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            local,
            remote,
            owner: owner.into(),
            token: token.into(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Runs one sync pass with the given strategy.
    ///
    /// The first error aborts the run. Saves issued before it stand.
    pub async fn run(&self, strategy: &mut dyn SyncStrategy) -> SyncResult<SyncReport> {
        let mut report = SyncReport::default();
        if strategy.is_passive() {
            info!("{} strategy selected, nothing to reconcile", strategy.name());
            return Ok(report);
        }

        let secrets = self.local.list(Some(&self.owner)).await?;
        info!(
            "syncing {} secrets for {} ({} strategy)",
            secrets.len(),
            self.owner,
            strategy.name()
        );

        for local in &secrets {
            let identity = local.identity();
            let remote = self
                .remote
                .get(&local.name, local.secret_type, &self.token)
                .await
                .map_err(|e| SyncError::transport("get", &identity, e))?;

            let class = Classification::of(local, remote.as_ref());
            report.examined += 1;

            let decision = strategy.resolve(local, class).await?;
            debug!("{identity}: remote {} -> {:?}", class.label(), decision.resolution);
            if decision.prompted {
                report.conflicts += 1;
            }

            match decision.resolution {
                Resolution::Push => {
                    self.remote
                        .save(&local.name, local.secret_type, local.payload(), &self.token)
                        .await
                        .map_err(|e| SyncError::transport("save", &identity, e))?;
                    report.pushed += 1;
                }
                Resolution::Keep => report.kept += 1,
            }
        }

        info!(
            "sync finished: {} examined, {} pushed, {} kept, {} conflicts",
            report.examined, report.pushed, report.kept, report.conflicts
        );
        Ok(report)
    }

    /// Like [`SyncEngine::run`], but abandons the run as soon as `cancel`
    /// completes. A pending prompt read is dropped and no further remote
    /// call is issued.
    pub async fn run_until<F>(
        &self,
        strategy: &mut dyn SyncStrategy,
        cancel: F,
    ) -> SyncResult<SyncReport>
    where
        F: Future<Output = ()> + Send,
    {
        tokio::select! {
            biased;
            _ = cancel => {
                warn!("sync run cancelled");
                Err(SyncError::Cancelled)
            }
            result = self.run(strategy) => result,
        }
    }
}
