//! Strategies deciding which copy of a secret survives.

use crate::engine::Classification;
use crate::error::{SyncError, SyncResult};
use crate::prompt::{Conflict, KEEP_LOCAL, KEEP_REMOTE, Prompt};
use async_trait::async_trait;
use keeper_crypto::Cryptor;
use keeper_types::{Secret, SecretContent};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Outcome for one secret.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Overwrite the remote copy with the local payload.
    Push,
    /// Leave the remote copy alone.
    Keep,
}

/// A resolution, and whether the user had to be asked for it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decision {
    pub resolution: Resolution,
    /// The secret was a conflict put to the user.
    pub prompted: bool,
}

impl Decision {
    pub fn automatic(resolution: Resolution) -> Self {
        Self {
            resolution,
            prompted: false,
        }
    }

    pub fn prompted(resolution: Resolution) -> Self {
        Self {
            resolution,
            prompted: true,
        }
    }
}

#[async_trait]
pub trait SyncStrategy: Send {
    fn name(&self) -> &'static str;

    /// Passive strategies short-circuit the run before any store is touched.
    fn is_passive(&self) -> bool {
        false
    }

    async fn resolve(
        &mut self,
        local: &Secret,
        class: Classification<'_>,
    ) -> SyncResult<Decision>;
}

/// Push local when the remote is missing or strictly older.
///
/// Equal timestamps keep the remote copy.
#[derive(Debug, Default)]
pub struct PushStrategy;

#[async_trait]
impl SyncStrategy for PushStrategy {
    fn name(&self) -> &'static str {
        "push"
    }

    async fn resolve(
        &mut self,
        _local: &Secret,
        class: Classification<'_>,
    ) -> SyncResult<Decision> {
        Ok(Decision::automatic(match class {
            Classification::Absent | Classification::Stale(_) => Resolution::Push,
            Classification::Fresh(_) => Resolution::Keep,
        }))
    }
}

/// Reserved for remote-initiated reconciliation. Never has side effects.
#[derive(Debug, Default)]
pub struct PassiveStrategy;

#[async_trait]
impl SyncStrategy for PassiveStrategy {
    fn name(&self) -> &'static str {
        "passive"
    }

    fn is_passive(&self) -> bool {
        true
    }

    async fn resolve(
        &mut self,
        _local: &Secret,
        _class: Classification<'_>,
    ) -> SyncResult<Decision> {
        Ok(Decision::automatic(Resolution::Keep))
    }
}

/// Pushes missing/older remotes automatically and asks the user about every
/// remote that is at least as new as the local copy.
///
/// Unlike [`PushStrategy`], equal timestamps count as a conflict.
pub struct InteractiveStrategy {
    cryptor: Arc<Cryptor>,
    prompt: Box<dyn Prompt>,
}

impl InteractiveStrategy {
    pub fn new(cryptor: Arc<Cryptor>, prompt: Box<dyn Prompt>) -> Self {
        Self { cryptor, prompt }
    }

    fn render(&self, secret: &Secret) -> SyncResult<String> {
        let plaintext = self
            .cryptor
            .decrypt_payload(secret.payload())
            .map_err(|source| SyncError::Crypto {
                identity: secret.identity(),
                source,
            })?;
        Ok(match SecretContent::from_plaintext_as(&plaintext, secret.secret_type) {
            Ok(content) => content.to_string(),
            Err(_) => String::from_utf8_lossy(&plaintext).into_owned(),
        })
    }

    async fn ask(&mut self, local: &Secret, remote: &Secret) -> SyncResult<Decision> {
        let conflict = Conflict {
            identity: local.identity(),
            local_text: self.render(local)?,
            local_updated_at: local.updated_at,
            remote_text: self.render(remote)?,
            remote_updated_at: remote.updated_at,
        };

        let answer = self.prompt.choose(&conflict).await?;
        match answer.as_str() {
            KEEP_LOCAL => {
                info!("{}: keeping local copy", conflict.identity);
                Ok(Decision::prompted(Resolution::Push))
            }
            KEEP_REMOTE => {
                info!("{}: keeping remote copy", conflict.identity);
                Ok(Decision::prompted(Resolution::Keep))
            }
            _ => {
                warn!("{}: invalid conflict choice, aborting run", conflict.identity);
                Err(SyncError::ConflictAbort {
                    identity: conflict.identity,
                    input: answer,
                })
            }
        }
    }
}

impl fmt::Debug for InteractiveStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractiveStrategy")
            .field("cryptor", &self.cryptor)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl SyncStrategy for InteractiveStrategy {
    fn name(&self) -> &'static str {
        "interactive"
    }

    async fn resolve(
        &mut self,
        local: &Secret,
        class: Classification<'_>,
    ) -> SyncResult<Decision> {
        match class {
            Classification::Absent => {
                self.prompt
                    .notify(&format!("{}: not on remote, pushing local copy", local.identity()))
                    .await?;
                Ok(Decision::automatic(Resolution::Push))
            }
            Classification::Stale(_) => {
                self.prompt
                    .notify(&format!("{}: remote copy is older, pushing local copy", local.identity()))
                    .await?;
                Ok(Decision::automatic(Resolution::Push))
            }
            Classification::Fresh(remote) => self.ask(local, remote).await,
        }
    }
}

/// Strategy selector as given on the command line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StrategyKind {
    #[default]
    Push,
    Passive,
    Interactive,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sync strategy {0:?} (expected push, passive or interactive)")]
pub struct UnknownStrategy(pub String);

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Push => "push",
            StrategyKind::Passive => "passive",
            StrategyKind::Interactive => "interactive",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "push" => Ok(StrategyKind::Push),
            "passive" => Ok(StrategyKind::Passive),
            "interactive" => Ok(StrategyKind::Interactive),
            other => Err(UnknownStrategy(other.to_string())),
        }
    }
}
