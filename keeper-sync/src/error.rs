//! Sync error types.

use crate::contracts::TransportError;
use keeper_crypto::CryptoError;
use keeper_storage::StorageError;
use keeper_types::SecretIdentity;
use thiserror::Error;

pub type SyncResult<T> = Result<T, SyncError>;

/// Any of these ends the current run. Saves already issued for earlier
/// secrets stay applied.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("local store error: {0}")]
    Local(#[from] StorageError),

    #[error("remote {operation} failed for {identity}: {source}")]
    Transport {
        operation: &'static str,
        identity: SecretIdentity,
        source: TransportError,
    },

    #[error("cannot decrypt {identity} for comparison: {source}")]
    Crypto {
        identity: SecretIdentity,
        source: CryptoError,
    },

    #[error("conflict on {identity} aborted: expected 'l' or 'r', got {input:?}")]
    ConflictAbort {
        identity: SecretIdentity,
        input: String,
    },

    #[error("prompt I/O failed: {0}")]
    Prompt(#[from] std::io::Error),

    #[error("sync run cancelled")]
    Cancelled,
}

impl SyncError {
    pub(crate) fn transport(
        operation: &'static str,
        identity: &SecretIdentity,
        source: TransportError,
    ) -> Self {
        SyncError::Transport {
            operation,
            identity: identity.clone(),
            source,
        }
    }

    pub fn is_conflict_abort(&self) -> bool {
        matches!(self, SyncError::ConflictAbort { .. })
    }
}
