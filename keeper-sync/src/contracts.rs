//! The four collaborator contracts the sync core consumes.
//!
//! Each implementation applies its own retry policy. The core only tells
//! "not found" (`Ok(None)`) apart from failure (`Err`).

use async_trait::async_trait;
use keeper_crypto::EncryptedPayload;
use keeper_storage::{SecretStore, StorageResult};
use keeper_types::{Secret, SecretType};
use thiserror::Error;

pub type TransportResult<T> = Result<T, TransportError>;

/// Errors surfaced by a remote transport.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("remote returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("remote rejected the session token")]
    Unauthorized,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("codec error: {0}")]
    Codec(String),

    #[error("frame of {size} bytes exceeds the {limit} byte limit")]
    FrameTooLarge { size: usize, limit: usize },

    #[error("remote failure: {0}")]
    Remote(String),

    #[error("unsupported remote URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid remote configuration: {0}")]
    Config(String),
}

/// Lists local secrets, optionally restricted to one owner.
#[async_trait]
pub trait LocalLister: Send + Sync {
    async fn list(&self, owner: Option<&str>) -> StorageResult<Vec<Secret>>;
}

/// Upserts a local secret by its identity triple.
#[async_trait]
pub trait LocalSaver: Send + Sync {
    async fn save(&self, secret: &Secret) -> StorageResult<()>;
}

#[async_trait]
pub trait RemoteReader: Send + Sync {
    /// `Ok(None)` when the remote has no row for this secret.
    async fn get(
        &self,
        name: &str,
        secret_type: SecretType,
        token: &str,
    ) -> TransportResult<Option<Secret>>;

    async fn list(&self, token: &str) -> TransportResult<Vec<Secret>>;
}

#[async_trait]
pub trait RemoteWriter: Send + Sync {
    /// Stores the payload as given. The remote stamps its own timestamps.
    async fn save(
        &self,
        name: &str,
        secret_type: SecretType,
        payload: &EncryptedPayload,
        token: &str,
    ) -> TransportResult<()>;
}

/// Full remote capability: `{save, get, list}`.
pub trait RemoteSecrets: RemoteReader + RemoteWriter {}

impl<T: RemoteReader + RemoteWriter + ?Sized> RemoteSecrets for T {}

#[async_trait]
impl LocalLister for SecretStore {
    async fn list(&self, owner: Option<&str>) -> StorageResult<Vec<Secret>> {
        SecretStore::list(self, owner)
    }
}

#[async_trait]
impl LocalSaver for SecretStore {
    async fn save(&self, secret: &Secret) -> StorageResult<()> {
        SecretStore::save(self, secret)
    }
}
