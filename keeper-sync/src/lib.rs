//! Secret synchronization for Keeper.
//!
//! The engine walks the local secrets of one owner, fetches each remote
//! counterpart and lets a [`SyncStrategy`] decide which copy survives:
//!
//! - [`PushStrategy`]: last-writer-wins, local only when strictly newer
//! - [`PassiveStrategy`]: does nothing
//! - [`InteractiveStrategy`]: asks the user whenever the remote copy is at
//!   least as new as the local one
//!
//! Encrypted payloads are copied verbatim; the engine itself never decrypts.
//! Stores and transports plug in through the narrow traits in [`contracts`].

pub mod contracts;
mod engine;
mod error;
pub mod prompt;
mod strategy;

pub use contracts::{
    LocalLister, LocalSaver, RemoteReader, RemoteSecrets, RemoteWriter, TransportError,
    TransportResult,
};
pub use engine::{Classification, SyncEngine, SyncReport};
pub use error::{SyncError, SyncResult};
pub use prompt::{Conflict, KEEP_LOCAL, KEEP_REMOTE, LinePrompt, Prompt, StdinFeed};
pub use strategy::{
    Decision, InteractiveStrategy, PassiveStrategy, PushStrategy, Resolution, StrategyKind,
    SyncStrategy, UnknownStrategy,
};
