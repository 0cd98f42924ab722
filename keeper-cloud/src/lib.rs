//! Remote transports for Keeper.
//!
//! Two interchangeable clients implement the `keeper-sync` remote contracts:
//!
//! - [`HttpRemote`]: JSON over HTTP(S) with a bearer session token
//! - [`StreamRemote`]: length-prefixed `bincode` frames over TCP
//!
//! [`connect`] picks one from the URL scheme. The choice is made once, when
//! the process starts; everything downstream only sees `dyn RemoteSecrets`.

pub mod codec;
pub mod config;
mod http;
mod stream;

pub use config::RemoteConfig;
pub use http::{HttpRemote, SecretList, SecretRecord, StoreRequest};
pub use stream::StreamRemote;

use keeper_sync::{RemoteSecrets, TransportError, TransportResult};
use reqwest::Url;
use std::sync::Arc;
use tracing::debug;

/// Builds the transport matching `config.url`.
pub fn connect(config: &RemoteConfig) -> TransportResult<Arc<dyn RemoteSecrets>> {
    let url = Url::parse(&config.url)
        .map_err(|e| TransportError::Config(format!("invalid remote URL {:?}: {e}", config.url)))?;

    match url.scheme() {
        "http" | "https" => {
            debug!("using HTTP transport at {url}");
            Ok(Arc::new(HttpRemote::new(config)?))
        }
        "tcp" => {
            debug!("using stream transport at {url}");
            Ok(Arc::new(StreamRemote::from_url(&url, config.request_timeout())?))
        }
        other => Err(TransportError::UnsupportedScheme(other.to_string())),
    }
}
