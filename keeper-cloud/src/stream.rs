//! Binary stream remote over TCP.

use crate::codec::{self, Request, Response};
use async_trait::async_trait;
use keeper_crypto::EncryptedPayload;
use keeper_sync::{RemoteReader, RemoteWriter, TransportError, TransportResult};
use keeper_types::{Secret, SecretType};
use reqwest::Url;
use std::io;
use std::time::Duration;
use tokio::net::TcpStream;
use tracing::debug;

/// Client for a `tcp://host:port` remote. Opens a fresh connection per call.
#[derive(Clone, Debug)]
pub struct StreamRemote {
    addr: String,
    timeout: Duration,
}

impl StreamRemote {
    /// Remote at `host:port`. `timeout` bounds each request, connect included.
    pub fn new(addr: impl Into<String>, timeout: Duration) -> Self {
        Self {
            addr: addr.into(),
            timeout,
        }
    }

    /// Remote taken from a `tcp://host:port` URL. Both host and port are required.
    pub fn from_url(url: &Url, timeout: Duration) -> TransportResult<Self> {
        let host = url
            .host_str()
            .ok_or_else(|| TransportError::Config(format!("remote URL {url} has no host")))?;
        let port = url
            .port()
            .ok_or_else(|| TransportError::Config(format!("remote URL {url} has no port")))?;
        Ok(Self::new(format!("{host}:{port}"), timeout))
    }

    /// The `host:port` this remote connects to.
    pub fn addr(&self) -> &str {
        &self.addr
    }

    async fn exchange(&self, request: &Request) -> TransportResult<Response> {
        let call = async {
            let mut stream = TcpStream::connect(&self.addr).await?;
            codec::write_frame(&mut stream, request).await?;
            codec::read_frame(&mut stream).await
        };
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Io(io::Error::new(
                io::ErrorKind::TimedOut,
                format!("no response from {} within {:?}", self.addr, self.timeout),
            ))),
        }
    }
}

fn unexpected(response: Response) -> TransportError {
    match response {
        Response::Failed(message) => TransportError::Remote(message),
        other => TransportError::Codec(format!("unexpected response {other:?}")),
    }
}

#[async_trait]
impl RemoteReader for StreamRemote {
    async fn get(
        &self,
        name: &str,
        secret_type: SecretType,
        token: &str,
    ) -> TransportResult<Option<Secret>> {
        debug!("stream get {secret_type}/{name} via {}", self.addr);
        let request = Request::Get {
            token: token.to_string(),
            name: name.to_string(),
            secret_type,
        };
        match self.exchange(&request).await? {
            Response::Found(secret) => Ok(Some(secret)),
            Response::NotFound => Ok(None),
            other => Err(unexpected(other)),
        }
    }

    async fn list(&self, token: &str) -> TransportResult<Vec<Secret>> {
        debug!("stream list via {}", self.addr);
        let request = Request::List {
            token: token.to_string(),
        };
        match self.exchange(&request).await? {
            Response::Listed(secrets) => Ok(secrets),
            other => Err(unexpected(other)),
        }
    }
}

#[async_trait]
impl RemoteWriter for StreamRemote {
    async fn save(
        &self,
        name: &str,
        secret_type: SecretType,
        payload: &EncryptedPayload,
        token: &str,
    ) -> TransportResult<()> {
        debug!("stream save {secret_type}/{name} via {}", self.addr);
        let request = Request::Save {
            token: token.to_string(),
            name: name.to_string(),
            secret_type,
            payload: payload.clone(),
        };
        match self.exchange(&request).await? {
            Response::Saved => Ok(()),
            other => Err(unexpected(other)),
        }
    }
}
