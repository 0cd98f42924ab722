//! JSON-over-HTTP remote.
//!
//! Every request carries the session token as a bearer credential. Binary
//! fields travel base64-encoded.

use crate::config::RemoteConfig;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use keeper_crypto::EncryptedPayload;
use keeper_sync::{RemoteReader, RemoteWriter, TransportError, TransportResult};
use keeper_types::{Secret, SecretIdentity, SecretType};
use reqwest::{Client, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A secret as the HTTP API returns it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretRecord {
    pub name: String,
    pub secret_type: SecretType,
    pub owner: String,
    #[serde(with = "keeper_types::serde_base64")]
    pub ciphertext: Vec<u8>,
    #[serde(with = "keeper_types::serde_base64")]
    pub wrapped_key: Vec<u8>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SecretRecord> for Secret {
    fn from(record: SecretRecord) -> Self {
        Secret::from_parts(
            SecretIdentity::new(record.name, record.secret_type, record.owner),
            EncryptedPayload {
                ciphertext: record.ciphertext,
                wrapped_key: record.wrapped_key,
            },
            record.created_at,
            record.updated_at,
        )
    }
}

impl From<&Secret> for SecretRecord {
    fn from(secret: &Secret) -> Self {
        Self {
            name: secret.name.clone(),
            secret_type: secret.secret_type,
            owner: secret.owner.clone(),
            ciphertext: secret.ciphertext().to_vec(),
            wrapped_key: secret.wrapped_key().to_vec(),
            created_at: secret.created_at,
            updated_at: secret.updated_at,
        }
    }
}

/// Body of `GET /api/v1/secrets`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SecretList {
    pub secrets: Vec<SecretRecord>,
}

/// Body of `PUT /api/v1/secrets/{type}/{name}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreRequest {
    #[serde(with = "keeper_types::serde_base64")]
    pub ciphertext: Vec<u8>,
    #[serde(with = "keeper_types::serde_base64")]
    pub wrapped_key: Vec<u8>,
}

/// HTTP client for the remote secret API.
#[derive(Clone, Debug)]
pub struct HttpRemote {
    client: Client,
    base: Url,
}

fn http_error(e: reqwest::Error) -> TransportError {
    TransportError::Http(e.to_string())
}

/// Maps auth failures and other non-2xx statuses to transport errors.
async fn check_status(resp: Response) -> TransportResult<Response> {
    let status = resp.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(TransportError::Unauthorized);
    }
    if !status.is_success() {
        let body = match resp.text().await {
            Ok(body) => body,
            Err(e) => format!("<unreadable body: {e}>"),
        };
        return Err(TransportError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(resp)
}

impl HttpRemote {
    pub fn new(config: &RemoteConfig) -> TransportResult<Self> {
        let base = Url::parse(&config.url).map_err(|e| {
            TransportError::Config(format!("invalid remote URL {:?}: {e}", config.url))
        })?;
        if base.cannot_be_a_base() {
            return Err(TransportError::Config(format!(
                "remote URL {:?} cannot carry a path",
                config.url
            )));
        }

        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| TransportError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, base })
    }

    /// `{base}/api/v1/secrets[/{segments}...]` with each segment escaped.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // `new` rejected cannot-be-a-base URLs, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty()
                .extend(["api", "v1", "secrets"])
                .extend(segments);
        }
        url
    }

    fn secret_url(&self, name: &str, secret_type: SecretType) -> Url {
        self.endpoint(&[secret_type.as_str(), name])
    }
}

#[async_trait]
impl RemoteReader for HttpRemote {
    async fn get(
        &self,
        name: &str,
        secret_type: SecretType,
        token: &str,
    ) -> TransportResult<Option<Secret>> {
        let url = self.secret_url(name, secret_type);
        debug!("GET {url}");
        let resp = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(http_error)?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let record: SecretRecord = check_status(resp)
            .await?
            .json()
            .await
            .map_err(|e| TransportError::Codec(e.to_string()))?;
        Ok(Some(record.into()))
    }

    async fn list(&self, token: &str) -> TransportResult<Vec<Secret>> {
        let url = self.endpoint(&[]);
        debug!("GET {url}");
        let resp = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(http_error)?;

        let list: SecretList = check_status(resp)
            .await?
            .json()
            .await
            .map_err(|e| TransportError::Codec(e.to_string()))?;
        Ok(list.secrets.into_iter().map(Secret::from).collect())
    }
}

#[async_trait]
impl RemoteWriter for HttpRemote {
    async fn save(
        &self,
        name: &str,
        secret_type: SecretType,
        payload: &EncryptedPayload,
        token: &str,
    ) -> TransportResult<()> {
        let url = self.secret_url(name, secret_type);
        debug!("PUT {url}");
        let body = StoreRequest {
            ciphertext: payload.ciphertext.clone(),
            wrapped_key: payload.wrapped_key.clone(),
        };
        let resp = self
            .client
            .put(url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(http_error)?;

        check_status(resp).await?;
        Ok(())
    }
}
