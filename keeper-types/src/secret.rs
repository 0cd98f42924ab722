use crate::error::UnknownSecretType;
use chrono::{DateTime, Utc};
use keeper_crypto::EncryptedPayload;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of record held in a secret.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SecretType {
    #[serde(rename = "bankcard")]
    BankCard,
    #[serde(rename = "user")]
    User,
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "binary")]
    Binary,
}

impl SecretType {
    pub const ALL: [SecretType; 4] = [
        SecretType::BankCard,
        SecretType::User,
        SecretType::Text,
        SecretType::Binary,
    ];

    /// Wire and storage name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SecretType::BankCard => "bankcard",
            SecretType::User => "user",
            SecretType::Text => "text",
            SecretType::Binary => "binary",
        }
    }
}

impl fmt::Display for SecretType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SecretType {
    type Err = UnknownSecretType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SecretType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownSecretType(s.to_string()))
    }
}

/// The `(name, type, owner)` triple that identifies one logical secret in
/// every store.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SecretIdentity {
    pub name: String,
    pub secret_type: SecretType,
    pub owner: String,
}

impl SecretIdentity {
    pub fn new(name: impl Into<String>, secret_type: SecretType, owner: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            secret_type,
            owner: owner.into(),
        }
    }
}

impl fmt::Display for SecretIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.secret_type, self.name, self.owner)
    }
}

/// A stored secret.
///
/// The encrypted payload is private: it can only be read as a whole and
/// replaced as a whole, so ciphertext and wrapped key never drift apart.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Secret {
    pub name: String,
    pub secret_type: SecretType,
    pub owner: String,
    payload: EncryptedPayload,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Secret {
    /// A freshly created secret; both timestamps are `now`.
    pub fn new(identity: SecretIdentity, payload: EncryptedPayload, now: DateTime<Utc>) -> Self {
        Self::from_parts(identity, payload, now, now)
    }

    /// Rebuilds a secret read back from a store.
    pub fn from_parts(
        identity: SecretIdentity,
        payload: EncryptedPayload,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            name: identity.name,
            secret_type: identity.secret_type,
            owner: identity.owner,
            payload,
            created_at,
            updated_at,
        }
    }

    pub fn identity(&self) -> SecretIdentity {
        SecretIdentity::new(self.name.clone(), self.secret_type, self.owner.clone())
    }

    pub fn payload(&self) -> &EncryptedPayload {
        &self.payload
    }

    pub fn ciphertext(&self) -> &[u8] {
        &self.payload.ciphertext
    }

    pub fn wrapped_key(&self) -> &[u8] {
        &self.payload.wrapped_key
    }

    /// Swaps in a re-encrypted payload and advances `updated_at`.
    pub fn replace_payload(&mut self, payload: EncryptedPayload, now: DateTime<Utc>) {
        self.payload = payload;
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn payload(tag: u8) -> EncryptedPayload {
        EncryptedPayload {
            ciphertext: vec![tag; 40],
            wrapped_key: vec![tag ^ 0xFF; 128],
        }
    }

    #[test]
    fn secret_type_names_roundtrip() {
        for t in SecretType::ALL {
            assert_eq!(t.as_str().parse::<SecretType>().unwrap(), t);
            assert_eq!(
                serde_json::to_string(&t).unwrap(),
                format!("\"{}\"", t.as_str())
            );
        }
    }

    #[test]
    fn unknown_type_rejected() {
        let err = "creditcard".parse::<SecretType>().unwrap_err();
        assert_eq!(err.to_string(), "unknown secret type: creditcard");
        assert!("BankCard".parse::<SecretType>().is_err());
    }

    #[test]
    fn identity_display() {
        let id = SecretIdentity::new("visa", SecretType::BankCard, "alice");
        assert_eq!(id.to_string(), "bankcard/visa@alice");
    }

    #[test]
    fn replace_payload_keeps_created_at() {
        let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2024, 3, 2, 12, 0, 0).unwrap();
        let mut secret = Secret::new(SecretIdentity::new("n", SecretType::Text, "o"), payload(1), t0);

        secret.replace_payload(payload(2), t1);

        assert_eq!(secret.created_at, t0);
        assert_eq!(secret.updated_at, t1);
        assert_eq!(secret.payload(), &payload(2));
    }
}
