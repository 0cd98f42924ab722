//! Plaintext shapes of the four secret kinds.
//!
//! Content is serialized to JSON, and that JSON is what gets encrypted.

use crate::error::{ContentError, ValidationResult};
use crate::secret::SecretType;
use crate::validation;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankCard {
    pub number: String,
    pub holder: String,
    /// `MM/YY`.
    pub expiry: String,
    pub cvv: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextNote {
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryData {
    #[serde(with = "crate::serde_base64")]
    pub data: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,
}

/// Decrypted body of a secret.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum SecretContent {
    #[serde(rename = "bankcard")]
    BankCard(BankCard),
    #[serde(rename = "user")]
    Credentials(Credentials),
    #[serde(rename = "text")]
    Text(TextNote),
    #[serde(rename = "binary")]
    Binary(BinaryData),
}

impl SecretContent {
    pub fn secret_type(&self) -> SecretType {
        match self {
            SecretContent::BankCard(_) => SecretType::BankCard,
            SecretContent::Credentials(_) => SecretType::User,
            SecretContent::Text(_) => SecretType::Text,
            SecretContent::Binary(_) => SecretType::Binary,
        }
    }

    /// Runs the validators that apply to this kind of content.
    pub fn validate(&self) -> ValidationResult {
        match self {
            SecretContent::BankCard(card) => {
                validation::validate_card_number(&card.number)?;
                validation::validate_expiry(&card.expiry)?;
                validation::validate_cvv(&card.cvv)
            }
            SecretContent::Credentials(creds) => {
                validation::validate_username(&creds.username)?;
                validation::validate_password(&creds.password)
            }
            SecretContent::Text(_) | SecretContent::Binary(_) => Ok(()),
        }
    }

    pub fn to_plaintext(&self) -> Result<Vec<u8>, ContentError> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_plaintext(bytes: &[u8]) -> Result<Self, ContentError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Decodes and checks the content matches the type it was stored under.
    pub fn from_plaintext_as(bytes: &[u8], expected: SecretType) -> Result<Self, ContentError> {
        let content = Self::from_plaintext(bytes)?;
        let actual = content.secret_type();
        if actual != expected {
            return Err(ContentError::TypeMismatch { expected, actual });
        }
        Ok(content)
    }

    pub fn metadata(&self) -> Option<&str> {
        match self {
            SecretContent::BankCard(c) => c.metadata.as_deref(),
            SecretContent::Credentials(c) => c.metadata.as_deref(),
            SecretContent::Text(c) => c.metadata.as_deref(),
            SecretContent::Binary(c) => c.metadata.as_deref(),
        }
    }
}

impl fmt::Display for SecretContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecretContent::BankCard(card) => {
                writeln!(f, "number:   {}", card.number)?;
                writeln!(f, "holder:   {}", card.holder)?;
                writeln!(f, "expiry:   {}", card.expiry)?;
                write!(f, "cvv:      {}", card.cvv)?;
            }
            SecretContent::Credentials(creds) => {
                writeln!(f, "username: {}", creds.username)?;
                write!(f, "password: {}", creds.password)?;
            }
            SecretContent::Text(note) => {
                write!(f, "{}", note.body)?;
            }
            SecretContent::Binary(blob) => {
                write!(f, "<{} bytes of binary data>", blob.data.len())?;
            }
        }
        if let Some(meta) = self.metadata() {
            write!(f, "\nmetadata: {meta}")?;
        }
        Ok(())
    }
}
