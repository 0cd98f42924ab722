//! Core types for Keeper.
//!
//! - [`Secret`]: one stored record, always encrypted, identified by
//!   `(name, type, owner)`
//! - [`SecretContent`]: the plaintext shapes that get serialized and
//!   encrypted into a secret's payload
//! - [`validation`]: checks run on user input before anything is encrypted

mod content;
mod error;
mod secret;
pub mod serde_base64;
pub mod validation;

pub use content::{BankCard, BinaryData, Credentials, SecretContent, TextNote};
pub use error::{ContentError, UnknownSecretType, ValidationError, ValidationResult};
pub use secret::{Secret, SecretIdentity, SecretType};
