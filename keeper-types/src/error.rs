use thiserror::Error;

/// Result type for input validation.
pub type ValidationResult<T = ()> = Result<T, ValidationError>;

/// Input rejected before encryption was attempted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("card number must contain digits only")]
    CardNumberCharset,

    #[error("card number must be {min} to {max} digits, got {actual}")]
    CardNumberLength { min: usize, max: usize, actual: usize },

    #[error("card number fails checksum")]
    CardNumberChecksum,

    #[error("CVV must be exactly {expected} digits")]
    Cvv { expected: usize },

    #[error("expiry must be MM/YY")]
    Expiry,

    #[error("username must be {min} to {max} characters, got {actual}")]
    UsernameLength { min: usize, max: usize, actual: usize },

    #[error("username may only contain letters, digits, '.', '_' and '-'")]
    UsernameCharset,

    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("password must not contain whitespace")]
    PasswordWhitespace,

    #[error("password must contain {0}")]
    PasswordMissingClass(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown secret type: {0}")]
pub struct UnknownSecretType(pub String);

/// Failure to decode a decrypted payload back into content.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("malformed secret content: {0}")]
    Json(#[from] serde_json::Error),

    #[error("content is a {actual} secret, expected {expected}")]
    TypeMismatch {
        expected: crate::SecretType,
        actual: crate::SecretType,
    },
}
