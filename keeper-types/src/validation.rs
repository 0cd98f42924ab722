//! Input checks applied before a secret is encrypted.
//!
//! Each validator is independent and side-effect free.

use crate::error::{ValidationError, ValidationResult};

pub const CARD_NUMBER_MIN_DIGITS: usize = 12;
pub const CARD_NUMBER_MAX_DIGITS: usize = 19;
pub const CVV_DIGITS: usize = 3;
pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 32;
pub const PASSWORD_MIN_LEN: usize = 8;

/// Digits only, sane length, valid Luhn check digit.
pub fn validate_card_number(number: &str) -> ValidationResult {
    if !number.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::CardNumberCharset);
    }
    let len = number.len();
    if !(CARD_NUMBER_MIN_DIGITS..=CARD_NUMBER_MAX_DIGITS).contains(&len) {
        return Err(ValidationError::CardNumberLength {
            min: CARD_NUMBER_MIN_DIGITS,
            max: CARD_NUMBER_MAX_DIGITS,
            actual: len,
        });
    }
    if !luhn_valid(number) {
        return Err(ValidationError::CardNumberChecksum);
    }
    Ok(())
}

/// Luhn mod-10 over an all-digit string.
fn luhn_valid(digits: &str) -> bool {
    let sum: u32 = digits
        .bytes()
        .rev()
        .map(|b| u32::from(b - b'0'))
        .enumerate()
        .map(|(i, d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();
    sum % 10 == 0
}

pub fn validate_cvv(cvv: &str) -> ValidationResult {
    if cvv.len() != CVV_DIGITS || !cvv.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::Cvv {
            expected: CVV_DIGITS,
        });
    }
    Ok(())
}

/// `MM/YY` with a month between 01 and 12.
pub fn validate_expiry(expiry: &str) -> ValidationResult {
    let bytes = expiry.as_bytes();
    let shaped = bytes.len() == 5
        && bytes[2] == b'/'
        && bytes[..2].iter().chain(&bytes[3..]).all(u8::is_ascii_digit);
    if !shaped {
        return Err(ValidationError::Expiry);
    }
    let month = (bytes[0] - b'0') * 10 + (bytes[1] - b'0');
    if !(1..=12).contains(&month) {
        return Err(ValidationError::Expiry);
    }
    Ok(())
}

pub fn validate_username(username: &str) -> ValidationResult {
    let len = username.chars().count();
    if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
        return Err(ValidationError::UsernameLength {
            min: USERNAME_MIN_LEN,
            max: USERNAME_MAX_LEN,
            actual: len,
        });
    }
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-');
    if !username.chars().all(allowed) {
        return Err(ValidationError::UsernameCharset);
    }
    Ok(())
}

/// Minimum length plus one each of lowercase, uppercase, digit and symbol.
pub fn validate_password(password: &str) -> ValidationResult {
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(ValidationError::PasswordTooShort {
            min: PASSWORD_MIN_LEN,
        });
    }
    if password.chars().any(char::is_whitespace) {
        return Err(ValidationError::PasswordWhitespace);
    }

    let classes: [(&'static str, fn(char) -> bool); 4] = [
        ("a lowercase letter", |c| c.is_lowercase()),
        ("an uppercase letter", |c| c.is_uppercase()),
        ("a digit", |c| c.is_ascii_digit()),
        ("a symbol", |c| !c.is_alphanumeric()),
    ];
    for (name, test) in classes {
        if !password.chars().any(test) {
            return Err(ValidationError::PasswordMissingClass(name));
        }
    }
    Ok(())
}
