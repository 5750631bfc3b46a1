//! Common validation rules shared across request payloads.

use validator::ValidationError;

/// Validates username format.
///
/// Requirements:
/// - 1-150 characters in length
/// - Letters, digits and `_ . @ + -` only
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.trim().is_empty() || username.chars().count() > 150 {
        return Err(ValidationError::new("username_invalid_length"));
    }

    if !username
        .trim()
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '@' | '+' | '-'))
    {
        return Err(ValidationError::new("username_invalid_characters"));
    }

    Ok(())
}

/// Rejects values that are empty once surrounding whitespace is trimmed.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Validates a contact phone number: at most 15 characters of digits,
/// spaces, `+`, `-`, `(` and `)`, with at least one digit.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let phone = phone.trim();
    if phone.is_empty() || phone.chars().count() > 15 {
        return Err(ValidationError::new("phone_invalid_length"));
    }

    if !phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')'))
        || !phone.chars().any(|c| c.is_ascii_digit())
    {
        return Err(ValidationError::new("phone_invalid_characters"));
    }

    Ok(())
}
