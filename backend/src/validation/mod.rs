//! Request payload validation.
//!
//! Payload structs derive [`Validate`]; handlers call [`validate_payload`]
//! so every endpoint reports failures with the same error envelope.

pub mod rules;

pub use validator::Validate;

use crate::error::AppError;

pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload.validate().map_err(AppError::from)
}

/// Trims an optional string, turning blank input into `None`.
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
