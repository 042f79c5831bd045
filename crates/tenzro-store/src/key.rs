//! Key validation.
//!
//! Every key becomes a file name inside the store directory, so a valid key:
//! - Must be non-empty
//! - Must not contain `/`, `\` or NUL
//! - Must not be `.` or `..`

use crate::error::{StoreError, StoreResult};

/// Characters that are forbidden anywhere in a key.
const FORBIDDEN_CHARS: &[char] = &['/', '\\', '\0'];

/// Validate a key, returning `Ok(())` if it can be stored.
///
/// # Examples
///
/// ```
/// use tenzro_store::key::validate_key;
///
/// assert!(validate_key("tx_123").is_ok());
/// assert!(validate_key("").is_err());
/// assert!(validate_key("../escape").is_err());
/// ```
pub fn validate_key(key: &str) -> StoreResult<()> {
    if key.is_empty() {
        return Err(invalid(key, "key must not be empty"));
    }

    for ch in FORBIDDEN_CHARS {
        if key.contains(*ch) {
            return Err(invalid(key, format!("contains forbidden character: {ch:?}")));
        }
    }

    if key == "." || key == ".." {
        return Err(invalid(key, "must not be a relative path component"));
    }

    Ok(())
}

fn invalid(key: &str, reason: impl Into<String>) -> StoreError {
    StoreError::InvalidKey {
        key: key.to_string(),
        reason: reason.into(),
    }
}
