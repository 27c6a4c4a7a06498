//! Tagged error contract
//!
//! Every gateway operation fails with a plain, serializable `{code, message}`
//! pair. The original platform exception never crosses the gateway boundary;
//! callers branch on the code, never on a concrete error type.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Uniform gateway failure: a machine-readable code plus a human message.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{code}: {message}")]
pub struct GatewayError {
    pub code: String,
    pub message: String,
}

pub type GatewayResult<T> = Result<T, GatewayError>;

impl GatewayError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Tag a store operation failure: `add-document` becomes
    /// `add-document-error`, `fetch-collection` becomes
    /// `fetch-collection-error`.
    pub fn store(op: &str, message: impl Into<String>) -> Self {
        Self::new(format!("{op}-error"), message)
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::new("auth-error", message)
    }

    pub fn upload(message: impl Into<String>) -> Self {
        Self::new("upload-error", message)
    }

    pub fn mail(message: impl Into<String>) -> Self {
        Self::new("mail-error", message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new("config-error", message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_code_shape() {
        let err = GatewayError::store("fetch-collection", "boom");
        assert_eq!(err.code, "fetch-collection-error");
        assert_eq!(err.message, "boom");

        let err = GatewayError::store("add-document", "nope");
        assert_eq!(err.code, "add-document-error");
    }

    #[test]
    fn test_error_serializes_as_plain_pair() {
        let err = GatewayError::auth("Invalid credentials");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "code": "auth-error", "message": "Invalid credentials" })
        );
    }
}
