//! Error types for the session layer.
//!
//! # Design
//! One enum covers the whole client side: HTTP failures keep the raw status
//! and payload for debugging, transport failures carry the underlying cause,
//! and local guard failures get their own variant so callers can distinguish
//! "the server said no" from "we never asked". The `Display` output is the
//! human-facing message that the boundary services surface to consumers, so
//! variants format without any debug prefix.

use serde_json::Value;
use thiserror::Error;

/// Fixed message for any 401 response, regardless of what the server put in
/// the body.
pub const AUTH_FAILED_MESSAGE: &str = "Authentication failed. Please login again.";

/// Fixed message for the local missing-token guard.
pub const AUTH_REQUIRED_MESSAGE: &str = "Authentication required. Please login again.";

/// Errors surfaced by the HTTP clients and the services built on them.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server responded with a non-2xx status. `message` prefers the
    /// body's `message` field, then a plain-text body, then the status text;
    /// a 401 always carries [`AUTH_FAILED_MESSAGE`].
    #[error("{message}")]
    Http {
        status: u16,
        message: String,
        payload: Option<Value>,
    },

    /// No response was received at all; wraps the transport cause.
    #[error("Network error: {0}")]
    Network(String),

    /// A local precondition failed: an authenticated call was attempted with
    /// no stored token. The network is never touched.
    #[error("{}", AUTH_REQUIRED_MESSAGE)]
    AuthRequired,

    /// The response decoded as JSON but did not match the documented
    /// envelope schema.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The request payload could not be encoded as JSON.
    #[error("Request serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// True for failures that mean the stored token is missing, invalid or
    /// expired. The collection controller evicts the token when a fetch
    /// fails this way.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ApiError::Http { status: 401, .. } | ApiError::AuthRequired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_bare_message() {
        let err = ApiError::Http {
            status: 404,
            message: "Todo not found".to_string(),
            payload: None,
        };
        assert_eq!(err.to_string(), "Todo not found");
    }

    #[test]
    fn network_display_names_the_cause() {
        let err = ApiError::Network("connection refused".to_string());
        assert_eq!(err.to_string(), "Network error: connection refused");
    }

    #[test]
    fn auth_required_displays_fixed_message() {
        assert_eq!(ApiError::AuthRequired.to_string(), AUTH_REQUIRED_MESSAGE);
    }

    #[test]
    fn auth_failure_covers_401_and_missing_token() {
        let unauthorized = ApiError::Http {
            status: 401,
            message: AUTH_FAILED_MESSAGE.to_string(),
            payload: None,
        };
        assert!(unauthorized.is_auth_failure());
        assert!(ApiError::AuthRequired.is_auth_failure());

        let not_found = ApiError::Http {
            status: 404,
            message: "Todo not found".to_string(),
            payload: None,
        };
        assert!(!not_found.is_auth_failure());
        assert!(!ApiError::Network("timeout".to_string()).is_auth_failure());
    }
}
