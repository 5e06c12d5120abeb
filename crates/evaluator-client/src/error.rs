//! Error types for evaluator-client

use thiserror::Error;

use crate::types::ApiErrorBody;

/// Errors that can occur talking to the evaluator backend
#[derive(Error, Debug)]
pub enum ClientError {
    /// The request never produced a response (DNS, connect, TLS, timeout)
    #[error("backend unreachable at {url}: {reason}")]
    Unreachable { url: String, reason: String },

    /// The backend answered with a non-2xx status
    #[error("HTTP {status}{}", .body.summary().map(|s| format!(": {s}")).unwrap_or_default())]
    Http { status: u16, body: ApiErrorBody },

    /// A 2xx response whose body could not be decoded
    #[error("invalid response body: {0}")]
    Decode(String),

    /// Configured base URL is unusable
    #[error("invalid API URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// HTTP client construction failed
    #[error("failed to build HTTP client: {0}")]
    Build(String),
}

impl ClientError {
    /// True when the backend could not be reached at all.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, ClientError::Unreachable { .. })
    }

    /// Error body of an HTTP failure, if any.
    pub fn body(&self) -> Option<&ApiErrorBody> {
        match self {
            ClientError::Http { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Result type for evaluator-client operations
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_display_includes_detail() {
        let err = ClientError::Http {
            status: 422,
            body: ApiErrorBody {
                detail: Some("bad rubric".to_string()),
                message: None,
            },
        };
        assert_eq!(err.to_string(), "HTTP 422: bad rubric");

        let bare = ClientError::Http {
            status: 500,
            body: ApiErrorBody::default(),
        };
        assert_eq!(bare.to_string(), "HTTP 500");
    }

    #[test]
    fn test_unreachable_predicate() {
        let err = ClientError::Unreachable {
            url: "http://x".to_string(),
            reason: "connection refused".to_string(),
        };
        assert!(err.is_unreachable());
        assert!(err.body().is_none());
    }
}
