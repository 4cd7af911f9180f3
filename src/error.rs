// src/error.rs
//! Application error types with structured error handling.
//!
//! Error types form the vocabulary for failure modes in the system:
//! malformed query text, statements missing arguments, remote API
//! refusals, unreachable hosts, and logical absence of a page, space
//! or label.

use crate::credentials::CredentialError;
use crate::query::ParseError;
use std::fmt;
use thiserror::Error;

/// Confluence API failure classes as a typed vocabulary.
///
/// Both API dialects report errors in differently shaped JSON bodies, but
/// they agree on the HTTP status. The status is what drives recovery, so
/// the vocabulary is derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCode {
    /// 401: token is invalid or expired
    Unauthorized,
    /// 403: token lacks permission for this resource
    Forbidden,
    /// 404: the requested object does not exist or is inaccessible
    NotFound,
    /// 409: stale version number or other state conflict
    Conflict,
    /// 429: rate limit exceeded, back off and retry
    RateLimited,
    /// 5xx: server-side failure
    ServerError(u16),
    /// Any other non-2xx status
    HttpStatus(u16),
}

impl ApiErrorCode {
    /// Classify an HTTP status code.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            409 => Self::Conflict,
            429 => Self::RateLimited,
            s if s >= 500 => Self::ServerError(s),
            s => Self::HttpStatus(s),
        }
    }

    /// Whether this error is transient and worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited | Self::ServerError(_))
    }

    /// Whether this error means the resource simply doesn't exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

impl fmt::Display for ApiErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::Forbidden => write!(f, "forbidden"),
            Self::NotFound => write!(f, "not_found"),
            Self::Conflict => write!(f, "conflict"),
            Self::RateLimited => write!(f, "rate_limited"),
            Self::ServerError(code) => write!(f, "server_error_{}", code),
            Self::HttpStatus(code) => write!(f, "http_{}", code),
        }
    }
}

/// A non-2xx response, synthesized from either dialect's error body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Confluence API returned an error ({status_code}): {message}")]
pub struct ApiError {
    pub status_code: u16,
    pub code: ApiErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code,
            code: ApiErrorCode::from_http_status(status_code),
            message: message.into(),
        }
    }
}

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Usage error: {0}")]
    Usage(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("{message}\n\nHint: could not reach {base_url}; check your network connection or corporate VPN")]
    Network { message: String, base_url: String },

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0} operation not yet implemented")]
    NotImplemented(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("{operation} (statement {index}): {source}")]
    Statement {
        index: usize,
        operation: String,
        #[source]
        source: Box<AppError>,
    },

    #[error("Failed to read config file {path}: {source}")]
    ConfigFile {
        path: std::path::PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Credentials(#[from] CredentialError),

    #[error(transparent)]
    Validation(#[from] crate::types::ValidationError),
}

impl AppError {
    /// Whether the transport should retry the request that produced this error.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Api(api) => api.code.is_retryable(),
            _ => false,
        }
    }

    /// Whether this error reports logical absence rather than a failure to ask.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::Api(api) => api.code.is_not_found(),
            Self::Statement { source, .. } => source.is_not_found(),
            _ => false,
        }
    }

    /// HTTP status of the underlying API error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api(api) => Some(api.status_code),
            Self::Statement { source, .. } => source.status_code(),
            _ => None,
        }
    }

    /// Attach statement context to an error raised while executing it.
    pub fn in_statement(self, index: usize, operation: &str) -> Self {
        Self::Statement {
            index,
            operation: operation.to_string(),
            source: Box::new(self),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}

/// Result type alias for convenience
pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_status_codes() {
        assert_eq!(ApiErrorCode::from_http_status(429), ApiErrorCode::RateLimited);
        assert_eq!(ApiErrorCode::from_http_status(404), ApiErrorCode::NotFound);
        assert_eq!(
            ApiErrorCode::from_http_status(503),
            ApiErrorCode::ServerError(503)
        );
        assert_eq!(
            ApiErrorCode::from_http_status(418),
            ApiErrorCode::HttpStatus(418)
        );
    }

    #[test]
    fn only_rate_limits_and_server_errors_retry() {
        assert!(AppError::Api(ApiError::new(429, "slow down")).is_retryable());
        assert!(AppError::Api(ApiError::new(500, "boom")).is_retryable());
        assert!(AppError::Api(ApiError::new(502, "bad gateway")).is_retryable());
        assert!(!AppError::Api(ApiError::new(400, "bad request")).is_retryable());
        assert!(!AppError::Api(ApiError::new(404, "missing")).is_retryable());
        assert!(!AppError::Network {
            message: "connection refused".into(),
            base_url: "https://x".into()
        }
        .is_retryable());
    }

    #[test]
    fn statement_context_prefixes_message() {
        let err = AppError::Usage("get requires a page ID or space+title args".into())
            .in_statement(2, "get");
        assert_eq!(
            err.to_string(),
            "get (statement 2): Usage error: get requires a page ID or space+title args"
        );
    }

    #[test]
    fn not_found_survives_statement_wrapping() {
        let err = AppError::Api(ApiError::new(404, "Page not found")).in_statement(1, "get");
        assert!(err.is_not_found());
        assert_eq!(err.status_code(), Some(404));
    }

    #[test]
    fn network_error_carries_hint() {
        let err = AppError::Network {
            message: "request failed: connection refused".into(),
            base_url: "https://confluence.acme.internal".into(),
        };
        let text = err.to_string();
        assert!(text.contains("Hint: could not reach https://confluence.acme.internal"));
    }
}
