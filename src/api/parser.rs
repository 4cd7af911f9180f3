// src/api/parser.rs
//! Response decoding and error synthesis.
//!
//! Successful bodies are decoded into the wire shapes of
//! [`super::responses`]; failed bodies are turned into an [`ApiError`]
//! regardless of which dialect produced them.

use crate::constants::ERROR_BODY_PREVIEW_LENGTH;
use crate::error::{ApiError, AppError};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Decode a successful response body.
pub fn parse_body<T>(body: &[u8], url: &str) -> Result<T, AppError>
where
    T: DeserializeOwned,
{
    serde_json::from_slice(body).map_err(|e| {
        log::error!("Failed to parse response from {}: {}", url, e);
        AppError::MalformedResponse(format!("{} (body: {})", e, preview(body)))
    })
}

/// Error body shapes seen across both dialects.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    errors: Vec<ErrorEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorEntry {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        let non_empty = |s: Option<String>| s.filter(|m| !m.trim().is_empty());

        non_empty(self.message)
            .or_else(|| non_empty(self.error_message))
            .or_else(|| {
                let first = self.errors.into_iter().next()?;
                match (non_empty(first.title), non_empty(first.detail)) {
                    (Some(title), Some(detail)) => Some(format!("{}: {}", title, detail)),
                    (Some(only), None) | (None, Some(only)) => Some(only),
                    (None, None) => None,
                }
            })
    }
}

/// Build an [`ApiError`] from a non-2xx status and its body.
pub fn parse_api_error(status: u16, body: &[u8]) -> ApiError {
    if body.iter().all(u8::is_ascii_whitespace) {
        return ApiError::new(status, format!("HTTP {}", status));
    }

    match serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(ErrorBody::into_message)
    {
        Some(message) => ApiError::new(status, message),
        None => ApiError::new(status, format!("HTTP {}: {}", status, preview(body))),
    }
}

fn preview(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.chars().count() > ERROR_BODY_PREVIEW_LENGTH {
        let cut: String = text.chars().take(ERROR_BODY_PREVIEW_LENGTH).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiErrorCode;

    #[test]
    fn reads_message_shape() {
        let err = parse_api_error(404, br#"{"statusCode":404,"message":"No content found with id: 1"}"#);
        assert_eq!(err.status_code, 404);
        assert_eq!(err.code, ApiErrorCode::NotFound);
        assert_eq!(err.message, "No content found with id: 1");
    }

    #[test]
    fn reads_error_message_shape() {
        let err = parse_api_error(400, br#"{"errorMessage":"Could not parse cql"}"#);
        assert_eq!(err.message, "Could not parse cql");
    }

    #[test]
    fn reads_errors_array_shape() {
        let body = br#"{"errors":[{"status":401,"code":"UNAUTHORIZED","title":"Unauthorized","detail":"Token expired"}]}"#;
        let err = parse_api_error(401, body);
        assert_eq!(err.message, "Unauthorized: Token expired");
        assert_eq!(err.code, ApiErrorCode::Unauthorized);
    }

    #[test]
    fn falls_back_to_status_and_preview() {
        let err = parse_api_error(502, b"<html>Bad Gateway</html>");
        assert_eq!(err.message, "HTTP 502: <html>Bad Gateway</html>");

        let err = parse_api_error(503, b"");
        assert_eq!(err.message, "HTTP 503");
    }

    #[test]
    fn long_bodies_are_truncated() {
        let body = "x".repeat(500);
        let err = parse_api_error(500, body.as_bytes());
        assert_eq!(err.message.len(), "HTTP 500: ".len() + 200 + 3);
    }

    #[test]
    fn malformed_success_body_is_reported() {
        let result: Result<serde_json::Value, _> = parse_body(b"not json", "https://x/api/v2/pages/1");
        assert!(matches!(result, Err(AppError::MalformedResponse(_))));
    }
}
