//
//  gitlab-client
//  error.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Error types for GitLab client operations.
//!
//! Every fallible operation in this crate returns [`Result`], whose error side
//! is the [`Error`] enum below. Errors fall into three groups:
//!
//! | Group | Variants | Raised by |
//! |-------|----------|-----------|
//! | Caller input | `InvalidArgument`, `MalformedUri` | [`GitlabClient`](crate::GitlabClient) |
//! | HTTP status | `ValidationFailed` .. `Api` | [`ErrorPlugin`](crate::http::ErrorPlugin) |
//! | Transport | `Network`, `Json` | reqwest / serde_json |
//!
//! Nothing is retried or recovered locally; errors surface at the call site.

use std::time::Duration;

use reqwest::header::RETRY_AFTER;
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::http::Response;

/// Unified error type for all GitLab client operations.
///
/// # Example
///
/// ```rust
/// use gitlab_client::{Error, GitlabClient};
///
/// let client = GitlabClient::new().expect("client");
/// match client.api("pull_requests") {
///     Err(Error::InvalidArgument(name)) => assert!(name.contains("pull_requests")),
///     _ => unreachable!(),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// An argument was not recognized, such as an unknown resource group name
    /// or authentication method.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A base URL could not be parsed into a usable URI.
    #[error("Malformed URI '{url}': {reason}")]
    MalformedUri {
        /// The offending input.
        url: String,
        /// Why the URI was rejected.
        reason: String,
    },

    /// The request was rejected as invalid (HTTP 400 or 422).
    #[error("Validation failed ({status}): {message}")]
    ValidationFailed {
        /// The HTTP status returned.
        status: StatusCode,
        /// The message extracted from the response body.
        message: String,
    },

    /// Credentials are missing or were rejected (HTTP 401).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The authenticated user may not perform this action (HTTP 403).
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// The requested resource does not exist or is hidden (HTTP 404).
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The API rate limit was exceeded (HTTP 429).
    #[error("Rate limit exceeded, retry after {retry_after:?}")]
    RateLimited {
        /// Delay advertised by the `Retry-After` header, if any.
        retry_after: Option<Duration>,
    },

    /// GitLab reported an internal failure (HTTP 5xx).
    #[error("Server error ({status}): {message}")]
    Server {
        /// The HTTP status returned.
        status: StatusCode,
        /// The message extracted from the response body.
        message: String,
    },

    /// Any other non-success status.
    #[error("GitLab API error ({status}): {message}")]
    Api {
        /// The HTTP status returned.
        status: StatusCode,
        /// The message extracted from the response body.
        message: String,
    },

    /// Connection, TLS, timeout or other transport failure.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A payload could not be encoded or a response could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates an [`Error::InvalidArgument`].
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Creates an [`Error::MalformedUri`].
    pub fn malformed_uri(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::MalformedUri {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Translates a non-success response into a typed error.
    ///
    /// The message is extracted from the GitLab error body where possible, see
    /// [`error_message`].
    pub fn from_response(response: &Response) -> Self {
        let status = response.status();
        let message = error_message(status, response.text());

        match status {
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                Self::ValidationFailed { status, message }
            }
            StatusCode::UNAUTHORIZED => Self::Unauthorized(message),
            StatusCode::FORBIDDEN => Self::Forbidden(message),
            StatusCode::NOT_FOUND => Self::NotFound(message),
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimited {
                retry_after: response
                    .headers()
                    .get(RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.trim().parse::<u64>().ok())
                    .map(Duration::from_secs),
            },
            s if s.is_server_error() => Self::Server { status, message },
            _ => Self::Api { status, message },
        }
    }

    /// Returns the HTTP status behind this error, if it came from a response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::ValidationFailed { status, .. }
            | Self::Server { status, .. }
            | Self::Api { status, .. } => Some(*status),
            Self::Unauthorized(_) => Some(StatusCode::UNAUTHORIZED),
            Self::Forbidden(_) => Some(StatusCode::FORBIDDEN),
            Self::NotFound(_) => Some(StatusCode::NOT_FOUND),
            Self::RateLimited { .. } => Some(StatusCode::TOO_MANY_REQUESTS),
            Self::Network(e) => e.status(),
            _ => None,
        }
    }

    /// Checks whether repeating the same call later could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(e) => e.is_timeout() || e.is_connect(),
            Self::RateLimited { .. } | Self::Server { .. } => true,
            _ => false,
        }
    }
}

/// Extracts a human readable message from a GitLab error body.
///
/// GitLab answers errors in a few shapes:
///
/// ```json
/// {"message": "404 Project Not Found"}
/// {"message": {"name": ["has already been taken"], "path": ["is invalid"]}}
/// {"error": "invalid_token", "error_description": "Token was revoked"}
/// {"error": "title is missing"}
/// ```
///
/// Field maps are flattened to `name: has already been taken; path: is invalid`.
/// Anything unrecognized falls back to the raw body, or the status reason when
/// the body is empty.
pub fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        match json.get("message") {
            Some(Value::String(message)) => return message.clone(),
            Some(Value::Object(fields)) => {
                let parts: Vec<String> = fields
                    .iter()
                    .map(|(field, errors)| format!("{}: {}", field, join_values(errors)))
                    .collect();
                return parts.join("; ");
            }
            Some(Value::Array(items)) => return join_values(&Value::Array(items.clone())),
            _ => {}
        }

        if let Some(error) = json.get("error").and_then(Value::as_str) {
            return match json.get("error_description").and_then(Value::as_str) {
                Some(description) => format!("{}: {}", error, description),
                None => error.to_string(),
            };
        }
    }

    if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    } else {
        body.to_string()
    }
}

fn join_values(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(join_values)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_message() {
        let msg = error_message(StatusCode::NOT_FOUND, r#"{"message":"404 Project Not Found"}"#);
        assert_eq!(msg, "404 Project Not Found");
    }

    #[test]
    fn test_field_errors_are_flattened() {
        let body = r#"{"message":{"name":["has already been taken"],"path":["is invalid","is too short"]}}"#;
        let msg = error_message(StatusCode::BAD_REQUEST, body);
        assert_eq!(msg, "name: has already been taken; path: is invalid, is too short");
    }

    #[test]
    fn test_oauth_style_error() {
        let body = r#"{"error":"invalid_token","error_description":"Token was revoked"}"#;
        let msg = error_message(StatusCode::UNAUTHORIZED, body);
        assert_eq!(msg, "invalid_token: Token was revoked");
    }

    #[test]
    fn test_fallbacks() {
        assert_eq!(error_message(StatusCode::BAD_GATEWAY, "upstream down"), "upstream down");
        assert_eq!(error_message(StatusCode::BAD_GATEWAY, ""), "Bad Gateway");
    }

    #[test]
    fn test_retryable_errors() {
        assert!(Error::RateLimited { retry_after: None }.is_retryable());
        assert!(!Error::Unauthorized("nope".into()).is_retryable());
        assert!(!Error::invalid_argument("x").is_retryable());
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(Error::NotFound("x".into()).status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(Error::invalid_argument("x").status(), None);
    }
}
