//! Error types for the Cryptopay client library.

use reqwest::StatusCode;
use thiserror::Error;

/// The main error type for all Cryptopay client operations.
#[derive(Error, Debug)]
pub enum CryptopayError {
    /// Client configuration is invalid (missing credentials, bad base URL)
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP request with middleware failed
    #[error("HTTP request failed: {0}")]
    HttpMiddleware(#[from] reqwest_middleware::Error),

    /// Non-2xx response without a structured error body
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// Response status code
        status: StatusCode,
        /// Raw response body
        body: String,
    },

    /// Request signing failed
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Cryptopay API returned a structured error
    #[error("Cryptopay API error: {0}")]
    Api(ApiError),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    /// Invalid response from the API
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl CryptopayError {
    /// The structured server error, if this is one.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            CryptopayError::Api(api_error) => Some(api_error),
            _ => None,
        }
    }

    /// HTTP status of the failed response, when the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            CryptopayError::Api(api_error) => Some(api_error.status),
            CryptopayError::HttpStatus { status, .. } => Some(*status),
            CryptopayError::Http(e) => e.status(),
            CryptopayError::HttpMiddleware(e) => e.status(),
            _ => None,
        }
    }

    /// Whether the error was raised before any request left the client.
    pub fn is_config(&self) -> bool {
        matches!(self, CryptopayError::Config(_))
    }
}

/// Error payload returned by the Cryptopay API.
///
/// The server wraps failures as `{ "error": { "message": ..., ... } }`. The
/// whole `error` object is kept in [`ApiError::payload`] so callers can read
/// fields this type does not model.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    /// HTTP status of the response
    pub status: StatusCode,
    /// Human-readable error message
    pub message: String,
    /// Machine-readable error code, when the server sends one
    pub code: Option<String>,
    /// The raw `error` object
    pub payload: serde_json::Value,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{} ({}): {}", self.status, code, self.message),
            None => write!(f, "{}: {}", self.status, self.message),
        }
    }
}

impl ApiError {
    /// Build an API error from the `error` object of a response body.
    ///
    /// Returns `None` when `payload` is not a JSON object.
    pub fn from_payload(status: StatusCode, payload: serde_json::Value) -> Option<Self> {
        let object = payload.as_object()?;
        let message = object
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or_default()
            .to_string();
        let code = object.get("code").and_then(|c| match c {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        });

        Some(Self {
            status,
            message,
            code,
            payload,
        })
    }

    /// Look up a server-provided field of the error object.
    pub fn field(&self, name: &str) -> Option<&serde_json::Value> {
        self.payload.get(name)
    }

    /// Check if the server rejected the request itself (4xx).
    pub fn is_client_error(&self) -> bool {
        self.status.is_client_error()
    }

    /// Check if the server failed to handle the request (5xx).
    pub fn is_server_error(&self) -> bool {
        self.status.is_server_error()
    }

    /// Check if the credentials or signature were rejected.
    pub fn is_unauthorized(&self) -> bool {
        self.status == StatusCode::UNAUTHORIZED
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_api_error_from_payload() {
        let payload = json!({ "message": "invalid currency", "code": "invalid_currency" });
        let error = ApiError::from_payload(StatusCode::UNPROCESSABLE_ENTITY, payload).unwrap();
        assert_eq!(error.message, "invalid currency");
        assert_eq!(error.code.as_deref(), Some("invalid_currency"));
        assert!(error.is_client_error());
        assert!(!error.is_server_error());
        assert_eq!(error.field("code"), Some(&json!("invalid_currency")));
    }

    #[test]
    fn test_api_error_without_message() {
        let error = ApiError::from_payload(StatusCode::BAD_REQUEST, json!({ "param": "x" })).unwrap();
        assert_eq!(error.message, "");
        assert!(error.code.is_none());
        assert_eq!(error.field("param"), Some(&json!("x")));
    }

    #[test]
    fn test_api_error_rejects_non_object() {
        assert!(ApiError::from_payload(StatusCode::BAD_REQUEST, json!("oops")).is_none());
        assert!(ApiError::from_payload(StatusCode::BAD_REQUEST, json!(null)).is_none());
    }

    #[test]
    fn test_api_error_display() {
        let error = ApiError::from_payload(
            StatusCode::UNAUTHORIZED,
            json!({ "message": "Unauthorized", "code": 401 }),
        )
        .unwrap();
        assert!(error.is_unauthorized());
        assert_eq!(error.to_string(), "401 Unauthorized (401): Unauthorized");
    }

    #[test]
    fn test_error_status_accessor() {
        let err = CryptopayError::HttpStatus {
            status: StatusCode::BAD_GATEWAY,
            body: "<html>".to_string(),
        };
        assert_eq!(err.status(), Some(StatusCode::BAD_GATEWAY));
        assert!(err.api_error().is_none());
        assert!(CryptopayError::Config("missing".into()).is_config());
    }
}
