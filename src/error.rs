use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// The single error type every client call fails with.
///
/// Callers branch on [`ApiError::code`] rather than on the variant when they
/// only care about the uniform `{code, message, statusCode}` shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Non-success status with an error envelope in the body.
    #[error("{message}")]
    Remote {
        code: String,
        message: String,
        status_code: u16,
    },
    /// Non-success status with an empty or unparseable body.
    #[error("HTTP {status_code}")]
    Http { status_code: u16 },
    #[error("Request timed out")]
    Timeout,
    #[error("Network request failed")]
    Network,
    #[error("Request cancelled")]
    Cancelled,
    /// Success status, but the body does not have the expected shape.
    #[error("Invalid response: {message}")]
    InvalidResponse { message: String, status_code: u16 },
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// Serializable view of an [`ApiError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDescriptor {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

impl ApiError {
    pub fn code(&self) -> &str {
        match self {
            ApiError::Remote { code, .. } => code,
            ApiError::Http { .. } => "http_error",
            ApiError::Timeout => "timeout",
            ApiError::Network => "network_error",
            ApiError::Cancelled => "cancelled",
            ApiError::InvalidResponse { .. } => "invalid_response",
            ApiError::Serialization(_) => "serialization_error",
            ApiError::Config(_) => "config_error",
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::Remote { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Remote { status_code, .. }
            | ApiError::Http { status_code }
            | ApiError::InvalidResponse { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Timeout)
    }

    pub fn descriptor(&self) -> ErrorDescriptor {
        ErrorDescriptor {
            code: self.code().to_string(),
            message: self.message(),
            status_code: self.status_code(),
        }
    }

    /// Builds the error for a non-success response from its raw body.
    ///
    /// Recognises `{"error": {"code", "message"}}` and the image backend's
    /// `{"detail": {"error", "message"}}` / `{"detail": "..."}`. Missing pieces
    /// fall back to `http_error` and `HTTP <status>`.
    pub fn from_error_body(status_code: u16, body: &[u8]) -> Self {
        let parsed: Value = serde_json::from_slice(body).unwrap_or(Value::Null);

        let (code, message) = match (parsed.get("error"), parsed.get("detail")) {
            (Some(Value::Object(error)), _) => (
                error.get("code").and_then(Value::as_str),
                error.get("message").and_then(Value::as_str),
            ),
            (_, Some(Value::Object(detail))) => (
                detail.get("error").and_then(Value::as_str),
                detail.get("message").and_then(Value::as_str),
            ),
            (_, Some(Value::String(detail))) => (None, Some(detail.as_str())),
            _ => (None, None),
        };

        if code.is_none() && message.is_none() {
            return ApiError::Http { status_code };
        }

        ApiError::Remote {
            code: code.unwrap_or("http_error").to_string(),
            message: message
                .map(String::from)
                .unwrap_or_else(|| format!("HTTP {}", status_code)),
            status_code,
        }
    }
}
