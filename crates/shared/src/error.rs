use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identity-provider failures.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("identity provider unreachable: {0}")]
    Network(String),
    #[error("identity provider error: {0}")]
    Provider(String),
}

/// Document-store failures.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("permission denied")]
    PermissionDenied,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Notification dispatch failures. A missing configured recipient surfaces
/// here rather than as a startup error: the report is already durable by the
/// time the recipient is needed.
#[derive(Debug, Clone, Error)]
pub enum NotificationError {
    #[error("notification transport failure: {0}")]
    Transport(String),
    #[error("no notification recipient configured")]
    MissingRecipient,
}

/// Missing required configuration, fatal at startup.
#[derive(Debug, Clone, Error)]
#[error("missing required configuration value '{0}'")]
pub struct ConfigError(pub &'static str);

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Unauthorized,
    Validation,
    Upstream,
    Internal,
}

/// Wire-level error body for the relay server's HTTP surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}
