//! エラー型定義
//!
//! 統一エラー型（thiserror使用）
//!
//! `RelayError`は`status_code()`と`external_message()`を提供し、
//! `/audit`のエラーレスポンスを組み立てるために使われます。

use axum::http::StatusCode;
use thiserror::Error;

/// Common layer error type
#[derive(Debug, Error)]
pub enum CommonError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

/// relay error type
#[derive(Debug, Error)]
pub enum RelayError {
    /// Common layer error
    #[error(transparent)]
    Common(#[from] CommonError),

    /// `x-auth-token` が欠落、または共有シークレットと不一致
    #[error("Unauthorized")]
    Unauthorized,

    /// HTTP client error
    #[error("HTTP client error: {0}")]
    Http(String),

    /// Timeout error
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RelayError {
    /// Returns the message sent back to the caller.
    ///
    /// Unlike a hardened public gateway, this relay is a developer-facing tool,
    /// so server-side failures expose their underlying message text.
    pub fn external_message(&self) -> String {
        match self {
            Self::Unauthorized => "Unauthorized".to_string(),
            Self::Common(CommonError::Validation(msg)) => msg.clone(),
            Self::Common(err) => err.to_string(),
            Self::Http(msg) | Self::Timeout(msg) | Self::Internal(msg) => msg.clone(),
        }
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Common(CommonError::Validation(_)) => StatusCode::BAD_REQUEST,
            Self::Common(_) => StatusCode::INTERNAL_SERVER_ERROR,
            // 上流の失敗はすべて汎用の内部エラーとして扱う
            Self::Http(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Timeout(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Result type alias
pub type RelayResult<T> = Result<T, RelayError>;
