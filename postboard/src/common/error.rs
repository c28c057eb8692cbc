//! エラー型定義
//!
//! 統一エラー型（thiserror使用）
//!
//! `BoardError`は`external_message()`と`status_code()`を提供し、
//! 内部詳細を漏らさないHTTPエラーレスポンスを生成できます。

use axum::http::StatusCode;
use thiserror::Error;

/// postboard error type
#[derive(Debug, Error)]
pub enum BoardError {
    /// Validation error (全ての違反ルールを保持)
    #[error("Validation error: {}", .0.join(", "))]
    Validation(Vec<String>),

    /// Resource not found
    #[error("{0}")]
    NotFound(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BoardError {
    /// 単一ルール違反のValidationエラーを生成
    pub fn invalid(rule: impl Into<String>) -> Self {
        Self::Validation(vec![rule.into()])
    }

    /// Returns a safe error message for external clients.
    ///
    /// Validation and not-found messages are part of the API contract and are
    /// returned as-is. Everything else collapses to a generic message; the full
    /// error (`to_string()`) belongs in server logs only.
    pub fn external_message(&self) -> String {
        match self {
            Self::Validation(_) => "Validation error".to_string(),
            Self::NotFound(message) => message.clone(),
            Self::Database(_) | Self::Serialization(_) | Self::Internal(_) => {
                "Internal server error".to_string()
            }
        }
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(_) | Self::Serialization(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Validationエラーの違反ルール一覧（それ以外は空）
    pub fn details(&self) -> &[String] {
        match self {
            Self::Validation(rules) => rules,
            _ => &[],
        }
    }
}

/// postboard共通のResult型
pub type BoardResult<T> = Result<T, BoardError>;
