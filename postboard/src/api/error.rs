//! APIエラーレスポンス型
//!
//! axum用の共通エラーハンドリング

use crate::common::error::BoardError;
use axum::{response::IntoResponse, Json};
use serde_json::json;

/// Axum用のエラーレスポンス型（投稿API）
///
/// 400は`{error, details}`、それ以外は`{error}`を返す。
#[derive(Debug)]
pub struct AppError(pub BoardError);

impl From<BoardError> for AppError {
    fn from(err: BoardError) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.0.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        }

        // Use external_message() to avoid exposing internal details
        let payload = match &self.0 {
            BoardError::Validation(rules) => json!({
                "error": self.0.external_message(),
                "details": rules,
            }),
            _ => json!({
                "error": self.0.external_message(),
            }),
        };

        (status, Json(payload)).into_response()
    }
}

/// 監査ログAPI用のエラーレスポンス型
///
/// `{success: false, error}`形式で返す。
#[derive(Debug)]
pub struct AuditApiError(pub BoardError);

impl From<BoardError> for AuditApiError {
    fn from(err: BoardError) -> Self {
        AuditApiError(err)
    }
}

impl IntoResponse for AuditApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.0.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Audit request failed");
        }

        let mut payload = json!({
            "success": false,
            "error": self.0.external_message(),
        });
        if let BoardError::Validation(rules) = &self.0 {
            payload["details"] = json!(rules);
        }

        (status, Json(payload)).into_response()
    }
}
