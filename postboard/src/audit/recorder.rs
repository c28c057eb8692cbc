//! ベストエフォートの監査記録
//!
//! 記録の失敗は呼び出し元に伝播させず、`tracing::warn!`で出力して`AuditOutcome::Dropped`を返す。

use crate::audit::service::AuditService;
use crate::audit::types::{AuditAction, AuditContext, AuditLevel, AuditResource, NewAuditLog};
use serde_json::Value;

/// 記録結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditOutcome {
    /// 記録済み（監査ログID）
    Recorded(String),
    /// 記録に失敗し破棄された
    Dropped,
}

/// 監査ログの記録係
#[derive(Clone)]
pub struct AuditRecorder {
    service: AuditService,
}

impl AuditRecorder {
    /// 新しいAuditRecorderを作成
    pub fn new(service: AuditService) -> Self {
        Self { service }
    }

    /// 1件記録する。失敗しても呼び出し元には伝播しない
    pub async fn record(&self, data: NewAuditLog) -> AuditOutcome {
        let action = data.action;
        let resource = data.resource;
        match self.service.append(data).await {
            Ok(log) => AuditOutcome::Recorded(log.id),
            Err(e) => {
                tracing::warn!(
                    action = %action,
                    resource = %resource,
                    error = %e,
                    "Failed to record audit log"
                );
                AuditOutcome::Dropped
            }
        }
    }

    /// 投稿作成を記録
    pub async fn post_created(
        &self,
        post_id: &str,
        post_name: &str,
        context: &AuditContext,
    ) -> AuditOutcome {
        self.post_event(AuditAction::Create, "Post created", post_id, post_name, context)
            .await
    }

    /// 投稿削除を記録
    pub async fn post_deleted(
        &self,
        post_id: &str,
        post_name: &str,
        context: &AuditContext,
    ) -> AuditOutcome {
        self.post_event(AuditAction::Delete, "Post deleted", post_id, post_name, context)
            .await
    }

    async fn post_event(
        &self,
        action: AuditAction,
        verb: &str,
        post_id: &str,
        post_name: &str,
        context: &AuditContext,
    ) -> AuditOutcome {
        let data = NewAuditLog::new(
            action,
            AuditResource::Post,
            AuditLevel::Info,
            format!("{}: \"{}\"", verb, post_name),
        )
        .resource_id(post_id)
        .detail("postId", post_id)
        .detail("postName", post_name)
        .context(context);
        self.record(data).await
    }

    /// 投稿一覧の取得を記録
    pub async fn posts_listed(&self, count: usize, context: &AuditContext) -> AuditOutcome {
        let data = NewAuditLog::new(
            AuditAction::Read,
            AuditResource::Post,
            AuditLevel::Info,
            format!("Posts listed: {} items", count),
        )
        .detail("count", count as u64)
        .context(context);
        self.record(data).await
    }

    /// システムエラーを記録
    pub async fn system_error(
        &self,
        error: &(dyn std::error::Error + Send + Sync + 'static),
        context: &AuditContext,
    ) -> AuditOutcome {
        let mut data = NewAuditLog::new(
            AuditAction::Error,
            AuditResource::System,
            AuditLevel::Error,
            format!("System error: {}", error),
        )
        .detail("errorMessage", error.to_string());
        if let Some(source) = error.source() {
            data = data.detail("errorSource", source.to_string());
        }
        self.record(data.context(context)).await
    }

    /// APIリクエストを記録（ステータス400以上はWARNING）
    pub async fn api_request(
        &self,
        method: &str,
        path: &str,
        status_code: u16,
        context: &AuditContext,
    ) -> AuditOutcome {
        let level = if status_code >= 400 {
            AuditLevel::Warning
        } else {
            AuditLevel::Info
        };
        let data = NewAuditLog::new(
            AuditAction::Read,
            AuditResource::Api,
            level,
            format!("{} {} - {}", method, path, status_code),
        )
        .detail("method", method)
        .detail("path", path)
        .detail("statusCode", Value::from(status_code))
        .context(context);
        self.record(data).await
    }
}
