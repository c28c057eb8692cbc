//! Repository traitパターン定義
//!
//! DB操作を抽象化し、サービス層から具体的なストレージを切り離すためのtrait群。
//! 実装はSQLiteストレージ1種類ずつ（`PostStorage` / `AuditLogStorage`）。

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::audit::types::{AuditLog, AuditLogFilter};
use crate::common::error::BoardResult;
use crate::types::Post;

// ---------------------------------------------------------------------------
// PostRepository
// ---------------------------------------------------------------------------

/// 投稿CRUD操作のRepository trait
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// 投稿を保存
    async fn save(&self, post: &Post) -> BoardResult<()>;
    /// 投稿を削除し、削除した値を返す（存在しなければNone）
    async fn delete(&self, id: &str) -> BoardResult<Option<Post>>;
    /// 全投稿を作成日時の降順で取得
    async fn find_all(&self) -> BoardResult<Vec<Post>>;
}

// ---------------------------------------------------------------------------
// AuditLogRepository
// ---------------------------------------------------------------------------

/// 監査ログ操作のRepository trait（追記専用）
#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    /// 監査ログを1件追記
    async fn save(&self, log: &AuditLog) -> BoardResult<()>;
    /// フィルタ条件で検索（タイムスタンプ降順、limit/offset適用）
    async fn find_all(&self, filter: &AuditLogFilter) -> BoardResult<Vec<AuditLog>>;
    /// IDで監査ログを取得
    async fn find_by_id(&self, id: &str) -> BoardResult<Option<AuditLog>>;
    /// フィルタ条件に一致する件数（limit/offsetは無視）
    async fn count(&self, filter: &AuditLogFilter) -> BoardResult<i64>;
    /// cutoffより前のレコードを削除し、削除件数を返す
    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> BoardResult<u64>;
}
