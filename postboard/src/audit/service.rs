//! 監査ログサービス
//!
//! 追記・検索・件数・統計・保持期間による削除を提供する。

use crate::audit::types::{
    AuditLevel, AuditLog, AuditLogFilter, AuditLogPage, AuditStats, LevelCounts, NewAuditLog,
};
use crate::common::error::{BoardError, BoardResult};
use crate::db::traits::AuditLogRepository;
use crate::validation::validate_filter_term;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

/// 監査ログのユースケース
#[derive(Clone)]
pub struct AuditService {
    repository: Arc<dyn AuditLogRepository>,
}

impl AuditService {
    /// 新しいAuditServiceを作成
    pub fn new(repository: Arc<dyn AuditLogRepository>) -> Self {
        Self { repository }
    }

    /// 監査ログを1件追記する
    pub async fn append(&self, data: NewAuditLog) -> BoardResult<AuditLog> {
        let log = AuditLog::new(data)?;
        self.repository.save(&log).await?;
        Ok(log)
    }

    /// フィルタ条件で1ページ分の監査ログを取得する
    pub async fn list(&self, filter: AuditLogFilter) -> BoardResult<AuditLogPage> {
        let filter = normalize_filter(filter)?;

        let records = self.repository.find_all(&filter).await?;
        let total = self.repository.count(&filter).await?;

        Ok(AuditLogPage::new(
            records,
            total,
            filter.effective_limit(),
            filter.effective_offset(),
        ))
    }

    /// フィルタ条件に一致する件数（limit/offsetは無視）
    pub async fn count(&self, filter: &AuditLogFilter) -> BoardResult<u64> {
        let total = self.repository.count(filter).await?;
        Ok(total.max(0) as u64)
    }

    /// IDで監査ログを取得する
    pub async fn get(&self, id: &str) -> BoardResult<AuditLog> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| BoardError::NotFound(format!("Audit log with id {} was not found", id)))
    }

    /// cutoffより前の監査ログを削除し、削除件数を返す
    pub async fn prune_older_than(&self, cutoff: DateTime<Utc>) -> BoardResult<u64> {
        let deleted = self.repository.delete_older_than(cutoff).await?;
        tracing::info!(
            cutoff = %cutoff.to_rfc3339(),
            deleted,
            "Pruned audit logs"
        );
        Ok(deleted)
    }

    /// 総件数・レベル別件数・直近24時間の件数を集計する
    pub async fn stats(&self, now: DateTime<Utc>) -> BoardResult<AuditStats> {
        let total = self.repository.count(&AuditLogFilter::default()).await?;

        let mut by_level = LevelCounts::default();
        for level in AuditLevel::ALL {
            let filter = AuditLogFilter {
                level: Some(level),
                ..Default::default()
            };
            by_level.set(level, self.repository.count(&filter).await?);
        }

        let recent = AuditLogFilter {
            from_date: Some(now - Duration::hours(24)),
            ..Default::default()
        };
        let last_24_hours = self.repository.count(&recent).await?;

        Ok(AuditStats {
            total,
            by_level,
            last_24_hours,
        })
    }
}

/// 空白のみの検索語を未指定として扱い、検索語の長さを検証する
fn normalize_filter(mut filter: AuditLogFilter) -> BoardResult<AuditLogFilter> {
    if let Some(search) = filter.search.take() {
        validate_filter_term(&search).into_result()?;
        if !search.trim().is_empty() {
            filter.search = Some(search);
        }
    }
    Ok(filter)
}
