//! prune サブコマンド
//!
//! 保持期間を過ぎた監査ログを削除します。外部スケジューラ（cron等）からの定期実行を想定。

use crate::audit::AuditService;
use crate::db::{self, audit_log::AuditLogStorage};
use chrono::{DateTime, Duration, Utc};
use clap::Args;
use std::sync::Arc;

/// prune サブコマンドの引数
#[derive(Args, Debug, Clone)]
pub struct PruneArgs {
    /// Delete records older than this many days
    #[arg(long, conflicts_with = "before", required_unless_present = "before")]
    pub days: Option<u32>,

    /// Delete records strictly before this RFC 3339 timestamp
    #[arg(long)]
    pub before: Option<DateTime<Utc>>,

    /// Database URL (defaults to POSTBOARD_DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,
}

impl PruneArgs {
    /// 削除基準時刻を算出する
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match (self.before, self.days) {
            (Some(before), _) => before,
            (None, Some(days)) => now - Duration::days(i64::from(days)),
            (None, None) => now,
        }
    }
}

/// prune サブコマンドを実行
pub async fn execute(args: &PruneArgs) -> anyhow::Result<()> {
    let database_url = args
        .database_url
        .clone()
        .unwrap_or_else(crate::config::database_url);
    let pool = db::initialize_database(&database_url).await?;

    let service = AuditService::new(Arc::new(AuditLogStorage::new(pool.clone())));
    let cutoff = args.cutoff(Utc::now());
    let result = service.prune_older_than(cutoff).await;
    db::close_database(&pool).await;

    let deleted = result?;
    println!(
        "Deleted {} audit log record(s) older than {}",
        deleted,
        cutoff.to_rfc3339()
    );
    Ok(())
}
