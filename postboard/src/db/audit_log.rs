//! 監査ログストレージ（SQLite）

use crate::audit::types::{AuditAction, AuditLevel, AuditLog, AuditLogFilter, AuditResource};
use crate::common::error::{BoardError, BoardResult};
use crate::common::time;
use crate::db::traits::AuditLogRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

const SELECT_COLUMNS: &str = "SELECT id, action, resource, resource_id, level, message, \
     details, user_agent, ip_address, timestamp FROM audit_logs";

/// 監査ログのDB操作
#[derive(Clone)]
pub struct AuditLogStorage {
    pool: SqlitePool,
}

/// sqlx::FromRow用の行構造体
#[derive(Debug, sqlx::FromRow)]
struct AuditLogRow {
    id: String,
    action: String,
    resource: String,
    resource_id: Option<String>,
    level: String,
    message: String,
    details: Option<String>,
    user_agent: Option<String>,
    ip_address: Option<String>,
    timestamp: String,
}

impl TryFrom<AuditLogRow> for AuditLog {
    type Error = BoardError;

    fn try_from(row: AuditLogRow) -> Result<Self, Self::Error> {
        let action = AuditAction::parse(&row.action)
            .ok_or_else(|| BoardError::Database(format!("Invalid action: {}", row.action)))?;
        let resource = AuditResource::parse(&row.resource)
            .ok_or_else(|| BoardError::Database(format!("Invalid resource: {}", row.resource)))?;
        let level = AuditLevel::parse(&row.level)
            .ok_or_else(|| BoardError::Database(format!("Invalid level: {}", row.level)))?;

        let details = match row.details.as_deref() {
            None | Some("") => serde_json::Map::new(),
            Some(text) => serde_json::from_str(text)?,
        };

        Ok(AuditLog {
            id: row.id,
            action,
            resource,
            resource_id: row.resource_id,
            level,
            message: row.message,
            details,
            user_agent: row.user_agent,
            ip_address: row.ip_address,
            timestamp: time::parse_db_string(&row.timestamp, "timestamp")?,
        })
    }
}

impl AuditLogStorage {
    /// 新しいAuditLogStorageを作成
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditLogRepository for AuditLogStorage {
    async fn save(&self, log: &AuditLog) -> BoardResult<()> {
        let details = serde_json::to_string(&log.details)?;

        sqlx::query(
            r#"INSERT INTO audit_logs (
                id, action, resource, resource_id, level, message,
                details, user_agent, ip_address, timestamp
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&log.id)
        .bind(log.action.as_str())
        .bind(log.resource.as_str())
        .bind(&log.resource_id)
        .bind(log.level.as_str())
        .bind(&log.message)
        .bind(details)
        .bind(&log.user_agent)
        .bind(&log.ip_address)
        .bind(time::to_db_string(&log.timestamp))
        .execute(&self.pool)
        .await
        .map_err(|e| BoardError::Database(format!("Failed to insert audit log: {}", e)))?;

        Ok(())
    }

    async fn find_all(&self, filter: &AuditLogFilter) -> BoardResult<Vec<AuditLog>> {
        let (where_clause, bind_values) = build_where_clause(filter);
        let sql = format!(
            "{} {} ORDER BY timestamp DESC LIMIT ? OFFSET ?",
            SELECT_COLUMNS, where_clause
        );

        let mut query = sqlx::query_as::<_, AuditLogRow>(&sql);
        for val in &bind_values {
            query = query.bind(val.as_str());
        }
        query = query
            .bind(filter.effective_limit())
            .bind(filter.effective_offset());

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| BoardError::Database(format!("Failed to query audit logs: {}", e)))?;

        rows.into_iter()
            .map(AuditLog::try_from)
            .collect::<Result<Vec<_>, _>>()
    }

    async fn find_by_id(&self, id: &str) -> BoardResult<Option<AuditLog>> {
        let sql = format!("{} WHERE id = ?", SELECT_COLUMNS);
        let row = sqlx::query_as::<_, AuditLogRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| BoardError::Database(format!("Failed to get audit log by id: {}", e)))?;

        row.map(AuditLog::try_from).transpose()
    }

    async fn count(&self, filter: &AuditLogFilter) -> BoardResult<i64> {
        let (where_clause, bind_values) = build_where_clause(filter);
        let sql = format!("SELECT COUNT(*) as cnt FROM audit_logs {}", where_clause);

        let mut query = sqlx::query_scalar::<_, i64>(&sql);
        for val in &bind_values {
            query = query.bind(val.as_str());
        }

        query
            .fetch_one(&self.pool)
            .await
            .map_err(|e| BoardError::Database(format!("Failed to count audit logs: {}", e)))
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> BoardResult<u64> {
        let result = sqlx::query("DELETE FROM audit_logs WHERE timestamp < ?")
            .bind(time::to_db_string(&cutoff))
            .execute(&self.pool)
            .await
            .map_err(|e| BoardError::Database(format!("Failed to prune audit logs: {}", e)))?;

        Ok(result.rows_affected())
    }
}

/// フィルタからWHERE句とバインド値を構築
///
/// `search`は`LIKE`ではなく`instr`で判定する（SQLiteの`LIKE`はASCIIの大文字小文字を区別しないため）。
fn build_where_clause(filter: &AuditLogFilter) -> (String, Vec<String>) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_values: Vec<String> = Vec::new();

    if let Some(action) = filter.action {
        conditions.push("action = ?".to_string());
        bind_values.push(action.as_str().to_string());
    }

    if let Some(resource) = filter.resource {
        conditions.push("resource = ?".to_string());
        bind_values.push(resource.as_str().to_string());
    }

    if let Some(level) = filter.level {
        conditions.push("level = ?".to_string());
        bind_values.push(level.as_str().to_string());
    }

    if let Some(ref resource_id) = filter.resource_id {
        conditions.push("resource_id = ?".to_string());
        bind_values.push(resource_id.clone());
    }

    if let Some(ref from_date) = filter.from_date {
        conditions.push("timestamp >= ?".to_string());
        bind_values.push(time::to_db_string(from_date));
    }

    if let Some(ref to_date) = filter.to_date {
        conditions.push("timestamp <= ?".to_string());
        bind_values.push(time::to_db_string(to_date));
    }

    if let Some(ref search) = filter.search {
        conditions
            .push("(instr(message, ?) > 0 OR instr(COALESCE(details, ''), ?) > 0)".to_string());
        bind_values.push(search.clone());
        bind_values.push(search.clone());
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, bind_values)
}
