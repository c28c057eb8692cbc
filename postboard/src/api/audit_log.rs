//! 監査ログAPIハンドラー
//!
//! `/api/audit` 系のエンドポイント

use super::error::AuditApiError;
use crate::audit::types::{
    AuditAction, AuditLevel, AuditLog, AuditLogFilter, AuditResource, AuditStats,
};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// 監査ログ一覧取得のクエリパラメータ
///
/// 値は文字列で受け取り、解釈できないものは未指定として扱う。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogQueryParams {
    /// アクションでフィルタ
    pub action: Option<String>,
    /// リソースでフィルタ
    pub resource: Option<String>,
    /// レベルでフィルタ
    pub level: Option<String>,
    /// 対象リソースIDでフィルタ
    pub resource_id: Option<String>,
    /// フリーテキスト検索（大文字小文字を区別）
    pub search: Option<String>,
    /// 開始日時（RFC 3339 または YYYY-MM-DD）
    pub from_date: Option<String>,
    /// 終了日時（RFC 3339 または YYYY-MM-DD）
    pub to_date: Option<String>,
    /// ページ番号（1始まり、デフォルト: 1）
    pub page: Option<String>,
    /// ページあたり件数（デフォルト: 50、最大: 200）
    pub limit: Option<String>,
}

impl From<AuditLogQueryParams> for AuditLogFilter {
    fn from(params: AuditLogQueryParams) -> Self {
        let page = parse_number(params.page.as_deref()).unwrap_or(1);
        Self {
            action: params.action.as_deref().and_then(AuditAction::parse),
            resource: params.resource.as_deref().and_then(AuditResource::parse),
            level: params.level.as_deref().and_then(AuditLevel::parse),
            resource_id: params.resource_id.filter(|s| !s.is_empty()),
            from_date: params.from_date.as_deref().and_then(parse_date),
            to_date: params.to_date.as_deref().and_then(parse_date),
            search: params.search,
            limit: parse_number(params.limit.as_deref()),
            offset: None,
        }
        .with_page(page)
    }
}

fn parse_number(value: Option<&str>) -> Option<i64> {
    value.and_then(|s| s.trim().parse().ok())
}

/// RFC 3339 または `YYYY-MM-DD`（UTC 0時）を解釈する
fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// ページ情報
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// 総件数
    pub total: i64,
    /// 現在のページ番号
    pub page: i64,
    /// ページあたり件数
    pub limit: i64,
    /// 総ページ数
    pub total_pages: i64,
}

/// 監査ログ一覧レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct AuditLogListResponse {
    /// 成功フラグ
    pub success: bool,
    /// 監査ログ一覧
    pub data: Vec<AuditLog>,
    /// ページ情報
    pub pagination: Pagination,
}

/// 成功レスポンスの共通ラッパー
#[derive(Debug, Serialize, Deserialize)]
pub struct DataResponse<T> {
    /// 成功フラグ
    pub success: bool,
    /// 本体
    pub data: T,
}

impl<T> DataResponse<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
        })
    }
}

/// GET /api/audit - 監査ログ一覧取得
pub async fn list_audit_logs(
    State(state): State<AppState>,
    Query(params): Query<AuditLogQueryParams>,
) -> Result<Json<AuditLogListResponse>, AuditApiError> {
    let page = state.audit_service.list(params.into()).await?;

    Ok(Json(AuditLogListResponse {
        success: true,
        pagination: Pagination {
            total: page.total,
            page: page.page,
            limit: page.limit,
            total_pages: page.total_pages,
        },
        data: page.records,
    }))
}

/// GET /api/audit/stats - 監査ログ統計
pub async fn get_audit_stats(
    State(state): State<AppState>,
) -> Result<Json<DataResponse<AuditStats>>, AuditApiError> {
    let stats = state.audit_service.stats(Utc::now()).await?;
    Ok(DataResponse::ok(stats))
}

/// GET /api/audit/:id - 監査ログ1件取得
pub async fn get_audit_log(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DataResponse<AuditLog>>, AuditApiError> {
    let log = state.audit_service.get(&id).await?;
    Ok(DataResponse::ok(log))
}
