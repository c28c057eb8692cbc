//! 監査ログの型定義

use crate::common::error::{BoardError, BoardResult};
use crate::common::time;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 1ページあたりのデフォルト件数
pub const DEFAULT_PAGE_LIMIT: i64 = 50;
/// 1ページあたりの最大件数
pub const MAX_PAGE_LIMIT: i64 = 200;

/// 監査アクション
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditAction {
    /// 作成
    Create,
    /// 参照
    Read,
    /// 更新
    Update,
    /// 削除
    Delete,
    /// ログイン
    Login,
    /// ログアウト
    Logout,
    /// エラー
    Error,
    /// システムイベント
    System,
}

impl AuditAction {
    /// 文字列からAuditActionに変換（未知の値はNone）
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "CREATE" => Some(Self::Create),
            "READ" => Some(Self::Read),
            "UPDATE" => Some(Self::Update),
            "DELETE" => Some(Self::Delete),
            "LOGIN" => Some(Self::Login),
            "LOGOUT" => Some(Self::Logout),
            "ERROR" => Some(Self::Error),
            "SYSTEM" => Some(Self::System),
            _ => None,
        }
    }

    /// AuditActionを文字列に変換
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Read => "READ",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Login => "LOGIN",
            Self::Logout => "LOGOUT",
            Self::Error => "ERROR",
            Self::System => "SYSTEM",
        }
    }
}

/// 監査対象リソース
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditResource {
    /// 投稿
    Post,
    /// ユーザー
    User,
    /// システム
    System,
    /// API
    Api,
    /// 認証
    Auth,
}

impl AuditResource {
    /// 文字列からAuditResourceに変換（未知の値はNone）
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "POST" => Some(Self::Post),
            "USER" => Some(Self::User),
            "SYSTEM" => Some(Self::System),
            "API" => Some(Self::Api),
            "AUTH" => Some(Self::Auth),
            _ => None,
        }
    }

    /// AuditResourceを文字列に変換
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Post => "POST",
            Self::User => "USER",
            Self::System => "SYSTEM",
            Self::Api => "API",
            Self::Auth => "AUTH",
        }
    }
}

/// 監査レベル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditLevel {
    /// 情報
    Info,
    /// 警告
    Warning,
    /// エラー
    Error,
    /// 致命的
    Critical,
}

impl AuditLevel {
    /// 全レベル（統計集計順）
    pub const ALL: [AuditLevel; 4] = [Self::Info, Self::Warning, Self::Error, Self::Critical];

    /// 文字列からAuditLevelに変換（未知の値はNone）
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "INFO" => Some(Self::Info),
            "WARNING" => Some(Self::Warning),
            "ERROR" => Some(Self::Error),
            "CRITICAL" => Some(Self::Critical),
            _ => None,
        }
    }

    /// AuditLevelを文字列に変換
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for AuditResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for AuditLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 監査ログエントリ（追記専用、生成後は不変）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    /// レコードID
    pub id: String,
    /// アクション
    pub action: AuditAction,
    /// リソース
    pub resource: AuditResource,
    /// 対象リソースID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    /// レベル
    pub level: AuditLevel,
    /// メッセージ
    pub message: String,
    /// 追加情報（自由形式）
    #[serde(default)]
    pub details: Map<String, Value>,
    /// User-Agent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// クライアントIPアドレス
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    /// 記録日時
    pub timestamp: DateTime<Utc>,
}

impl AuditLog {
    /// 入力データから監査ログを生成する
    ///
    /// IDとタイムスタンプは未指定なら採番・現在時刻で補完する。
    /// タイムスタンプは保存精度（マイクロ秒）に丸める。
    /// メッセージが空白のみの場合は生成に失敗する。
    pub fn new(data: NewAuditLog) -> BoardResult<Self> {
        if data.message.trim().is_empty() {
            return Err(BoardError::invalid("Audit message is required"));
        }

        Ok(Self {
            id: data.id.unwrap_or_else(generate_audit_id),
            action: data.action,
            resource: data.resource,
            resource_id: data.resource_id,
            level: data.level,
            message: data.message,
            details: data.details,
            user_agent: data.user_agent,
            ip_address: data.ip_address,
            timestamp: data.timestamp.map(time::truncate).unwrap_or_else(time::now),
        })
    }
}

fn generate_audit_id() -> String {
    format!("audit_{}", uuid::Uuid::new_v4().simple())
}

/// 監査ログ作成用の入力データ
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuditLog {
    /// 既存ID（None時は自動採番）
    pub id: Option<String>,
    /// アクション
    pub action: AuditAction,
    /// リソース
    pub resource: AuditResource,
    /// 対象リソースID
    pub resource_id: Option<String>,
    /// レベル
    pub level: AuditLevel,
    /// メッセージ
    pub message: String,
    /// 追加情報
    pub details: Map<String, Value>,
    /// User-Agent
    pub user_agent: Option<String>,
    /// クライアントIPアドレス
    pub ip_address: Option<String>,
    /// 記録日時（None時は現在時刻）
    pub timestamp: Option<DateTime<Utc>>,
}

impl NewAuditLog {
    /// 必須項目だけを指定して生成
    pub fn new(
        action: AuditAction,
        resource: AuditResource,
        level: AuditLevel,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            action,
            resource,
            resource_id: None,
            level,
            message: message.into(),
            details: Map::new(),
            user_agent: None,
            ip_address: None,
            timestamp: None,
        }
    }

    /// 対象リソースIDを設定
    pub fn resource_id(mut self, id: impl Into<String>) -> Self {
        self.resource_id = Some(id.into());
        self
    }

    /// 追加情報を1件設定
    pub fn detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// リクエスト由来のコンテキストを適用する
    ///
    /// コンテキストのdetailsは既存のdetailsより先にマージされ、同じキーは既存側が優先される。
    pub fn context(mut self, context: &AuditContext) -> Self {
        let mut merged = context.details.clone();
        merged.extend(std::mem::take(&mut self.details));
        self.details = merged;
        self.user_agent = context.user_agent.clone();
        self.ip_address = context.ip_address.clone();
        self
    }

    /// 記録日時を明示指定
    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// リクエストのメタデータ（監査ログに添付する）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditContext {
    /// User-Agent
    pub user_agent: Option<String>,
    /// クライアントIPアドレス
    pub ip_address: Option<String>,
    /// 追加情報
    pub details: Map<String, Value>,
}

/// 監査ログフィルタ
///
/// 各条件は任意で、指定されたものはANDで結合される。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditLogFilter {
    /// アクション完全一致
    pub action: Option<AuditAction>,
    /// リソース完全一致
    pub resource: Option<AuditResource>,
    /// レベル完全一致
    pub level: Option<AuditLevel>,
    /// 対象リソースID完全一致
    pub resource_id: Option<String>,
    /// 開始日時（この時刻を含む）
    pub from_date: Option<DateTime<Utc>>,
    /// 終了日時（この時刻を含む）
    pub to_date: Option<DateTime<Utc>>,
    /// メッセージまたはdetailsの部分一致（大文字小文字を区別）
    pub search: Option<String>,
    /// 取得件数
    pub limit: Option<i64>,
    /// 取得開始位置
    pub offset: Option<i64>,
}

impl AuditLogFilter {
    /// 実効件数（(0, 200]に収め、未指定・不正値はデフォルト）
    pub fn effective_limit(&self) -> i64 {
        clamp_limit(self.limit)
    }

    /// 実効オフセット（負値は0）
    pub fn effective_offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }

    /// ページ番号（1始まり）からオフセットを設定する
    ///
    /// 巨大なページ番号ではオフセットが`i64::MAX`で飽和し、空のページになる。
    pub fn with_page(mut self, page: i64) -> Self {
        let page = page.max(1);
        self.offset = Some((page - 1).saturating_mul(self.effective_limit()));
        self
    }
}

/// 件数指定を(0, MAX_PAGE_LIMIT]に収める
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    match limit {
        Some(l) if l > 0 => l.min(MAX_PAGE_LIMIT),
        _ => DEFAULT_PAGE_LIMIT,
    }
}

/// 監査ログ一覧の1ページ分
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogPage {
    /// このページのレコード
    pub records: Vec<AuditLog>,
    /// フィルタ全体の件数
    pub total: i64,
    /// 現在のページ番号（1始まり）
    pub page: i64,
    /// ページあたり件数
    pub limit: i64,
    /// 総ページ数
    pub total_pages: i64,
}

impl AuditLogPage {
    /// オフセット/件数からページ情報を算出する
    pub fn new(records: Vec<AuditLog>, total: i64, limit: i64, offset: i64) -> Self {
        let limit = limit.max(1);
        Self {
            records,
            total,
            page: offset / limit + 1,
            limit,
            total_pages: (total + limit - 1) / limit,
        }
    }
}

/// レベル別件数
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelCounts {
    /// INFO
    pub info: i64,
    /// WARNING
    pub warning: i64,
    /// ERROR
    pub error: i64,
    /// CRITICAL
    pub critical: i64,
}

impl LevelCounts {
    /// レベルに対応する件数を設定
    pub fn set(&mut self, level: AuditLevel, count: i64) {
        match level {
            AuditLevel::Info => self.info = count,
            AuditLevel::Warning => self.warning = count,
            AuditLevel::Error => self.error = count,
            AuditLevel::Critical => self.critical = count,
        }
    }
}

/// 監査ログ統計
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStats {
    /// 総件数
    pub total: i64,
    /// レベル別件数
    #[serde(rename = "byLevel")]
    pub by_level: LevelCounts,
    /// 直近24時間の件数
    #[serde(rename = "last24Hours")]
    pub last_24_hours: i64,
}
