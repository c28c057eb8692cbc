//! Postboard HTTP Client
//!
//! 投稿APIと監査ログAPIを呼び出すクライアント。CLIの`posts`/`audit`サブコマンドが使用する。

use crate::api::audit_log::{AuditLogListResponse, DataResponse};
use crate::audit::types::{AuditAction, AuditLevel, AuditLog, AuditResource, AuditStats};
use crate::common::time;
use crate::types::{CreatePostRequest, Post};
use chrono::{DateTime, Utc};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// リクエストタイムアウト
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Error types for API client operations
#[derive(Debug, Error)]
pub enum ClientError {
    /// Base URL could not be parsed
    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),

    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    Network(#[source] reqwest::Error),

    /// Server returned a non-2xx response
    #[error("API returned error: {status} - {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the response body
        message: String,
        /// Validation rule violations (400 only)
        details: Vec<String>,
    },

    /// Response body could not be decoded
    #[error("Invalid response format: {0}")]
    Decode(String),
}

/// エラーレスポンスの本体（投稿APIと監査ログAPIの両形式を受け付ける）
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    #[serde(default)]
    details: Vec<String>,
}

/// 監査ログ一覧の検索条件
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditLogQuery {
    /// アクション
    pub action: Option<AuditAction>,
    /// リソース
    pub resource: Option<AuditResource>,
    /// レベル
    pub level: Option<AuditLevel>,
    /// 対象リソースID
    pub resource_id: Option<String>,
    /// フリーテキスト検索
    pub search: Option<String>,
    /// 開始日時
    pub from_date: Option<DateTime<Utc>>,
    /// 終了日時
    pub to_date: Option<DateTime<Utc>>,
    /// ページ番号（1始まり）
    pub page: Option<i64>,
    /// ページあたり件数（未指定時はサーバー側デフォルトの50）
    pub limit: Option<i64>,
}

impl AuditLogQuery {
    /// クエリ文字列のペアに変換する（未指定の条件は含めない）
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(action) = self.action {
            pairs.push(("action", action.as_str().to_string()));
        }
        if let Some(resource) = self.resource {
            pairs.push(("resource", resource.as_str().to_string()));
        }
        if let Some(level) = self.level {
            pairs.push(("level", level.as_str().to_string()));
        }
        if let Some(ref resource_id) = self.resource_id {
            pairs.push(("resourceId", resource_id.clone()));
        }
        if let Some(ref search) = self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(from) = self.from_date {
            pairs.push(("fromDate", time::to_db_string(&from)));
        }
        if let Some(to) = self.to_date {
            pairs.push(("toDate", time::to_db_string(&to)));
        }
        pairs
    }
}

/// Postboard APIクライアント
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// ベースURL（例: `http://localhost:3001`）を指定して作成
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_client(Client::new(), base_url)
    }

    /// 既存のreqwest::Clientを使って作成
    pub fn with_client(client: Client, base_url: &str) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self { client, base_url })
    }

    /// パスセグメントからURLを組み立てる（各セグメントはエスケープされる）
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// GET /api/posts
    pub async fn list_posts(&self, filter: Option<&str>) -> Result<Vec<Post>, ClientError> {
        let mut request = self.client.get(self.endpoint(&["api", "posts"]));
        if let Some(term) = filter {
            request = request.query(&[("filter", term)]);
        }
        let response = request
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(ClientError::Network)?;
        decode(response).await
    }

    /// POST /api/posts
    pub async fn create_post(&self, name: &str, description: &str) -> Result<Post, ClientError> {
        let body = CreatePostRequest {
            name: name.to_string(),
            description: description.to_string(),
        };
        let response = self
            .client
            .post(self.endpoint(&["api", "posts"]))
            .json(&body)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(ClientError::Network)?;
        decode(response).await
    }

    /// DELETE /api/posts/:id
    pub async fn delete_post(&self, id: &str) -> Result<Post, ClientError> {
        let response = self
            .client
            .delete(self.endpoint(&["api", "posts", id]))
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(ClientError::Network)?;
        decode(response).await
    }

    /// GET /api/audit
    pub async fn list_audit_logs(
        &self,
        query: &AuditLogQuery,
    ) -> Result<AuditLogListResponse, ClientError> {
        let response = self
            .client
            .get(self.endpoint(&["api", "audit"]))
            .query(&query.to_pairs())
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(ClientError::Network)?;
        decode(response).await
    }

    /// GET /api/audit/:id
    pub async fn get_audit_log(&self, id: &str) -> Result<AuditLog, ClientError> {
        let response = self
            .client
            .get(self.endpoint(&["api", "audit", id]))
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(ClientError::Network)?;
        let body: DataResponse<AuditLog> = decode(response).await?;
        Ok(body.data)
    }

    /// GET /api/audit/stats
    pub async fn audit_stats(&self) -> Result<AuditStats, ClientError> {
        let response = self
            .client
            .get(self.endpoint(&["api", "audit", "stats"]))
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(ClientError::Network)?;
        let body: DataResponse<AuditStats> = decode(response).await?;
        Ok(body.data)
    }
}

/// 2xxなら本体をデコードし、それ以外は`ClientError::Api`に変換する
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    let bytes = response.bytes().await.map_err(ClientError::Network)?;

    if !status.is_success() {
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap_or_default();
        let message = body.error.unwrap_or_else(|| {
            let text = String::from_utf8_lossy(&bytes).trim().to_string();
            if text.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            } else {
                text
            }
        });
        return Err(ClientError::Api {
            status: status.as_u16(),
            message,
            details: body.details,
        });
    }

    serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
}
