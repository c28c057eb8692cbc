//! Postboard Server
//!
//! 投稿のCRUDと監査ログを提供するHTTPサーバー

#![warn(missing_docs)]

/// 共通ユーティリティ（エラー型・時刻・IP）
pub mod common;

/// REST APIハンドラー
pub mod api;

/// 監査ログシステム
pub mod audit;

/// CLIインターフェース
pub mod cli;

/// HTTPクライアントライブラリ
pub mod client;

/// 設定管理（環境変数ヘルパー）
pub mod config;

/// データベースアクセス
pub mod db;

/// ロギング初期化ユーティリティ
pub mod logging;

/// 投稿サービス
pub mod posts;

/// サーバー起動
pub mod server;

/// Cooperative shutdown
pub mod shutdown;

/// 型定義
pub mod types;

/// 入力値検証
pub mod validation;

use std::sync::Arc;

/// アプリケーション状態
#[derive(Clone)]
pub struct AppState {
    /// データベース接続プール
    pub db_pool: sqlx::SqlitePool,
    /// 投稿サービス
    pub post_service: posts::PostService,
    /// 監査ログサービス
    pub audit_service: audit::AuditService,
    /// ベストエフォートの監査記録
    pub audit_recorder: audit::AuditRecorder,
    /// アプリケーション設定
    pub config: config::AppConfig,
    /// Cooperative shutdown controller
    pub shutdown: shutdown::ShutdownController,
}

impl AppState {
    /// 接続プールからSQLiteストレージとサービスを組み立てる
    pub fn new(db_pool: sqlx::SqlitePool, config: config::AppConfig) -> Self {
        let post_storage = Arc::new(db::posts::PostStorage::new(db_pool.clone()));
        let audit_storage = Arc::new(db::audit_log::AuditLogStorage::new(db_pool.clone()));

        let post_service = posts::PostService::new(post_storage);
        let audit_service = audit::AuditService::new(audit_storage);
        let audit_recorder = audit::AuditRecorder::new(audit_service.clone());

        Self {
            db_pool,
            post_service,
            audit_service,
            audit_recorder,
            config,
            shutdown: shutdown::ShutdownController::default(),
        }
    }
}
