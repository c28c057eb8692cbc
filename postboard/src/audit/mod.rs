//! 監査ログシステム
//!
//! 投稿操作・APIリクエストのメタデータを追記専用ストアに記録する

/// 監査ログの型定義
pub mod types;

/// 監査ログサービス（検索・統計・保持期間削除）
pub mod service;

/// ベストエフォート記録
pub mod recorder;

/// リクエストコンテキスト抽出
pub mod context;

/// APIリクエスト監査ミドルウェア
pub mod middleware;

pub use recorder::{AuditOutcome, AuditRecorder};
pub use service::AuditService;
