//! データベースアクセス層
//!
//! SQLiteベースのデータ永続化

/// 投稿ストレージ
pub mod posts;

/// 監査ログストレージ
pub mod audit_log;

/// データベースの初期化・マイグレーション
pub mod migrations;

/// Repository traitパターン（テスタビリティ向上）
pub mod traits;

pub use migrations::{close_database, initialize_database};
