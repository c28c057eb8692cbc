//! CLI module for postboard
//!
//! サーバー起動・監査ログの保持期間削除・APIクライアント操作を提供する。

pub mod audit;
pub mod posts;
pub mod prune;
pub mod serve;

use clap::{Parser, Subcommand};

/// デフォルトの接続先サーバー
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3001";

/// Postboard - posts CRUD server with an audit log
#[derive(Parser, Debug)]
#[command(name = "postboard")]
#[command(version, about, long_about = None)]
#[command(after_help = r#"ENVIRONMENT VARIABLES:
    POSTBOARD_HOST                Bind address (default: 0.0.0.0)
    POSTBOARD_PORT                Listen port (default: 3001)
    POSTBOARD_DATABASE_URL        Database URL (default: sqlite:./database.sqlite)
    POSTBOARD_CORS_ORIGIN         Extra allowed CORS origins (comma separated)
    POSTBOARD_AUDIT_API_REQUESTS  Record /api/posts requests in the audit log
    POSTBOARD_LOG_LEVEL           Log level (default: info)
    POSTBOARD_LOG_FORMAT          Set to "json" for JSON console logs
    POSTBOARD_LOG_DIR             Directory for daily rotated log files
    POSTBOARD_URL                 Server URL used by the posts/audit commands
"#)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve(serve::ServeArgs),
    /// Delete audit log records older than a cutoff
    Prune(prune::PruneArgs),
    /// Manage posts on a running server
    Posts(posts::PostsArgs),
    /// Inspect the audit log of a running server
    Audit(audit::AuditArgs),
}
