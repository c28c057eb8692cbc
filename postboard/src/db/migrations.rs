//! データベース接続プールの作成とマイグレーション実行

use crate::common::error::{BoardError, BoardResult};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};

/// SQLiteデータベース接続プールを作成してマイグレーションを実行
///
/// # Arguments
/// * `database_url` - データベースURL（例: "sqlite:data/postboard.db"）
///
/// # Returns
/// * `Ok(SqlitePool)` - 初期化済みデータベースプール
/// * `Err(BoardError)` - 初期化失敗
pub async fn initialize_database(database_url: &str) -> BoardResult<SqlitePool> {
    let in_memory = database_url.contains(":memory:");
    if !in_memory {
        ensure_parent_dir(database_url)?;
    }

    // データベースファイルが存在しない場合は作成
    if !in_memory
        && !Sqlite::database_exists(database_url)
            .await
            .map_err(|e| BoardError::Database(format!("Failed to check database: {}", e)))?
    {
        tracing::info!(database_url, "Creating database");
        Sqlite::create_database(database_url)
            .await
            .map_err(|e| BoardError::Database(format!("Failed to create database: {}", e)))?;
    }

    // インメモリDBは接続ごとに別DBになるため1接続に固定する
    let options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new()
    };

    let pool = options
        .connect(database_url)
        .await
        .map_err(|e| BoardError::Database(format!("Failed to connect to database: {}", e)))?;

    run_migrations(&pool).await?;

    Ok(pool)
}

/// SQLiteファイルの親ディレクトリを作成する（存在しないとファイルを作成できないため）
fn ensure_parent_dir(database_url: &str) -> BoardResult<()> {
    let Some(path) = database_url.strip_prefix("sqlite:") else {
        return Ok(());
    };
    // `sqlite://` 形式に備えてスラッシュを除去し、クエリ部分を除外
    let normalized = path.trim_start_matches("//");
    let path_without_params = normalized.split('?').next().unwrap_or(normalized);
    if let Some(parent) = std::path::Path::new(path_without_params).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                BoardError::Database(format!(
                    "Failed to create database directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }
    Ok(())
}

/// マイグレーションを実行（sqlx::migrate!マクロを使用）
pub async fn run_migrations(pool: &SqlitePool) -> BoardResult<()> {
    tracing::info!("Running database migrations");

    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| BoardError::Database(format!("Failed to run migrations: {}", e)))?;

    tracing::info!("Database migrations completed successfully");
    Ok(())
}

/// 接続プールを閉じる
pub async fn close_database(pool: &SqlitePool) {
    pool.close().await;
    tracing::info!("Database connection closed");
}
