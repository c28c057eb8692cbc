//! 投稿ストレージ（SQLite）

use crate::common::error::{BoardError, BoardResult};
use crate::common::time;
use crate::db::traits::PostRepository;
use crate::types::Post;
use async_trait::async_trait;
use sqlx::SqlitePool;

/// 投稿のDB CRUD操作
#[derive(Clone)]
pub struct PostStorage {
    pool: SqlitePool,
}

/// sqlx::FromRow用の行構造体
#[derive(Debug, sqlx::FromRow)]
struct PostRow {
    id: String,
    name: String,
    description: String,
    created_at: String,
}

impl TryFrom<PostRow> for Post {
    type Error = BoardError;

    fn try_from(row: PostRow) -> Result<Self, Self::Error> {
        Ok(Post {
            created_at: time::parse_db_string(&row.created_at, "created_at")?,
            id: row.id,
            name: row.name,
            description: row.description,
        })
    }
}

impl PostStorage {
    /// 新しいPostStorageを作成
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PostStorage {
    async fn save(&self, post: &Post) -> BoardResult<()> {
        sqlx::query("INSERT INTO posts (id, name, description, created_at) VALUES (?, ?, ?, ?)")
            .bind(&post.id)
            .bind(&post.name)
            .bind(&post.description)
            .bind(time::to_db_string(&post.created_at))
            .execute(&self.pool)
            .await
            .map_err(|e| BoardError::Database(format!("Failed to save post: {}", e)))?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> BoardResult<Option<Post>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| BoardError::Database(format!("Failed to begin transaction: {}", e)))?;

        let row = sqlx::query_as::<_, PostRow>(
            "SELECT id, name, description, created_at FROM posts WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| BoardError::Database(format!("Failed to find post: {}", e)))?;

        let Some(row) = row else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| BoardError::Database(format!("Failed to delete post: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| BoardError::Database(format!("Failed to commit transaction: {}", e)))?;

        Post::try_from(row).map(Some)
    }

    async fn find_all(&self) -> BoardResult<Vec<Post>> {
        let rows = sqlx::query_as::<_, PostRow>(
            "SELECT id, name, description, created_at FROM posts ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| BoardError::Database(format!("Failed to list posts: {}", e)))?;

        rows.into_iter()
            .map(Post::try_from)
            .collect::<Result<Vec<_>, _>>()
    }
}
