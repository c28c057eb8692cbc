//! 投稿サービス
//!
//! 入力の整形・検証を行い、`PostRepository`に永続化を委譲する。

use crate::common::error::{BoardError, BoardResult};
use crate::common::time;
use crate::db::traits::PostRepository;
use crate::types::Post;
use crate::validation::{validate_filter_term, validate_id};
use std::sync::Arc;

/// 投稿のユースケース
#[derive(Clone)]
pub struct PostService {
    repository: Arc<dyn PostRepository>,
}

impl PostService {
    /// 新しいPostServiceを作成
    pub fn new(repository: Arc<dyn PostRepository>) -> Self {
        Self { repository }
    }

    /// 投稿を作成する
    ///
    /// 名前と説明は前後の空白を除去してから検証する。
    pub async fn create(&self, name: &str, description: &str) -> BoardResult<Post> {
        let post = Post::new(
            uuid::Uuid::new_v4().to_string(),
            name.trim(),
            description.trim(),
            time::now(),
        )?;

        self.repository.save(&post).await?;
        tracing::debug!(post_id = %post.id, "Post created");
        Ok(post)
    }

    /// IDを指定して投稿を削除し、削除した投稿を返す
    pub async fn delete_by_id(&self, id: &str) -> BoardResult<Post> {
        validate_id(id).into_result()?;

        match self.repository.delete(id).await? {
            Some(post) => {
                tracing::debug!(post_id = %post.id, "Post deleted");
                Ok(post)
            }
            None => Err(BoardError::NotFound(format!(
                "Post with id {} was not found",
                id
            ))),
        }
    }

    /// 全投稿を作成日時の降順で返す
    pub async fn list_all(&self) -> BoardResult<Vec<Post>> {
        self.repository.find_all().await
    }

    /// 名前にフィルタ語を含む投稿だけを返す（空白のみの語は全件）
    pub fn filter(&self, posts: Vec<Post>, term: &str) -> BoardResult<Vec<Post>> {
        validate_filter_term(term).into_result()?;

        if term.trim().is_empty() {
            return Ok(posts);
        }
        Ok(posts
            .into_iter()
            .filter(|post| post.matches_filter(term))
            .collect())
    }
}
