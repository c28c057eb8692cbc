//! 投稿エンティティ

use crate::common::error::BoardResult;
use crate::validation::validate_post;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 投稿
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// 投稿ID（作成時に採番、不変）
    pub id: String,
    /// 名前
    pub name: String,
    /// 説明
    pub description: String,
    /// 作成日時
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// 不変条件を検証して投稿を生成する
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> BoardResult<Self> {
        let name = name.into();
        let description = description.into();
        validate_post(&name, &description).into_result()?;

        Ok(Self {
            id: id.into(),
            name,
            description,
            created_at,
        })
    }

    /// 名前がフィルタ語を含むか（大文字小文字を区別しない）
    pub fn matches_filter(&self, term: &str) -> bool {
        let term = term.trim();
        if term.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&term.to_lowercase())
    }
}

/// 投稿作成リクエスト
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePostRequest {
    /// 名前（欠落時は空文字として検証される）
    #[serde(default)]
    pub name: String,
    /// 説明
    #[serde(default)]
    pub description: String,
}
