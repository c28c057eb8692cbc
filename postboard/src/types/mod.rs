//! 型定義

/// 投稿エンティティ
pub mod post;

pub use post::{CreatePostRequest, Post};
