//! 投稿APIハンドラー
//!
//! `/api/posts` 系のエンドポイント

use super::error::AppError;
use crate::audit::types::AuditContext;
use crate::common::error::{BoardError, BoardResult};
use crate::types::{CreatePostRequest, Post};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

/// 投稿一覧のクエリパラメータ
#[derive(Debug, Default, Deserialize)]
pub struct PostListParams {
    /// 名前フィルタ（部分一致、大文字小文字を区別しない）
    pub filter: Option<String>,
}

/// GET /api/posts - 投稿一覧（作成日時の降順）
pub async fn list_posts(
    State(state): State<AppState>,
    context: AuditContext,
    Query(params): Query<PostListParams>,
) -> Result<Json<Vec<Post>>, AppError> {
    let posts = match list_filtered(&state, params.filter.as_deref()).await {
        Ok(posts) => posts,
        Err(e) => return Err(record_failure(&state, &context, e).await),
    };

    state
        .audit_recorder
        .posts_listed(posts.len(), &context)
        .await;

    Ok(Json(posts))
}

/// POST /api/posts - 投稿作成
pub async fn create_post(
    State(state): State<AppState>,
    context: AuditContext,
    payload: Result<Json<CreatePostRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Post>), AppError> {
    let Json(request) =
        payload.map_err(|rejection| BoardError::invalid(rejection.body_text()))?;

    let post = match state
        .post_service
        .create(&request.name, &request.description)
        .await
    {
        Ok(post) => post,
        Err(e) => return Err(record_failure(&state, &context, e).await),
    };

    state
        .audit_recorder
        .post_created(&post.id, &post.name, &context)
        .await;

    Ok((StatusCode::CREATED, Json(post)))
}

/// DELETE /api/posts/:id - 投稿削除（削除した投稿を返す）
pub async fn delete_post(
    State(state): State<AppState>,
    context: AuditContext,
    Path(id): Path<String>,
) -> Result<Json<Post>, AppError> {
    let post = match state.post_service.delete_by_id(&id).await {
        Ok(post) => post,
        Err(e) => return Err(record_failure(&state, &context, e).await),
    };

    state
        .audit_recorder
        .post_deleted(&post.id, &post.name, &context)
        .await;

    Ok(Json(post))
}

async fn list_filtered(state: &AppState, filter: Option<&str>) -> BoardResult<Vec<Post>> {
    let posts = state.post_service.list_all().await?;
    match filter {
        Some(term) => state.post_service.filter(posts, term),
        None => Ok(posts),
    }
}

/// 5xxの失敗はシステムエラーとして監査ログに残す
async fn record_failure(state: &AppState, context: &AuditContext, err: BoardError) -> AppError {
    if err.status_code().is_server_error() {
        state.audit_recorder.system_error(&err, context).await;
    }
    AppError(err)
}
