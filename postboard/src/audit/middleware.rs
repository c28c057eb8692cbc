//! APIリクエスト監査ミドルウェア
//!
//! `/api/posts`配下のリクエストを`READ/API`として記録する。
//! 有効化は`POSTBOARD_AUDIT_API_REQUESTS`で行う（デフォルト無効）。

use crate::audit::types::AuditContext;
use crate::AppState;
use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;
use std::time::Instant;

/// 監査対象のパスか判定する
fn should_audit(path: &str) -> bool {
    path == "/api/posts" || path.starts_with("/api/posts/")
}

/// APIリクエスト監査ミドルウェア
pub async fn api_request_audit(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    if !should_audit(&path) {
        return next.run(request).await;
    }

    let start = Instant::now();
    let method = request.method().to_string();
    let remote = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let mut context = AuditContext::from_headers(request.headers(), remote);

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let duration_ms = start.elapsed().as_millis() as u64;
    tracing::trace!(
        method = %method,
        path = %path,
        status,
        duration_ms,
        "api request audit captured"
    );

    context
        .details
        .insert("durationMs".to_string(), duration_ms.into());
    state
        .audit_recorder
        .api_request(&method, &path, status, &context)
        .await;

    response
}
