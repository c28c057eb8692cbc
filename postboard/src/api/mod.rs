//! REST APIハンドラー
//!
//! ルーティングと共通レイヤー（トレース・CORS・監査）の組み立て

/// APIエラーレスポンス型
pub mod error;

/// 投稿API
pub mod posts;

/// 監査ログAPI
pub mod audit_log;

use crate::AppState;
use axum::{
    http::{header, HeaderValue, Method, StatusCode, Uri},
    middleware,
    response::IntoResponse,
    routing::{delete, get},
    Json, Router,
};
use serde_json::json;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

/// アプリケーションのルーターを構築する
pub fn create_app(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/api/posts", get(posts::list_posts).post(posts::create_post))
        .route("/api/posts/:id", delete(posts::delete_post))
        .route("/api/audit", get(audit_log::list_audit_logs))
        .route("/api/audit/stats", get(audit_log::get_audit_stats))
        .route("/api/audit/:id", get(audit_log::get_audit_log))
        .route("/health", get(health))
        .fallback(not_found);

    if state.config.audit_api_requests {
        app = app.layer(middleware::from_fn_with_state(
            state.clone(),
            crate::audit::middleware::api_request_audit,
        ));
    }

    app.layer(cors_layer(&state.config.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_credentials(true)
}

/// GET /health - ヘルスチェック
async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn not_found(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Route not found",
            "path": uri.path(),
        })),
    )
}
