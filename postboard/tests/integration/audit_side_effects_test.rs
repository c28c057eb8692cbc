//! Integration Test: 投稿操作に伴う監査ログ記録
//!
//! 投稿APIの呼び出しが監査ログに反映されることを確認する

use crate::support::{create_test_app, create_test_app_with, delete, get, post_json, send};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use postboard::audit::types::{AuditAction, AuditLevel, AuditLog, AuditLogFilter, AuditResource};
use postboard::config::AppConfig;
use postboard::AppState;
use serde_json::json;

async fn logs_for(state: &AppState, action: AuditAction, resource: AuditResource) -> Vec<AuditLog> {
    let filter = AuditLogFilter {
        action: Some(action),
        resource: Some(resource),
        ..Default::default()
    };
    state.audit_service.list(filter).await.unwrap().records
}

#[tokio::test]
async fn create_and_delete_are_recorded_with_post_details() {
    let (app, state) = create_test_app().await;

    let (status, created) = send(
        &app,
        post_json("/api/posts", &json!({"name": "Alpha", "description": "first"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();

    let creates = logs_for(&state, AuditAction::Create, AuditResource::Post).await;
    assert_eq!(creates.len(), 1);
    let log = &creates[0];
    assert_eq!(log.level, AuditLevel::Info);
    assert_eq!(log.message, "Post created: \"Alpha\"");
    assert_eq!(log.resource_id.as_deref(), Some(id.as_str()));
    assert_eq!(log.details["postId"], json!(id));
    assert_eq!(log.details["postName"], json!("Alpha"));

    let (status, _) = send(&app, delete(&format!("/api/posts/{}", id))).await;
    assert_eq!(status, StatusCode::OK);

    let deletes = logs_for(&state, AuditAction::Delete, AuditResource::Post).await;
    assert_eq!(deletes.len(), 1);
    assert_eq!(deletes[0].message, "Post deleted: \"Alpha\"");
    assert_eq!(deletes[0].resource_id.as_deref(), Some(id.as_str()));
}

#[tokio::test]
async fn failed_operations_are_not_recorded_as_success() {
    let (app, state) = create_test_app().await;

    let (status, _) = send(
        &app,
        post_json("/api/posts", &json!({"name": "", "description": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(&app, delete("/api/posts/missing")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert!(logs_for(&state, AuditAction::Create, AuditResource::Post).await.is_empty());
    assert!(logs_for(&state, AuditAction::Delete, AuditResource::Post).await.is_empty());
}

#[tokio::test]
async fn listing_posts_records_read_with_count() {
    let (app, state) = create_test_app().await;
    for name in ["Apple", "Banana", "apricot"] {
        send(&app, post_json("/api/posts", &json!({"name": name, "description": "fruit"}))).await;
    }

    let (status, body) = send(&app, get("/api/posts?filter=ap")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let reads = logs_for(&state, AuditAction::Read, AuditResource::Post).await;
    assert_eq!(reads.len(), 1);
    assert_eq!(reads[0].message, "Posts listed: 2 items");
    assert_eq!(reads[0].details["count"], json!(2));
}

#[tokio::test]
async fn request_context_is_captured() {
    let (app, state) = create_test_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/posts")
        .header("content-type", "application/json")
        .header("user-agent", "integration-test/1.0")
        .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
        .body(Body::from(json!({"name": "Ctx", "description": "d"}).to_string()))
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::CREATED);

    let creates = logs_for(&state, AuditAction::Create, AuditResource::Post).await;
    assert_eq!(creates[0].user_agent.as_deref(), Some("integration-test/1.0"));
    assert_eq!(creates[0].ip_address.as_deref(), Some("203.0.113.7"));
}

#[tokio::test]
async fn api_request_auditing_is_opt_in() {
    let (app, state) = create_test_app().await;
    send(&app, post_json("/api/posts", &json!({"name": "Quiet", "description": "d"}))).await;
    assert!(logs_for(&state, AuditAction::Read, AuditResource::Api).await.is_empty());

    let config = AppConfig {
        audit_api_requests: true,
        ..Default::default()
    };
    let (app, state) = create_test_app_with(config).await;
    send(&app, post_json("/api/posts", &json!({"name": "Loud", "description": "d"}))).await;
    send(&app, delete("/api/posts/missing")).await;
    send(&app, get("/health")).await;

    let api_logs = logs_for(&state, AuditAction::Read, AuditResource::Api).await;
    assert_eq!(api_logs.len(), 2);

    let not_found = &api_logs[0];
    assert_eq!(not_found.message, "DELETE /api/posts/missing - 404");
    assert_eq!(not_found.level, AuditLevel::Warning);

    let created = &api_logs[1];
    assert_eq!(created.message, "POST /api/posts - 201");
    assert_eq!(created.level, AuditLevel::Info);
    assert_eq!(created.details["method"], json!("POST"));
    assert_eq!(created.details["path"], json!("/api/posts"));
    assert_eq!(created.details["statusCode"], json!(201));
    assert!(created.details.contains_key("durationMs"));
}

#[tokio::test]
async fn audit_store_failure_does_not_fail_post_operations() {
    let (app, state) = create_test_app().await;
    sqlx::query("DROP TABLE audit_logs")
        .execute(&state.db_pool)
        .await
        .unwrap();

    let (status, created) = send(
        &app,
        post_json("/api/posts", &json!({"name": "Resilient", "description": "d"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, get("/api/posts")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let id = created["id"].as_str().unwrap();
    let (status, _) = send(&app, delete(&format!("/api/posts/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn server_errors_are_recorded_as_system_errors() {
    let (app, state) = create_test_app().await;
    sqlx::query("DROP TABLE posts")
        .execute(&state.db_pool)
        .await
        .unwrap();

    let (status, body) = send(
        &app,
        post_json("/api/posts", &json!({"name": "Lost", "description": "d"})),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal server error");

    let errors = logs_for(&state, AuditAction::Error, AuditResource::System).await;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].level, AuditLevel::Error);
    assert!(errors[0]
        .message
        .starts_with("System error: Database error: Failed to save post"));
    assert!(errors[0].details.contains_key("errorMessage"));

    // 4xxはシステムエラーとして扱わない
    send(&app, delete("/api/posts/%20")).await;
    assert_eq!(
        logs_for(&state, AuditAction::Error, AuditResource::System).await.len(),
        1
    );
}
