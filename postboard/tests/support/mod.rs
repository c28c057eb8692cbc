//! テスト共通ヘルパー

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use postboard::{api, config::AppConfig, db, AppState};
use serde_json::Value;
use tower::ServiceExt;

/// インメモリDBでAppStateを構築する
pub async fn create_test_state(config: AppConfig) -> AppState {
    let pool = db::initialize_database("sqlite::memory:")
        .await
        .expect("Failed to create test database");
    AppState::new(pool, config)
}

/// `.oneshot()` スタイルのテスト用ルーターを作成する
pub async fn create_test_app() -> (Router, AppState) {
    create_test_app_with(AppConfig::default()).await
}

/// 設定を指定してテスト用ルーターを作成する
pub async fn create_test_app_with(config: AppConfig) -> (Router, AppState) {
    let state = create_test_state(config).await;
    (api::create_app(state.clone()), state)
}

/// リクエストを送り、ステータスとJSON本体を返す
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("request failed");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response is not JSON")
    };
    (status, body)
}

/// GETリクエスト
pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// DELETEリクエスト
pub fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// JSON本体付きPOSTリクエスト
pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}
