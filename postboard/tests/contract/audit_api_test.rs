//! Contract Test: /api/audit
//!
//! 監査ログの一覧・統計・単体取得API契約テスト

use crate::support::{create_test_app, get, send};
use axum::http::StatusCode;
use chrono::{DateTime, Duration, TimeZone, Utc};
use postboard::audit::types::{AuditAction, AuditLevel, AuditResource, NewAuditLog};
use postboard::AppState;
use serde_json::Value;

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap()
}

async fn seed(
    state: &AppState,
    action: AuditAction,
    resource: AuditResource,
    level: AuditLevel,
    message: &str,
    at: DateTime<Utc>,
) -> String {
    state
        .audit_service
        .append(NewAuditLog::new(action, resource, level, message).timestamp(at))
        .await
        .expect("seed audit log")
        .id
}

fn messages(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["message"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn list_without_filters_is_newest_first() {
    let (app, state) = create_test_app().await;
    for (i, minutes) in [5, 1, 9, 3].into_iter().enumerate() {
        seed(
            &state,
            AuditAction::System,
            AuditResource::System,
            AuditLevel::Info,
            &format!("m{}", i),
            base_time() + Duration::minutes(minutes),
        )
        .await;
    }

    let (status, body) = send(&app, get("/api/audit")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(messages(&body), vec!["m2", "m0", "m3", "m1"]);
    assert_eq!(body["pagination"]["total"], 4);
    assert_eq!(body["pagination"]["page"], 1);
    assert_eq!(body["pagination"]["limit"], 50);
    assert_eq!(body["pagination"]["totalPages"], 1);
}

#[tokio::test]
async fn list_filters_are_conjunctive() {
    let (app, state) = create_test_app().await;
    let t = |h| base_time() + Duration::hours(h);
    seed(&state, AuditAction::Create, AuditResource::Post, AuditLevel::Info, "c1", t(1)).await;
    seed(&state, AuditAction::Create, AuditResource::Post, AuditLevel::Info, "c2", t(5)).await;
    seed(&state, AuditAction::Create, AuditResource::Post, AuditLevel::Info, "c3", t(10)).await;
    seed(&state, AuditAction::Delete, AuditResource::Post, AuditLevel::Info, "d1", t(5)).await;
    seed(&state, AuditAction::Create, AuditResource::Api, AuditLevel::Info, "a1", t(5)).await;

    let (_, body) = send(&app, get("/api/audit?action=CREATE&resource=POST")).await;
    assert_eq!(messages(&body), vec!["c3", "c2", "c1"]);

    let (_, body) = send(
        &app,
        get(concat!(
            "/api/audit?action=CREATE&resource=POST",
            "&fromDate=2025-02-01T02:00:00Z&toDate=2025-02-01T05:00:00Z"
        )),
    )
    .await;
    assert_eq!(messages(&body), vec!["c2"]);
    assert_eq!(body["pagination"]["total"], 1);
}

#[tokio::test]
async fn list_paginates_120_records() {
    let (app, state) = create_test_app().await;
    for i in 0..120 {
        seed(
            &state,
            AuditAction::Read,
            AuditResource::Api,
            AuditLevel::Info,
            &format!("r{}", i),
            base_time() + Duration::seconds(i),
        )
        .await;
    }

    let (_, page1) = send(&app, get("/api/audit?limit=50&page=1")).await;
    assert_eq!(page1["data"].as_array().unwrap().len(), 50);
    assert_eq!(page1["pagination"]["totalPages"], 3);
    assert_eq!(page1["pagination"]["total"], 120);

    let (_, page3) = send(&app, get("/api/audit?limit=50&page=3")).await;
    assert_eq!(page3["data"].as_array().unwrap().len(), 20);
    assert_eq!(page3["pagination"]["page"], 3);
    assert_eq!(messages(&page3).last().unwrap(), "r0");
}

#[tokio::test]
async fn list_ignores_invalid_parameters_and_clamps_limit() {
    let (app, state) = create_test_app().await;
    seed(
        &state,
        AuditAction::Login,
        AuditResource::Auth,
        AuditLevel::Warning,
        "w",
        base_time(),
    )
    .await;

    let (status, body) = send(
        &app,
        get("/api/audit?action=JUMP&level=LOUD&fromDate=someday&page=zero&limit=9999"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["pagination"]["limit"], 200);

    let (_, body) = send(&app, get("/api/audit?limit=-1")).await;
    assert_eq!(body["pagination"]["limit"], 50);

    let (_, body) = send(&app, get("/api/audit?resource=AUTH")).await;
    assert_eq!(body["pagination"]["total"], 1);
}

#[tokio::test]
async fn huge_page_returns_empty_page() {
    let (app, state) = create_test_app().await;
    seed(
        &state,
        AuditAction::System,
        AuditResource::System,
        AuditLevel::Info,
        "only",
        base_time(),
    )
    .await;

    let (status, body) = send(&app, get("/api/audit?page=9223372036854775807")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["pagination"]["totalPages"], 1);
}

#[tokio::test]
async fn search_is_case_sensitive() {
    let (app, state) = create_test_app().await;
    seed(
        &state,
        AuditAction::Error,
        AuditResource::System,
        AuditLevel::Error,
        "Disk Full",
        base_time(),
    )
    .await;

    let (_, body) = send(&app, get("/api/audit?search=Disk")).await;
    assert_eq!(body["pagination"]["total"], 1);
    let (_, body) = send(&app, get("/api/audit?search=disk")).await;
    assert_eq!(body["pagination"]["total"], 0);

    let long = "x".repeat(51);
    let (status, body) = send(&app, get(&format!("/api/audit?search={}", long))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn get_by_id() {
    let (app, state) = create_test_app().await;
    let id = seed(
        &state,
        AuditAction::Update,
        AuditResource::User,
        AuditLevel::Critical,
        "u",
        base_time(),
    )
    .await;

    let (status, body) = send(&app, get(&format!("/api/audit/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["id"], id.as_str());
    assert_eq!(body["data"]["level"], "CRITICAL");
    assert_eq!(body["data"]["timestamp"], "2025-02-01T00:00:00Z");

    let (status, body) = send(&app, get("/api/audit/audit_missing")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn stats_counts_levels_and_recent_records() {
    let (app, state) = create_test_app().await;
    let now = Utc::now();
    let entries = [
        (AuditLevel::Info, Duration::minutes(5)),
        (AuditLevel::Info, Duration::hours(48)),
        (AuditLevel::Warning, Duration::hours(3)),
        (AuditLevel::Error, Duration::hours(30)),
        (AuditLevel::Critical, Duration::minutes(1)),
    ];
    for (level, age) in entries {
        seed(&state, AuditAction::System, AuditResource::System, level, "s", now - age).await;
    }

    let (status, body) = send(&app, get("/api/audit/stats")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let data = &body["data"];
    assert_eq!(data["total"], 5);
    assert_eq!(data["byLevel"]["info"], 2);
    assert_eq!(data["byLevel"]["warning"], 1);
    assert_eq!(data["byLevel"]["error"], 1);
    assert_eq!(data["byLevel"]["critical"], 1);
    assert_eq!(data["last24Hours"], 3);
}
