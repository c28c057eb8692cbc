//! Integration Test: ApiClient ⇔ 実サーバー
//!
//! ランダムポートでサーバーを起動し、HTTPクライアント経由で操作する

use crate::support::create_test_state;
use chrono::{Duration, TimeZone, Utc};
use postboard::audit::types::{AuditAction, AuditLevel, AuditResource, NewAuditLog};
use postboard::client::{ApiClient, AuditLogQuery, ClientError};
use postboard::config::AppConfig;
use postboard::{server, AppState};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

async fn spawn_server() -> (ApiClient, AppState, JoinHandle<std::io::Result<()>>) {
    let state = create_test_state(AppConfig::default()).await;
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(server::serve(listener, state.clone()));
    let client = ApiClient::new(&format!("http://{}", addr)).unwrap();
    (client, state, handle)
}

async fn stop(state: AppState, handle: JoinHandle<std::io::Result<()>>) {
    state.shutdown.request_shutdown();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn posts_roundtrip_through_client() {
    let (client, state, handle) = spawn_server().await;

    let a = client.create_post("  Alpha  ", "first").await.unwrap();
    assert_eq!(a.name, "Alpha");
    let b = client.create_post("Beta", "second").await.unwrap();

    let all = client.list_posts(None).await.unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.iter().any(|p| p.id == a.id));

    let filtered = client.list_posts(Some("ALP")).await.unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].id, a.id);

    let deleted = client.delete_post(&b.id).await.unwrap();
    assert_eq!(deleted, b);
    assert_eq!(client.list_posts(None).await.unwrap().len(), 1);

    stop(state, handle).await;
}

#[tokio::test]
async fn api_errors_carry_status_and_details() {
    let (client, state, handle) = spawn_server().await;

    match client.create_post("", "").await {
        Err(ClientError::Api {
            status,
            message,
            details,
        }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "Validation error");
            assert_eq!(details.len(), 2);
        }
        other => panic!("unexpected result: {:?}", other),
    }

    match client.delete_post("missing").await {
        Err(ClientError::Api { status, .. }) => assert_eq!(status, 404),
        other => panic!("unexpected result: {:?}", other),
    }

    stop(state, handle).await;
}

#[tokio::test]
async fn audit_queries_through_client() {
    let (client, state, handle) = spawn_server().await;

    let post = client.create_post("Audited", "d").await.unwrap();
    client.list_posts(None).await.unwrap();

    let page = client
        .list_audit_logs(&AuditLogQuery {
            action: Some(AuditAction::Create),
            resource: Some(AuditResource::Post),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(page.success);
    assert_eq!(page.pagination.total, 1);
    let log = &page.data[0];
    assert_eq!(log.resource_id.as_deref(), Some(post.id.as_str()));
    // 実接続なのでループバックアドレスが記録される
    assert_eq!(log.ip_address.as_deref(), Some("127.0.0.1"));

    let fetched = client.get_audit_log(&log.id).await.unwrap();
    assert_eq!(&fetched, log);

    let stats = client.audit_stats().await.unwrap();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.by_level.info, 2);
    assert_eq!(stats.last_24_hours, 2);

    stop(state, handle).await;
}

#[tokio::test]
async fn audit_date_range_keeps_microsecond_bounds() {
    let (client, state, handle) = spawn_server().await;
    let base = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
    for (message, micros) in [("before", 50), ("inside", 400), ("after", 1000)] {
        state
            .audit_service
            .append(
                NewAuditLog::new(
                    AuditAction::System,
                    AuditResource::System,
                    AuditLevel::Info,
                    message,
                )
                .timestamp(base + Duration::microseconds(micros)),
            )
            .await
            .unwrap();
    }

    let page = client
        .list_audit_logs(&AuditLogQuery {
            from_date: Some(base + Duration::microseconds(100)),
            to_date: Some(base + Duration::microseconds(900)),
            ..Default::default()
        })
        .await
        .unwrap();
    let messages: Vec<&str> = page.data.iter().map(|l| l.message.as_str()).collect();
    assert_eq!(messages, vec!["inside"]);

    stop(state, handle).await;
}
