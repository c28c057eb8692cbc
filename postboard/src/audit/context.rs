//! リクエストから監査コンテキストを抽出するextractor

use crate::audit::types::AuditContext;
use crate::common::ip::{first_forwarded_ip, normalize_socket_ip};
use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::{header, request::Parts, HeaderMap};
use std::convert::Infallible;
use std::net::SocketAddr;

impl AuditContext {
    /// ヘッダと接続元アドレスからコンテキストを構築する
    ///
    /// クライアントIPは`X-Forwarded-For`、`X-Real-IP`、接続元アドレスの順に採用する。
    pub fn from_headers(headers: &HeaderMap, remote: Option<SocketAddr>) -> Self {
        let user_agent = headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let ip_address = headers
            .get("x-forwarded-for")
            .or_else(|| headers.get("x-real-ip"))
            .and_then(|v| v.to_str().ok())
            .and_then(first_forwarded_ip)
            .or_else(|| remote.map(|addr| normalize_socket_ip(&addr).to_string()));

        Self {
            user_agent,
            ip_address,
            details: serde_json::Map::new(),
        }
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuditContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let remote = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);
        Ok(Self::from_headers(&parts.headers, remote))
    }
}
