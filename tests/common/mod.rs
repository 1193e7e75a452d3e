// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Shared helpers: a throwaway upstream server on loopback and a router under test.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use ogp_proxy::app::{create_router, AppState};
use ogp_proxy::services::fetcher::{FetchSettings, UpstreamClient};
use ogp_proxy::services::headers::HeaderPolicy;
use std::net::SocketAddr;
use tower::ServiceExt;

pub const TEST_OGP_AGENT: &str = "TestOgpBot/0.1";
pub const TEST_PROXY_AGENT: &str = "TestProxy/0.1";

/// Serve `router` on an ephemeral loopback port for the rest of the test.
pub async fn spawn_upstream(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind upstream");
    let addr = listener.local_addr().expect("upstream has no address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("upstream crashed");
    });
    addr
}

pub fn test_app(policy: HeaderPolicy) -> Router {
    let upstream = UpstreamClient::new(&FetchSettings {
        ogp_user_agent: TEST_OGP_AGENT.to_string(),
        proxy_user_agent: TEST_PROXY_AGENT.to_string(),
        timeout: Some(std::time::Duration::from_secs(10)),
        system_proxy: false,
    })
    .expect("Failed to build client");
    create_router(AppState::new(upstream, policy))
}

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.expect("router failed")
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body")
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).expect("body is not JSON")
}
