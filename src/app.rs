// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Application state, route handlers, CORS, and router construction.
//!
//! This module is `pub` so that integration tests can build a test router directly
//! without starting the full binary.

use crate::models::config::AppConfig;
use crate::models::error::{ApiError, OGP_USAGE, OG_IMAGE_USAGE, PROXY_USAGE};
use crate::models::ogp::{ExtractionResult, OgImageResponse, OgpResponse};
use crate::models::proxy::{ProxyBody, UrlQuery};
use crate::models::target::TargetUrl;
use crate::models::version::VersionResponse;
use crate::services::extractor::MetadataExtractor;
use crate::services::fetcher::{FetchError, FetchSettings, UpstreamClient, UpstreamResponse};
use crate::services::headers::{Direction, HeaderFilter, HeaderPolicy};
use crate::services::logging::redact_url;
use axum::{
    body::{Body, Bytes},
    extract::{Query, State},
    http::{
        header::{
            HeaderMap, HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE,
        },
        Method, StatusCode,
    },
    middleware,
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde::de::IgnoredAny;
use std::sync::Arc;

/// Application version extracted from `Cargo.toml` at compile time.
/// The patch segment can be overridden via `OGP_PROXY_PATCH_VERSION` (see `build.rs`).
pub const VERSION: &str = env!("OGP_PROXY_VERSION");

const PROXY_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
const OGP_METHODS: &str = "GET, OPTIONS";

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Shared application state injected into every route handler via `State<AppState>`.
/// Nothing in here is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    pub upstream: UpstreamClient,
    pub header_filter: Arc<HeaderFilter>,
    pub extractor: Arc<MetadataExtractor>,
}

impl AppState {
    pub fn new(upstream: UpstreamClient, policy: HeaderPolicy) -> Self {
        Self {
            upstream,
            header_filter: Arc::new(HeaderFilter::new(policy)),
            extractor: Arc::new(MetadataExtractor::default()),
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, reqwest::Error> {
        let upstream = UpstreamClient::new(&FetchSettings::from(config))?;
        let policy = HeaderPolicy::from_mode(config.header_policy, &config.allowed_headers);
        Ok(Self::new(upstream, policy))
    }
}

/// Validate the raw `url` parameter before any network access.
fn parse_target(raw: Option<String>, usage: &'static str) -> Result<TargetUrl, ApiError> {
    let raw = raw
        .filter(|url| !url.is_empty())
        .ok_or(ApiError::MissingUrl { usage })?;
    TargetUrl::parse(&raw).map_err(|reason| ApiError::InvalidUrl {
        provided: raw,
        reason,
    })
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

pub async fn version_handler(State(state): State<AppState>) -> Json<VersionResponse> {
    Json(VersionResponse {
        agent: "ogp-proxy".to_string(),
        version: VERSION.to_string(),
        header_policy: state.header_filter.policy().mode().to_string(),
    })
}

/// Forward any request to `url` and relay the answer.
pub async fn proxy_handler(
    State(state): State<AppState>,
    method: Method,
    Query(query): Query<UrlQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    if method == Method::OPTIONS {
        return Ok(StatusCode::OK.into_response());
    }

    let mut raw = query.url;
    if method == Method::POST {
        if let Some(url) = ProxyBody::target_from(&body) {
            raw = Some(url);
        }
    }
    let target = parse_target(raw, PROXY_USAGE)?;

    let forwarded = state.header_filter.filter(&headers, Direction::Forward);
    let body = (method == Method::POST || method == Method::PUT).then_some(body);

    let upstream = state
        .upstream
        .forward(method, &target, forwarded, body)
        .await
        .map_err(|e| ApiError::ProxyFailed(e.to_string()))?;

    Ok(relay_response(&state.header_filter, upstream))
}

/// Rebuild the upstream answer for the caller: same status, filtered headers,
/// body bytes unchanged. The content type defaults to JSON when the body
/// parses as JSON and to HTML text otherwise.
fn relay_response(filter: &HeaderFilter, upstream: UpstreamResponse) -> Response {
    let is_json = serde_json::from_slice::<IgnoredAny>(&upstream.body).is_ok();
    let headers = filter.filter(&upstream.headers, Direction::Return);

    let mut response = Response::new(Body::from(upstream.body));
    *response.status_mut() = upstream.status;
    response.headers_mut().extend(headers);

    let default_type = if is_json {
        "application/json"
    } else {
        "text/html; charset=utf-8"
    };
    response
        .headers_mut()
        .entry(CONTENT_TYPE)
        .or_insert(HeaderValue::from_static(default_type));
    response
}

type Extraction = Result<ExtractionResult, FetchError>;

/// Fetch `url` and run the extraction chains over it.
async fn fetch_and_extract(
    state: &AppState,
    method: &Method,
    query: UrlQuery,
    usage: &'static str,
) -> Result<(TargetUrl, Extraction), ApiError> {
    if *method != Method::GET {
        return Err(ApiError::MethodNotAllowed);
    }
    let target = parse_target(query.url, usage)?;

    let extracted = state
        .upstream
        .fetch_html(&target)
        .await
        .map(|html| state.extractor.extract(&html, target.as_url()));

    if let Ok(result) = &extracted {
        tracing::info!(
            url = %redact_url(target.as_url()),
            title = ?result.title_source,
            description = ?result.description_source,
            image = ?result.image_source,
            "Extracted preview"
        );
    }
    Ok((target, extracted))
}

pub async fn ogp_handler(
    State(state): State<AppState>,
    method: Method,
    Query(query): Query<UrlQuery>,
) -> Result<Response, ApiError> {
    if method == Method::OPTIONS {
        return Ok(StatusCode::OK.into_response());
    }

    let (target, extracted) = fetch_and_extract(&state, &method, query, OGP_USAGE).await?;
    let result = extracted.map_err(|e| match e {
        FetchError::Status(status) => ApiError::UpstreamStatus(status),
        FetchError::Transport(e) => ApiError::ExtractionFailed(e.to_string()),
    })?;

    Ok(Json(OgpResponse::new(target.to_string(), result)).into_response())
}

/// Image-only lookup. Anything short of a resolved image is a 404.
pub async fn og_image_handler(
    State(state): State<AppState>,
    method: Method,
    Query(query): Query<UrlQuery>,
) -> Result<Response, ApiError> {
    if method == Method::OPTIONS {
        return Ok(StatusCode::OK.into_response());
    }

    let (target, extracted) = fetch_and_extract(&state, &method, query, OG_IMAGE_USAGE).await?;
    let not_found = || ApiError::ImageNotFound {
        url: target.to_string(),
    };

    let result = match extracted {
        Ok(result) => result,
        Err(FetchError::Status(_)) => return Err(not_found()),
        Err(FetchError::Transport(e)) => return Err(ApiError::ExtractionFailed(e.to_string())),
    };
    let image = result.image.ok_or_else(not_found)?;

    Ok(Json(OgImageResponse {
        url: target.to_string(),
        image,
        source: result.image_source,
    })
    .into_response())
}

// ---------------------------------------------------------------------------
// CORS
// ---------------------------------------------------------------------------

/// Add permissive CORS headers unless the relayed upstream response set its own.
fn with_cors(mut response: Response, methods: &'static str) -> Response {
    let headers = response.headers_mut();
    headers
        .entry(ACCESS_CONTROL_ALLOW_ORIGIN)
        .or_insert(HeaderValue::from_static("*"));
    headers
        .entry(ACCESS_CONTROL_ALLOW_METHODS)
        .or_insert(HeaderValue::from_static(methods));
    headers
        .entry(ACCESS_CONTROL_ALLOW_HEADERS)
        .or_insert(HeaderValue::from_static("*"));
    response
}

async fn proxy_cors(response: Response) -> Response {
    with_cors(response, PROXY_METHODS)
}

async fn ogp_cors(response: Response) -> Response {
    with_cors(response, OGP_METHODS)
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the Axum application router.
pub fn create_router(state: AppState) -> Router {
    let proxy_routes = Router::new()
        .route("/api/proxy", any(proxy_handler))
        .layer(middleware::map_response(proxy_cors));

    let ogp_routes = Router::new()
        .route("/api/ogp", any(ogp_handler))
        .route("/api/ogp/image", any(og_image_handler))
        .layer(middleware::map_response(ogp_cors));

    Router::new()
        .route("/version", get(version_handler))
        .merge(proxy_routes)
        .merge(ogp_routes)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::HeaderPolicyMode;
    use axum::http::Request;
    use tower::ServiceExt;

    fn create_test_app(policy: HeaderPolicy) -> Router {
        let upstream = UpstreamClient::new(&FetchSettings {
            ogp_user_agent: "TestBot/0.1".to_string(),
            proxy_user_agent: "TestProxy/0.1".to_string(),
            timeout: None,
            system_proxy: false,
        })
        .unwrap();
        create_router(AppState::new(upstream, policy))
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    async fn send_get(app: Router, uri: &str) -> Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_version_endpoint_response() {
        let response = send_get(create_test_app(HeaderPolicy::ExcludeList), "/version").await;
        assert_eq!(response.status(), StatusCode::OK);

        let content_type = response.headers().get("content-type").unwrap();
        assert_eq!(content_type, "application/json");

        let body = body_json(response).await;
        assert_eq!(body["agent"], "ogp-proxy");
        assert_eq!(body["version"], VERSION);
        assert_eq!(body["header_policy"], "exclude");
    }

    #[tokio::test]
    async fn test_version_reports_allow_policy() {
        let policy = HeaderPolicy::from_mode(HeaderPolicyMode::Allow, &[]);
        let body = body_json(send_get(create_test_app(policy), "/version").await).await;
        assert_eq!(body["header_policy"], "allow");
    }

    #[test]
    fn test_version_follows_semver_format() {
        let parts: Vec<&str> = VERSION.split('.').collect();
        assert_eq!(parts.len(), 3);
        assert!(parts.iter().all(|p| p.parse::<u32>().is_ok()));
    }

    #[tokio::test]
    async fn test_invalid_route_returns_404() {
        let response = send_get(create_test_app(HeaderPolicy::ExcludeList), "/invalid").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_ogp_missing_url() {
        let response = send_get(create_test_app(HeaderPolicy::ExcludeList), "/api/ogp").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );

        let body = body_json(response).await;
        assert_eq!(body["error"], "Missing url parameter");
        assert_eq!(body["usage"], OGP_USAGE);
    }

    #[tokio::test]
    async fn test_ogp_invalid_url_rejected_before_fetch() {
        let response = send_get(
            create_test_app(HeaderPolicy::ExcludeList),
            "/api/ogp?url=not-a-url",
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Invalid URL format");
        assert_eq!(body["provided"], "not-a-url");
    }

    #[tokio::test]
    async fn test_ogp_rejects_post() {
        let response = create_test_app(HeaderPolicy::ExcludeList)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/ogp?url=https://example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            response.headers().get(ACCESS_CONTROL_ALLOW_METHODS).unwrap(),
            OGP_METHODS
        );
    }

    #[tokio::test]
    async fn test_proxy_preflight() {
        let response = create_test_app(HeaderPolicy::ExcludeList)
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/proxy")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(ACCESS_CONTROL_ALLOW_METHODS).unwrap(),
            PROXY_METHODS
        );
        assert_eq!(
            response.headers().get(ACCESS_CONTROL_ALLOW_HEADERS).unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn test_proxy_missing_url() {
        let response = send_get(create_test_app(HeaderPolicy::ExcludeList), "/api/proxy").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["usage"], PROXY_USAGE);
    }

    #[tokio::test]
    async fn test_proxy_body_url_must_be_valid() {
        let response = create_test_app(HeaderPolicy::ExcludeList)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/proxy")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"url": "nope"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["provided"], "nope");
    }

    #[test]
    fn test_relay_response_defaults_content_type() {
        let filter = HeaderFilter::new(HeaderPolicy::ExcludeList);

        let json = relay_response(
            &filter,
            UpstreamResponse {
                status: StatusCode::CREATED,
                headers: HeaderMap::new(),
                body: Bytes::from_static(br#"{"ok":true}"#),
            },
        );
        assert_eq!(json.status(), StatusCode::CREATED);
        assert_eq!(json.headers()[CONTENT_TYPE], "application/json");

        let text = relay_response(
            &filter,
            UpstreamResponse {
                status: StatusCode::OK,
                headers: HeaderMap::new(),
                body: Bytes::from_static(b"<p>hi</p>"),
            },
        );
        assert_eq!(text.headers()[CONTENT_TYPE], "text/html; charset=utf-8");
    }

    #[test]
    fn test_relay_response_keeps_upstream_content_type() {
        let filter = HeaderFilter::new(HeaderPolicy::ExcludeList);
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        headers.insert("content-length", HeaderValue::from_static("2"));

        let response = relay_response(
            &filter,
            UpstreamResponse {
                status: StatusCode::OK,
                headers,
                body: Bytes::from_static(b"42"),
            },
        );
        assert_eq!(response.headers()[CONTENT_TYPE], "text/plain");
        assert!(response.headers().get("content-length").is_none());
    }
}
