// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Error responses shared by the HTTP handlers.

use crate::models::target::TargetError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

pub const PROXY_USAGE: &str = "GET /api/proxy?url=https://example.com/api/endpoint OR POST with {\"url\": \"https://example.com/api/endpoint\"}";
pub const OGP_USAGE: &str = "GET /api/ogp?url=https://example.com";
pub const OG_IMAGE_USAGE: &str = "GET /api/ogp/image?url=https://example.com";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("missing url parameter")]
    MissingUrl { usage: &'static str },
    #[error("invalid url '{provided}': {reason}")]
    InvalidUrl {
        provided: String,
        reason: TargetError,
    },
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("upstream returned {0}")]
    UpstreamStatus(StatusCode),
    #[error("no image found for {url}")]
    ImageNotFound { url: String },
    #[error("proxy request failed: {0}")]
    ProxyFailed(String),
    #[error("ogp extraction failed: {0}")]
    ExtractionFailed(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::MissingUrl { usage } => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Missing url parameter", "usage": usage }),
            ),
            ApiError::InvalidUrl { provided, .. } => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Invalid URL format", "provided": provided }),
            ),
            ApiError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                json!({
                    "error": "Method not allowed",
                    "message": "Only GET requests are supported"
                }),
            ),
            ApiError::UpstreamStatus(status) => (
                status,
                json!({
                    "error": "Failed to fetch URL",
                    "status": status.as_u16(),
                    "statusText": status.canonical_reason().unwrap_or(""),
                }),
            ),
            ApiError::ImageNotFound { url } => (
                StatusCode::NOT_FOUND,
                json!({ "error": "No image found", "url": url }),
            ),
            ApiError::ProxyFailed(message) => {
                tracing::error!("Proxy error: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Proxy request failed", "message": message }),
                )
            }
            ApiError::ExtractionFailed(message) => {
                tracing::error!("OGP extraction error: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "OGP extraction failed", "message": message }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
