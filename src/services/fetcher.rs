// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::config::AppConfig;
use crate::models::target::TargetUrl;
use crate::services::logging::redact_url;
use axum::body::Bytes;
use axum::http::header::{HeaderMap, HeaderValue, CONTENT_TYPE, USER_AGENT};
use axum::http::{Method, StatusCode};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("upstream returned {0}")]
    Status(StatusCode),
    #[error("failed to fetch content: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Outbound client settings.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub ogp_user_agent: String,
    pub proxy_user_agent: String,
    pub timeout: Option<Duration>,
    pub system_proxy: bool,
}

impl From<&AppConfig> for FetchSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            ogp_user_agent: config.ogp_user_agent.clone(),
            proxy_user_agent: config.proxy_user_agent.clone(),
            timeout: config.fetch_timeout(),
            system_proxy: !config.no_system_proxy,
        }
    }
}

/// Fully buffered upstream response relayed by the proxy.
#[derive(Debug)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Shared outbound HTTP client. Cloning is cheap; connections are pooled.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    ogp_user_agent: HeaderValue,
    proxy_user_agent: HeaderValue,
}

fn user_agent_value(agent: &str) -> HeaderValue {
    HeaderValue::from_str(agent).unwrap_or_else(|_| {
        tracing::warn!("Invalid user agent '{}', sending default", agent);
        HeaderValue::from_static(crate::models::config::DEFAULT_PROXY_USER_AGENT)
    })
}

impl UpstreamClient {
    pub fn new(settings: &FetchSettings) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        if !settings.system_proxy {
            builder = builder.no_proxy();
        }

        Ok(Self {
            client: builder.build()?,
            ogp_user_agent: user_agent_value(&settings.ogp_user_agent),
            proxy_user_agent: user_agent_value(&settings.proxy_user_agent),
        })
    }

    /// Fetch a page's HTML for metadata extraction.
    pub async fn fetch_html(&self, target: &TargetUrl) -> Result<String, FetchError> {
        tracing::debug!("Fetching page: {}", redact_url(target.as_url()));

        let response = self
            .client
            .get(target.as_url().clone())
            .header(USER_AGENT, self.ogp_user_agent.clone())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(
                "Upstream {} answered {}",
                redact_url(target.as_url()),
                status
            );
            return Err(FetchError::Status(status));
        }

        Ok(response.text().await?)
    }

    /// Send a proxied request upstream and buffer the whole answer.
    ///
    /// `headers` must already be filtered. A missing `user-agent` is filled
    /// with the configured proxy agent; a body is always sent as JSON.
    pub async fn forward(
        &self,
        method: Method,
        target: &TargetUrl,
        mut headers: HeaderMap,
        body: Option<Bytes>,
    ) -> Result<UpstreamResponse, FetchError> {
        if !headers.contains_key(USER_AGENT) {
            headers.insert(USER_AGENT, self.proxy_user_agent.clone());
        }

        let mut request = self.client.request(method.clone(), target.as_url().clone());
        if let Some(body) = body {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            request = request.body(body);
        }

        tracing::debug!("Proxying {} {}", method, redact_url(target.as_url()));
        let response = request.headers(headers).send().await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(UpstreamResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> FetchSettings {
        FetchSettings {
            ogp_user_agent: "TestBot/0.1".to_string(),
            proxy_user_agent: "TestProxy/0.1".to_string(),
            timeout: Some(Duration::from_secs(5)),
            system_proxy: false,
        }
    }

    #[test]
    fn test_client_builds_with_settings() {
        let client = UpstreamClient::new(&settings()).unwrap();
        assert_eq!(client.ogp_user_agent, "TestBot/0.1");
        assert_eq!(client.proxy_user_agent, "TestProxy/0.1");
    }

    #[test]
    fn test_invalid_user_agent_falls_back() {
        let mut settings = settings();
        settings.proxy_user_agent = "bad\nagent".to_string();
        let client = UpstreamClient::new(&settings).unwrap();
        assert_eq!(
            client.proxy_user_agent,
            crate::models::config::DEFAULT_PROXY_USER_AGENT
        );
    }

    #[tokio::test]
    async fn test_fetch_html_transport_error() {
        let client = UpstreamClient::new(&settings()).unwrap();
        // Port 9 on loopback (discard) is closed on test machines
        let target = TargetUrl::parse("http://127.0.0.1:9/").unwrap();
        let result = client.fetch_html(&target).await;
        assert!(matches!(result, Err(FetchError::Transport(_))));
    }
}
