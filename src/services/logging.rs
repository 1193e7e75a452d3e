// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Logging setup and redaction of proxied URLs.

use tracing_subscriber::EnvFilter;
use url::Url;

/// Initialize structured logging to stderr. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,ogp_proxy=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Render a URL for logging without credentials, query string, or fragment.
/// Proxied API calls routinely carry tokens in the query: "https://api.ex.com/v1?…"
pub fn redact_url(url: &Url) -> String {
    let host = url.host_str().unwrap_or("");
    let port = url.port().map(|p| format!(":{}", p)).unwrap_or_default();
    let suffix = if url.query().is_some() { "?…" } else { "" };
    format!("{}://{}{}{}{}", url.scheme(), host, port, url.path(), suffix)
}
