// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use thiserror::Error;
use url::Url;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("cannot resolve '{reference}' against {base}: {source}")]
pub struct ResolutionError {
    pub reference: String,
    pub base: String,
    #[source]
    pub source: url::ParseError,
}

fn has_http_scheme(reference: &str) -> bool {
    let head = reference.get(..8).unwrap_or(reference).to_ascii_lowercase();
    head.starts_with("http://") || head.starts_with("https://")
}

/// Resolve an image reference found in a page against the page URL.
///
/// References that already carry an http(s) scheme are returned untouched,
/// without re-validating their authority.
pub fn resolve(reference: &str, base: &Url) -> Result<String, ResolutionError> {
    if has_http_scheme(reference) {
        return Ok(reference.to_string());
    }

    base.join(reference)
        .map(|url| url.to_string())
        .map_err(|source| ResolutionError {
            reference: reference.to_string(),
            base: base.to_string(),
            source,
        })
}
