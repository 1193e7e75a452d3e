// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use std::fmt;
use thiserror::Error;
use url::Url;

/// Why a raw `url` parameter was rejected before any network access.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TargetError {
    #[error("not an absolute URL: {0}")]
    Parse(#[from] url::ParseError),
    #[error("unsupported scheme '{0}', expected http or https")]
    UnsupportedScheme(String),
}

/// A validated absolute http(s) URL.
///
/// Used both as the outbound fetch target and as the base for resolving
/// relative image references found in the fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetUrl(Url);

impl TargetUrl {
    /// Validate a caller-supplied URL string.
    pub fn parse(raw: &str) -> Result<Self, TargetError> {
        let url = Url::parse(raw.trim())?;
        match url.scheme() {
            "http" | "https" => Ok(Self(url)),
            other => Err(TargetError::UnsupportedScheme(other.to_string())),
        }
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for TargetUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
