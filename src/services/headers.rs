// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Header policies for the proxy path.
//!
//! `HeaderMap` stores names lowercased, so every comparison here is already
//! case-insensitive; `Host`, `HOST` and `host` all land on the same entry.

use crate::models::config::HeaderPolicyMode;
use axum::http::header::{HeaderMap, HeaderName};

/// Connection-scoped headers (RFC 7230) that an intermediary must not forward.
pub const HOP_BY_HOP: &[&str] = &[
    "host",
    "connection",
    "upgrade",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
];

/// Headers injected by the hosting platform or CDN in front of the proxy.
pub const PLATFORM_INJECTED: &[&str] = &[
    "x-vercel-id",
    "x-vercel-deployment-url",
    "x-vercel-forwarded-for",
    "x-vercel-proxy-signature",
    "x-vercel-proxy-signature-ts",
    "x-vercel-oidc-token",
    "forwarded",
    "x-forwarded-host",
    "x-forwarded-for",
    "x-forwarded-proto",
    "cf-ray",
    "cf-visitor",
    "cf-connecting-ip",
];

/// Request headers the outbound client sets itself: it negotiates and decodes
/// the transfer encoding, and sizes the body it actually sends.
pub const SET_BY_CLIENT: &[&str] = &["accept-encoding", "content-length"];

/// Upstream response headers the local transport recomputes for the relayed body.
pub const RECOMPUTED_ON_RETURN: &[&str] = &["content-encoding", "content-length", "transfer-encoding"];

/// Forwarded in allow-list mode when no explicit list is configured.
pub const DEFAULT_ALLOWED: &[&str] = &[
    "accept",
    "accept-language",
    "authorization",
    "cache-control",
    "content-type",
    "if-match",
    "if-modified-since",
    "if-none-match",
    "user-agent",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Inbound request headers on their way upstream.
    Forward,
    /// Upstream response headers on their way back to the caller.
    Return,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderPolicy {
    ExcludeList,
    AllowList(Vec<HeaderName>),
}

impl HeaderPolicy {
    /// Build the policy selected in configuration. Names that are not valid
    /// header names are skipped with a warning.
    pub fn from_mode(mode: HeaderPolicyMode, allowed: &[String]) -> Self {
        match mode {
            HeaderPolicyMode::Exclude => HeaderPolicy::ExcludeList,
            HeaderPolicyMode::Allow => {
                let names: Vec<HeaderName> = if allowed.is_empty() {
                    DEFAULT_ALLOWED
                        .iter()
                        .map(|name| HeaderName::from_static(*name))
                        .collect()
                } else {
                    allowed
                        .iter()
                        .filter_map(|name| match HeaderName::try_from(name.trim()) {
                            Ok(name) => Some(name),
                            Err(_) => {
                                tracing::warn!("Ignoring invalid allowed header name: {}", name);
                                None
                            }
                        })
                        .collect()
                };
                HeaderPolicy::AllowList(names)
            }
        }
    }

    pub fn mode(&self) -> HeaderPolicyMode {
        match self {
            HeaderPolicy::ExcludeList => HeaderPolicyMode::Exclude,
            HeaderPolicy::AllowList(_) => HeaderPolicyMode::Allow,
        }
    }
}

fn listed(name: &HeaderName, list: &[&str]) -> bool {
    list.contains(&name.as_str())
}

#[derive(Debug, Clone)]
pub struct HeaderFilter {
    policy: HeaderPolicy,
}

impl HeaderFilter {
    pub fn new(policy: HeaderPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &HeaderPolicy {
        &self.policy
    }

    fn forwardable(&self, name: &HeaderName) -> bool {
        if listed(name, HOP_BY_HOP)
            || listed(name, PLATFORM_INJECTED)
            || listed(name, SET_BY_CLIENT)
        {
            return false;
        }
        match &self.policy {
            HeaderPolicy::ExcludeList => true,
            HeaderPolicy::AllowList(allowed) => allowed.contains(name),
        }
    }

    /// Copy the headers that may cross the proxy in `direction`, keeping
    /// order and repeated values.
    pub fn filter(&self, headers: &HeaderMap, direction: Direction) -> HeaderMap {
        let mut kept = HeaderMap::with_capacity(headers.len());
        for (name, value) in headers {
            let keep = match direction {
                Direction::Forward => self.forwardable(name),
                Direction::Return => !listed(name, RECOMPUTED_ON_RETURN),
            };
            if keep {
                kept.append(name.clone(), value.clone());
            }
        }
        kept
    }
}
