// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_OGP_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; OGP-Bot/1.0.0; +https://cors-proxy.vercel.app)";
pub const DEFAULT_PROXY_USER_AGENT: &str = "CORS-Proxy/1.0.0";

/// Which inbound headers the proxy forwards upstream.
///
/// Exclude: forward everything except hop-by-hop and platform-injected headers.
///
/// Allow: forward only an explicit list of header names; hop-by-hop and
/// platform headers stay excluded even if listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HeaderPolicyMode {
    Exclude,
    Allow,
}

impl std::fmt::Display for HeaderPolicyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HeaderPolicyMode::Exclude => write!(f, "exclude"),
            HeaderPolicyMode::Allow => write!(f, "allow"),
        }
    }
}

/// Service configuration. Every flag can also be set through its environment variable.
#[derive(Debug, Clone, Parser)]
#[command(name = "ogp-proxy", about = "CORS proxy and Open Graph preview service")]
pub struct AppConfig {
    /// Address the HTTP server binds to
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:3000")]
    pub bind_addr: SocketAddr,

    /// Inbound header forwarding policy for the proxy endpoint
    #[arg(long, env = "HEADER_POLICY", value_enum, default_value_t = HeaderPolicyMode::Exclude)]
    pub header_policy: HeaderPolicyMode,

    /// Comma-separated header names forwarded in `allow` mode
    #[arg(long, env = "ALLOWED_HEADERS", value_delimiter = ',')]
    pub allowed_headers: Vec<String>,

    /// User agent sent when fetching pages for metadata extraction
    #[arg(long, env = "OGP_USER_AGENT", default_value = DEFAULT_OGP_USER_AGENT)]
    pub ogp_user_agent: String,

    /// User agent used by the proxy when the caller did not send one
    #[arg(long, env = "PROXY_USER_AGENT", default_value = DEFAULT_PROXY_USER_AGENT)]
    pub proxy_user_agent: String,

    /// Deadline for a single upstream fetch, unlimited when unset
    #[arg(long, env = "FETCH_TIMEOUT_SECS")]
    pub fetch_timeout_secs: Option<u64>,

    /// Ignore HTTP_PROXY/HTTPS_PROXY for outbound fetches
    #[arg(long, env = "NO_SYSTEM_PROXY")]
    pub no_system_proxy: bool,
}

impl AppConfig {
    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::try_parse_from(["ogp-proxy"]).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(config.header_policy, HeaderPolicyMode::Exclude);
        assert_eq!(config.proxy_user_agent, DEFAULT_PROXY_USER_AGENT);
        assert!(config.fetch_timeout().is_none());
    }

    #[test]
    fn test_allow_mode_with_header_list() {
        let config = AppConfig::try_parse_from([
            "ogp-proxy",
            "--header-policy",
            "allow",
            "--allowed-headers",
            "accept,authorization",
        ])
        .unwrap();
        assert_eq!(config.header_policy, HeaderPolicyMode::Allow);
        assert_eq!(config.allowed_headers, vec!["accept", "authorization"]);
    }

    #[test]
    fn test_invalid_policy_rejected() {
        assert!(AppConfig::try_parse_from(["ogp-proxy", "--header-policy", "open"]).is_err());
    }

    #[test]
    fn test_fetch_timeout() {
        let config =
            AppConfig::try_parse_from(["ogp-proxy", "--fetch-timeout-secs", "7"]).unwrap();
        assert_eq!(config.fetch_timeout(), Some(Duration::from_secs(7)));
    }

    #[test]
    fn test_display_produces_lowercase() {
        assert_eq!(HeaderPolicyMode::Exclude.to_string(), "exclude");
        assert_eq!(HeaderPolicyMode::Allow.to_string(), "allow");
    }
}
