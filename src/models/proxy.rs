// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use serde::Deserialize;

/// `?url=` query parameter accepted by every endpoint
#[derive(Debug, Default, Deserialize)]
pub struct UrlQuery {
    pub url: Option<String>,
}

/// JSON body of a POST to the proxy. Only `url` is read; the whole body is
/// still forwarded upstream unchanged.
#[derive(Debug, Deserialize)]
pub struct ProxyBody {
    pub url: Option<String>,
}

impl ProxyBody {
    /// Target URL carried in a JSON body, if the body is JSON and has one.
    pub fn target_from(body: &[u8]) -> Option<String> {
        serde_json::from_slice::<ProxyBody>(body)
            .ok()
            .and_then(|b| b.url)
            .filter(|url| !url.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_from_json_body() {
        let body = br#"{"url": "https://api.example.com/v1", "payload": 1}"#;
        assert_eq!(
            ProxyBody::target_from(body),
            Some("https://api.example.com/v1".to_string())
        );
    }

    #[test]
    fn test_target_from_non_json_body() {
        assert_eq!(ProxyBody::target_from(b"plain text"), None);
        assert_eq!(ProxyBody::target_from(b""), None);
    }

    #[test]
    fn test_target_from_body_without_url() {
        assert_eq!(ProxyBody::target_from(br#"{"other": true}"#), None);
        assert_eq!(ProxyBody::target_from(br#"{"url": ""}"#), None);
    }
}
