// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Text-pattern rules that locate preview metadata in raw HTML.
//!
//! Not a parser: every lookup is a regex over the document
//! text, takes the first hit in document order, and knows nothing about tag
//! nesting or whether a `<meta>` sits inside `<head>`. Attribute values that
//! contain the other quote character (`content="it's"`) are cut short at that
//! quote; that is a known limitation of the rules.
//!
//! The extractor only talks to [`TagMatcher`], so the rules here can be swapped
//! for a real tokenizer without touching the fallback chains.

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Logical meta keys, matched against either a `property` or a `name` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaKey {
    OgTitle,
    OgDescription,
    OgImage,
    Description,
}

impl MetaKey {
    pub fn name(&self) -> &'static str {
        match self {
            MetaKey::OgTitle => "og:title",
            MetaKey::OgDescription => "og:description",
            MetaKey::OgImage => "og:image",
            MetaKey::Description => "description",
        }
    }

    fn rule(&self) -> &'static MetaRule {
        match self {
            MetaKey::OgTitle => &*OG_TITLE,
            MetaKey::OgDescription => &*OG_DESCRIPTION,
            MetaKey::OgImage => &*OG_IMAGE,
            MetaKey::Description => &*META_DESCRIPTION,
        }
    }
}

/// Elements whose text content is read directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextElement {
    Title,
    H1,
}

/// An `<img>` tag with a non-empty `src`, borrowed from the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageTag<'a> {
    pub src: &'a str,
    pub class: Option<&'a str>,
    pub id: Option<&'a str>,
}

pub trait TagMatcher {
    /// `content` of the first `<meta>` carrying `key`, in either attribute order.
    fn meta_content(&self, html: &str, key: MetaKey) -> Option<String>;

    /// Trimmed text of the first `element` whose body contains no nested tags.
    fn element_text(&self, html: &str, element: TextElement) -> Option<String>;

    /// All `<img>` tags with a `src`, in document order.
    fn images<'a>(&self, html: &'a str) -> Vec<ImageTag<'a>>;
}

/// Regex-backed [`TagMatcher`]. Patterns are compiled once per process.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexMatcher;

struct MetaRule {
    key_first: Regex,
    content_first: Regex,
}

impl MetaRule {
    fn new(key: &str) -> Self {
        let key = regex::escape(key);
        let key_first = format!(
            r#"(?i)<meta[^>]*(?:property|name)=["']{key}["'][^>]*content=["']([^"']+)["'][^>]*>"#
        );
        let content_first = format!(
            r#"(?i)<meta[^>]*content=["']([^"']+)["'][^>]*(?:property|name)=["']{key}["'][^>]*>"#
        );
        Self {
            key_first: Regex::new(&key_first).expect("meta key-first pattern compiles"),
            content_first: Regex::new(&content_first).expect("meta content-first pattern compiles"),
        }
    }

    fn find(&self, html: &str) -> Option<String> {
        let key_first = self.key_first.captures(html);
        let content_first = self.content_first.captures(html);

        let winner = match (key_first, content_first) {
            (Some(a), Some(b)) => Some(earliest(a, b)),
            (a, b) => a.or(b),
        };
        winner
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }
}

fn match_start(caps: &Captures<'_>) -> usize {
    caps.get(0).map_or(usize::MAX, |m| m.start())
}

fn earliest<'h>(a: Captures<'h>, b: Captures<'h>) -> Captures<'h> {
    if match_start(&b) < match_start(&a) {
        b
    } else {
        a
    }
}

static OG_TITLE: LazyLock<MetaRule> = LazyLock::new(|| MetaRule::new("og:title"));
static OG_DESCRIPTION: LazyLock<MetaRule> = LazyLock::new(|| MetaRule::new("og:description"));
static OG_IMAGE: LazyLock<MetaRule> = LazyLock::new(|| MetaRule::new("og:image"));
static META_DESCRIPTION: LazyLock<MetaRule> = LazyLock::new(|| MetaRule::new("description"));

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<title[^>]*>([^<]+)</title>").expect("title pattern"));
static H1_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<h1[^>]*>([^<]+)</h1>").expect("h1 pattern"));

static IMG_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<img\b[^>]*>").expect("img pattern"));
static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("attribute pattern")
});

impl TagMatcher for RegexMatcher {
    fn meta_content(&self, html: &str, key: MetaKey) -> Option<String> {
        key.rule().find(html)
    }

    fn element_text(&self, html: &str, element: TextElement) -> Option<String> {
        let re = match element {
            TextElement::Title => &TITLE_RE,
            TextElement::H1 => &H1_RE,
        };
        re.captures(html)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
    }

    fn images<'a>(&self, html: &'a str) -> Vec<ImageTag<'a>> {
        IMG_TAG_RE
            .find_iter(html)
            .filter_map(|tag| parse_image_tag(tag.as_str()))
            .collect()
    }
}

fn parse_image_tag(tag: &str) -> Option<ImageTag<'_>> {
    let mut src = None;
    let mut class = None;
    let mut id = None;

    for caps in ATTR_RE.captures_iter(tag) {
        let (Some(name), Some(value)) = (caps.get(1), caps.get(2).or_else(|| caps.get(3))) else {
            continue;
        };
        let slot = match name.as_str().to_ascii_lowercase().as_str() {
            "src" => &mut src,
            "class" => &mut class,
            "id" => &mut id,
            _ => continue,
        };
        // First occurrence of a repeated attribute wins, as in browsers
        if slot.is_none() {
            *slot = Some(value.as_str());
        }
    }

    let src = src.filter(|s| !s.is_empty())?;
    Some(ImageTag { src, class, id })
}
