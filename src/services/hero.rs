// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Heuristic "main image" lookup for pages without `og:image`.

use crate::services::matcher::{ImageTag, TagMatcher};
use regex::Regex;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy)]
enum HeroAttr {
    Class,
    Id,
}

/// Structural rules, tried in this order. A match on an earlier rule wins even
/// if a later rule matches an image higher up in the page.
const HERO_RULES: [(HeroAttr, &str); 4] = [
    (HeroAttr::Class, "hero"),
    (HeroAttr::Class, "banner"),
    (HeroAttr::Class, "featured"),
    (HeroAttr::Id, "hero"),
];

static UI_ASSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?-u:\b)(icon|logo|avatar|thumb|small|btn|button)(?-u:\b)")
        .expect("ui asset pattern")
});

fn matches_rule(image: &ImageTag<'_>, attr: HeroAttr, token: &str) -> bool {
    let value = match attr {
        HeroAttr::Class => image.class,
        HeroAttr::Id => image.id,
    };
    value.is_some_and(|v| v.to_ascii_lowercase().contains(token))
}

/// Whether `src` looks like page chrome rather than content: named like an
/// icon/logo/button, an SVG, or inline image data.
pub fn is_ui_asset(src: &str) -> bool {
    let lower = src.to_ascii_lowercase();
    UI_ASSET_RE.is_match(src) || lower.ends_with(".svg") || lower.contains("data:image")
}

/// Pick the `src` of the page's hero image, if any.
pub fn find_hero_image<M: TagMatcher>(matcher: &M, html: &str) -> Option<String> {
    let images = matcher.images(html);

    let structural = HERO_RULES.iter().find_map(|(attr, token)| {
        images
            .iter()
            .find(|image| matches_rule(image, *attr, token))
            .map(|image| image.src)
    });

    structural
        .or_else(|| {
            images
                .iter()
                .map(|image| image.src)
                .find(|src| !is_ui_asset(src))
        })
        .map(str::to_string)
}
