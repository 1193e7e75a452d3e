// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Fallback chains that turn raw HTML into an [`ExtractionResult`].
//!
//! Each field has an ordered list of strategies; the first one that yields a
//! value wins and also becomes the field's provenance. Extraction is pure: the
//! page must already have been fetched by the caller.

use crate::models::ogp::{DescriptionSource, ExtractionResult, ImageSource, TitleSource};
use crate::services::hero::find_hero_image;
use crate::services::matcher::{MetaKey, RegexMatcher, TagMatcher, TextElement};
use crate::services::resolver::resolve;
use url::Url;

const TITLE_CHAIN: [TitleSource; 3] = [TitleSource::OgTitle, TitleSource::TitleTag, TitleSource::H1];
const DESCRIPTION_CHAIN: [DescriptionSource; 2] = [
    DescriptionSource::OgDescription,
    DescriptionSource::MetaDescription,
];
const IMAGE_CHAIN: [ImageSource; 2] = [ImageSource::OgImage, ImageSource::Hero];

/// One step of a fallback chain.
trait Strategy: Copy {
    const NONE: Self;

    fn run<M: TagMatcher>(self, matcher: &M, html: &str) -> Option<String>;
}

impl Strategy for TitleSource {
    const NONE: Self = TitleSource::None;

    fn run<M: TagMatcher>(self, matcher: &M, html: &str) -> Option<String> {
        match self {
            TitleSource::OgTitle => matcher.meta_content(html, MetaKey::OgTitle),
            TitleSource::TitleTag => matcher.element_text(html, TextElement::Title),
            TitleSource::H1 => matcher.element_text(html, TextElement::H1),
            TitleSource::None => None,
        }
    }
}

impl Strategy for DescriptionSource {
    const NONE: Self = DescriptionSource::None;

    fn run<M: TagMatcher>(self, matcher: &M, html: &str) -> Option<String> {
        match self {
            DescriptionSource::OgDescription => matcher.meta_content(html, MetaKey::OgDescription),
            DescriptionSource::MetaDescription => matcher.meta_content(html, MetaKey::Description),
            DescriptionSource::None => None,
        }
    }
}

impl Strategy for ImageSource {
    const NONE: Self = ImageSource::None;

    fn run<M: TagMatcher>(self, matcher: &M, html: &str) -> Option<String> {
        match self {
            ImageSource::OgImage => matcher.meta_content(html, MetaKey::OgImage),
            ImageSource::Hero => find_hero_image(matcher, html),
            ImageSource::None => None,
        }
    }
}

fn first_hit<S: Strategy, M: TagMatcher>(chain: &[S], matcher: &M, html: &str) -> (Option<String>, S) {
    chain
        .iter()
        .find_map(|strategy| strategy.run(matcher, html).map(|value| (Some(value), *strategy)))
        .unwrap_or((None, S::NONE))
}

/// Extracts preview metadata with a pluggable [`TagMatcher`].
#[derive(Debug, Clone, Default)]
pub struct MetadataExtractor<M = RegexMatcher> {
    matcher: M,
}

impl<M: TagMatcher> MetadataExtractor<M> {
    pub fn new(matcher: M) -> Self {
        Self { matcher }
    }

    pub fn extract(&self, html: &str, base_url: &Url) -> ExtractionResult {
        let (title, title_source) = first_hit(&TITLE_CHAIN, &self.matcher, html);
        let (description, description_source) = first_hit(&DESCRIPTION_CHAIN, &self.matcher, html);
        let (raw_image, image_source) = first_hit(&IMAGE_CHAIN, &self.matcher, html);

        // An image that cannot be made absolute counts as no image at all
        let (image, image_source) = match raw_image.map(|reference| resolve(&reference, base_url)) {
            Some(Ok(image)) => (Some(image), image_source),
            Some(Err(e)) => {
                tracing::debug!("Dropping unresolvable image: {}", e);
                (None, ImageSource::None)
            }
            None => (None, image_source),
        };

        ExtractionResult {
            title,
            description,
            image,
            title_source,
            description_source,
            image_source,
        }
    }
}
