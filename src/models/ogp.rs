// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use serde::{Serialize, Serializer};

/// Which strategy produced the title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleSource {
    OgTitle,
    TitleTag,
    H1,
    None,
}

/// Which strategy produced the description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptionSource {
    OgDescription,
    MetaDescription,
    None,
}

/// Which strategy produced the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    OgImage,
    Hero,
    None,
}

impl TitleSource {
    /// Provenance label reported to clients. `<title>` and `<h1>` both report
    /// as "title" to keep the response shape stable for existing consumers.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            TitleSource::OgTitle => Some("og:title"),
            TitleSource::TitleTag | TitleSource::H1 => Some("title"),
            TitleSource::None => None,
        }
    }
}

impl DescriptionSource {
    pub fn label(&self) -> Option<&'static str> {
        match self {
            DescriptionSource::OgDescription => Some("og:description"),
            DescriptionSource::MetaDescription => Some("meta"),
            DescriptionSource::None => None,
        }
    }
}

impl ImageSource {
    pub fn label(&self) -> Option<&'static str> {
        match self {
            ImageSource::OgImage => Some("og:image"),
            ImageSource::Hero => Some("hero"),
            ImageSource::None => None,
        }
    }
}

fn serialize_label<S: Serializer>(label: Option<&'static str>, s: S) -> Result<S::Ok, S::Error> {
    match label {
        Some(label) => s.serialize_str(label),
        None => s.serialize_none(),
    }
}

impl Serialize for TitleSource {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        serialize_label(self.label(), s)
    }
}

impl Serialize for DescriptionSource {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        serialize_label(self.label(), s)
    }
}

impl Serialize for ImageSource {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        serialize_label(self.label(), s)
    }
}

/// Preview metadata recovered from one HTML document.
///
/// `None` means no strategy in the chain produced a value; `Some("")` is a
/// present but empty value and is reported as such.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Absolute image URL, already resolved against the page URL.
    pub image: Option<String>,
    pub title_source: TitleSource,
    pub description_source: DescriptionSource,
    pub image_source: ImageSource,
}

/// Provenance of each field in an `OgpResponse`.
#[derive(Debug, Serialize)]
pub struct SourceTypes {
    pub title: TitleSource,
    pub description: DescriptionSource,
    pub image: ImageSource,
}

/// Response body of `GET /api/ogp`.
#[derive(Debug, Serialize)]
pub struct OgpResponse {
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    #[serde(rename = "type")]
    pub source: SourceTypes,
}

impl OgpResponse {
    pub fn new(url: String, result: ExtractionResult) -> Self {
        Self {
            url,
            title: result.title,
            description: result.description,
            image: result.image,
            source: SourceTypes {
                title: result.title_source,
                description: result.description_source,
                image: result.image_source,
            },
        }
    }
}

/// Response body of `GET /api/ogp/image`. Only built when an image was found.
#[derive(Debug, Serialize)]
pub struct OgImageResponse {
    pub url: String,
    pub image: String,
    #[serde(rename = "type")]
    pub source: ImageSource,
}
