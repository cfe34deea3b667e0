//! Shared types handed between pipeline stages and to the presentation layer.
//!
//! Everything here is built fresh during a single build pass and serialized
//! as JSON when the CLI writes models to disk.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A document attribute that can be requested from the content store.
///
/// Names match the front-matter keys (`coverImage`, `ogImage`), with
/// `content` standing for the markdown body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Title,
    Date,
    Slug,
    Author,
    Content,
    CoverImage,
    OgImage,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Title,
        Field::Date,
        Field::Slug,
        Field::Author,
        Field::Content,
        Field::CoverImage,
        Field::OgImage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Date => "date",
            Field::Slug => "slug",
            Field::Author => "author",
            Field::Content => "content",
            Field::CoverImage => "coverImage",
            Field::OgImage => "ogImage",
        }
    }
}

/// Post author as shown in the post header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

/// One markdown post, restricted to the attributes that were requested.
///
/// `slug` is always populated; it is the filename stem of the backing file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    /// Raw markdown following the front-matter block, byte for byte.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_image: Option<String>,
}

impl Document {
    /// A document carrying only its slug.
    pub fn bare(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            title: None,
            date: None,
            author: None,
            body: None,
            cover_image: None,
            og_image: None,
        }
    }
}

/// Pixel dimensions of a resolved image. Both sides are strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDimensions {
    width: u32,
    height: u32,
}

impl ImageDimensions {
    /// Returns `None` when either side is zero.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            None
        } else {
            Some(Self { width, height })
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Presentation-ready data for one document.
///
/// `image_sizes` holds an entry only for images whose dimensions were
/// resolved; an absent key means "unknown", never "zero-sized".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderingModel {
    pub document: Document,
    pub image_sizes: BTreeMap<String, ImageDimensions>,
}

/// One addressable page for the static-generation driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlugPath {
    pub slug: String,
}

/// Ordered list of every page to pre-render.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlugIndex {
    pub paths: Vec<SlugPath>,
}

impl SlugIndex {
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn slugs(&self) -> Vec<String> {
        self.paths.iter().map(|p| p.slug.clone()).collect()
    }
}
