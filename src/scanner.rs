//! Image reference scanning.
//!
//! Walks the `pulldown-cmark` event stream of a post body and collects the
//! destination of every image node. Working on parsed events rather than raw
//! text means images inside code spans/blocks are not picked up, and
//! reference-style images (`![alt][ref]`) resolve to their real destination.

use pulldown_cmark::{Event, Options, Parser, Tag};

/// Markdown extensions shared by scanning and rendering, so both see the
/// same document structure.
pub fn markdown_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
}

/// One image occurrence in a body, in text order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    pub path: String,
}

impl ImageReference {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Whether the reference points off-site (`https://…`, `data:…`, `//cdn…`).
    pub fn is_external(&self) -> bool {
        is_external(&self.path)
    }
}

/// True when `path` carries a URI scheme or is protocol-relative.
pub fn is_external(path: &str) -> bool {
    if path.starts_with("//") {
        return true;
    }
    let Some(colon) = path.find(':') else {
        return false;
    };
    let scheme = &path[..colon];
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Every image reference in `body`, duplicates included, empty paths skipped.
pub fn scan(body: &str) -> Vec<ImageReference> {
    Parser::new_ext(body, markdown_options())
        .filter_map(|event| match event {
            Event::Start(Tag::Image { dest_url, .. }) if !dest_url.is_empty() => {
                Some(ImageReference::new(dest_url.into_string()))
            }
            _ => None,
        })
        .collect()
}

/// Distinct paths in first-occurrence order.
pub fn unique_paths(refs: &[ImageReference]) -> Vec<&str> {
    let mut seen = std::collections::HashSet::new();
    refs.iter()
        .map(|r| r.path.as_str())
        .filter(|path| seen.insert(*path))
        .collect()
}
