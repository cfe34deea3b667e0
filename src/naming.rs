//! Slug convention for post filenames.
//!
//! A post's slug is its filename with the `.md` extension removed:
//!
//! - `hello-world.md` → `hello-world`
//! - `dynamic-routing.md` → `dynamic-routing`
//! - `v1.2-release.md` → `v1.2-release`
//!
//! Slugs end up in URLs and are mapped straight back to filenames, so only
//! URL-safe stems are accepted. Everything else is rejected rather than
//! rewritten, which keeps the slug ↔ file mapping one-to-one.

use std::path::Path;

/// Extension (without dot) that marks a file as a post.
pub const POST_EXTENSION: &str = "md";

/// Whether `slug` is safe to use as a URL segment and as a filename stem.
///
/// Allowed: ASCII letters, digits, `-`, `_`, and `.` when it is neither the
/// first nor the last character (so `.`, `..` and hidden names are out).
pub fn is_url_safe(slug: &str) -> bool {
    if slug.is_empty() || slug.starts_with('.') || slug.ends_with('.') {
        return false;
    }
    slug.chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// Derive the slug for a post file, or `None` if the file is not a post.
///
/// Hidden files, other extensions, and stems that are not URL-safe all
/// return `None`.
pub fn slug_from_path(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    if file_name.starts_with('.') {
        return None;
    }
    let stem = file_name.strip_suffix(POST_EXTENSION)?.strip_suffix('.')?;
    is_url_safe(stem).then(|| stem.to_string())
}

/// Filename backing `slug`.
pub fn file_name_for(slug: &str) -> String {
    format!("{slug}.{POST_EXTENSION}")
}
