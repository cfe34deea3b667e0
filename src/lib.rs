//! # Post Pipeline
//!
//! The content pipeline behind a statically generated blog. Markdown posts in
//! a content directory become presentation-ready rendering models, and every
//! image a post references is annotated with its pixel dimensions so the page
//! can reserve layout space before the image loads.
//!
//! # Architecture
//!
//! ```text
//! _posts/<slug>.md ─┬─ paths::enumerate   →  SlugIndex       (one page per slug)
//!                   └─ Pipeline::build    →  RenderingModel  (document + image sizes)
//!
//! build(slug):  store::load_document → scanner::scan → resolver::resolve (per unique path)
//! ```
//!
//! Loading a document either succeeds or fails for that slug alone. Image
//! resolution never fails a build: an image whose size cannot be determined is
//! left out of the model's `image_sizes` and reported as a diagnostic.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`store`] | Lists slugs and loads posts restricted to requested fields |
//! | [`frontmatter`] | Splits a post into its YAML front-matter and markdown body |
//! | [`scanner`] | Finds image references in a markdown body |
//! | [`resolver`] | Maps image paths onto the asset root and reads their dimensions |
//! | [`imaging`] | Header-only dimension probing behind the `ImageBackend` trait |
//! | [`pipeline`] | Per-document build, parallel build passes, diagnostics |
//! | [`paths`] | Slug index for static generation |
//! | [`render`] | Reference HTML presentation of a rendering model using Maud |
//! | [`config`] | `config.toml` loading, merging over stock defaults, validation |
//! | [`types`] | Models shared between stages and serialized to JSON |
//! | [`naming`] | Filename ⇄ slug convention |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## The Filename Is the Slug
//!
//! A post's slug is its filename without `.md`. A `slug` key in front-matter
//! is ignored, so the URL of a page can never disagree with the file backing
//! it, and enumeration needs nothing but a directory listing.
//!
//! ## Header Probes, Not Decodes
//!
//! Dimensions come from the image header via the `image` crate's format
//! readers (and `avif-parse` for AVIF containers). No pixel data is decoded,
//! so sizing a post with a dozen large photos stays cheap.
//!
//! ## Missing Sizes Are Not Errors
//!
//! Remote images, typos in paths and corrupt files all degrade the same way:
//! the image renders without explicit dimensions. The build carries on and
//! the problem is surfaced as a warning.

pub mod config;
pub mod frontmatter;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod paths;
pub mod pipeline;
pub mod render;
pub mod resolver;
pub mod scanner;
pub mod store;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
