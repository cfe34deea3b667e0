//! Image dimension probing from file headers.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** (JPEG, PNG, GIF, TIFF, WebP) | `image::ImageReader::into_dimensions` |
//! | **Identify** (AVIF) | `avif-parse` container metadata |
//!
//! The module is split into:
//! - **Backend**: [`ImageBackend`] trait, the seam tests mock
//! - **Rust backend**: [`RustBackend`], the production implementation

pub mod backend;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use rust_backend::RustBackend;
