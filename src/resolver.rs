//! Image dimension resolution.
//!
//! Maps an image path from a post body onto the asset root and probes the
//! file header for its pixel size:
//!
//! ```text
//! /assets/blog/cat.png   →  public/assets/blog/cat.png  →  300×200
//! assets/blog/cat.png    →  public/assets/blog/cat.png  →  300×200
//! /assets/cat.png?v=2    →  public/assets/cat.png       →  300×200
//! https://cdn.x/cat.png  →  Unresolvable (no local asset)
//! /../secrets.png        →  Unresolvable (outside the asset root)
//! ```
//!
//! Every failure collapses to [`Unresolvable`], from an external URL to a
//! corrupt or zero-sized file. The caller treats that as "no dimensions
//! known" and moves on.

use crate::imaging::{ImageBackend, RustBackend};
use crate::scanner;
use crate::types::ImageDimensions;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Dimensions for `path` could not be determined.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Cannot resolve dimensions for {path}: {reason}")]
pub struct Unresolvable {
    pub path: String,
    /// Diagnostic text only; callers must not branch on it.
    pub reason: String,
}

impl Unresolvable {
    fn new(path: &str, reason: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}

/// Resolves image paths under a fixed asset root.
pub struct DimensionResolver<B: ImageBackend = RustBackend> {
    asset_root: PathBuf,
    backend: B,
}

impl DimensionResolver<RustBackend> {
    pub fn new(asset_root: impl Into<PathBuf>) -> Self {
        Self::with_backend(asset_root, RustBackend::new())
    }
}

impl<B: ImageBackend> DimensionResolver<B> {
    /// Resolver with a specific backend (allows testing with mock).
    pub fn with_backend(asset_root: impl Into<PathBuf>, backend: B) -> Self {
        Self {
            asset_root: asset_root.into(),
            backend,
        }
    }

    pub fn asset_root(&self) -> &Path {
        &self.asset_root
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Local file for `path`, or why there is none.
    pub fn locate(&self, path: &str) -> Result<PathBuf, Unresolvable> {
        if scanner::is_external(path) {
            return Err(Unresolvable::new(path, "external URL has no local asset"));
        }

        let without_suffix = path.split(['?', '#']).next().unwrap_or_default();
        let relative = without_suffix.trim_start_matches('/');
        if relative.is_empty() {
            return Err(Unresolvable::new(path, "empty path"));
        }

        let mut located = self.asset_root.clone();
        for component in Path::new(relative).components() {
            match component {
                Component::Normal(part) => located.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(Unresolvable::new(path, "path escapes the asset root"));
                }
            }
        }
        Ok(located)
    }

    /// Pixel dimensions of the image at `path`.
    pub fn resolve(&self, path: &str) -> Result<ImageDimensions, Unresolvable> {
        let file = self.locate(path)?;
        tracing::debug!(path, file = %file.display(), "probing image");

        let dims = self
            .backend
            .identify(&file)
            .map_err(|e| Unresolvable::new(path, e.to_string()))?;

        ImageDimensions::new(dims.width, dims.height).ok_or_else(|| {
            Unresolvable::new(
                path,
                format!("degenerate size {}x{}", dims.width, dims.height),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::MockBackend;
    use crate::test_helpers::{SiteFixture, write_jpeg};

    #[test]
    fn resolves_real_png() {
        let site = SiteFixture::new();
        site.png("assets/cat.png", 300, 200);

        let resolver = DimensionResolver::new(site.asset_dir());
        let dims = resolver.resolve("/assets/cat.png").unwrap();
        assert_eq!((dims.width(), dims.height()), (300, 200));
    }

    #[test]
    fn resolves_real_jpeg_without_leading_slash() {
        let site = SiteFixture::new();
        write_jpeg(&site.asset_dir().join("photos/dawn.jpg"), 64, 48);

        let resolver = DimensionResolver::new(site.asset_dir());
        let dims = resolver.resolve("photos/dawn.jpg").unwrap();
        assert_eq!((dims.width(), dims.height()), (64, 48));
    }

    #[test]
    fn query_and_fragment_ignored_for_lookup() {
        let site = SiteFixture::new();
        site.png("assets/cat.png", 30, 20);

        let resolver = DimensionResolver::new(site.asset_dir());
        assert!(resolver.resolve("/assets/cat.png?v=2").is_ok());
        assert!(resolver.resolve("/assets/cat.png#frag").is_ok());
    }

    #[test]
    fn missing_file_unresolvable() {
        let site = SiteFixture::new();
        let resolver = DimensionResolver::new(site.asset_dir());

        let err = resolver.resolve("/assets/missing.png").unwrap_err();
        assert_eq!(err.path, "/assets/missing.png");
    }

    #[test]
    fn corrupt_file_unresolvable() {
        let site = SiteFixture::new();
        let file = site.asset_dir().join("assets/broken.png");
        std::fs::create_dir_all(file.parent().unwrap()).unwrap();
        std::fs::write(&file, b"not an image").unwrap();

        let resolver = DimensionResolver::new(site.asset_dir());
        assert!(resolver.resolve("/assets/broken.png").is_err());
    }

    #[test]
    fn directory_unresolvable() {
        let site = SiteFixture::new();
        std::fs::create_dir_all(site.asset_dir().join("assets/dir.png")).unwrap();

        let resolver = DimensionResolver::new(site.asset_dir());
        assert!(resolver.resolve("/assets/dir.png").is_err());
    }

    #[test]
    fn external_url_never_probed() {
        let backend = MockBackend::new().with_image("cat.png", 1, 1);
        let resolver = DimensionResolver::with_backend("/public", backend);

        assert!(resolver.resolve("https://example.com/cat.png").is_err());
        assert!(resolver.resolve("//cdn.example.com/cat.png").is_err());
        assert!(resolver.backend().get_probes().is_empty());
    }

    #[test]
    fn parent_traversal_rejected() {
        let site = SiteFixture::new();
        write_jpeg(&site.root().join("outside.jpg"), 10, 10);

        let resolver = DimensionResolver::new(site.asset_dir());
        let err = resolver.resolve("/../outside.jpg").unwrap_err();
        assert!(err.reason.contains("escapes"));
    }

    #[test]
    fn locate_joins_under_asset_root() {
        let resolver = DimensionResolver::with_backend("/public", MockBackend::new());
        assert_eq!(
            resolver.locate("/assets/./blog/cat.png").unwrap(),
            PathBuf::from("/public/assets/blog/cat.png")
        );
        assert!(resolver.locate("/").is_err());
        assert!(resolver.locate("?only-query").is_err());
    }

    #[test]
    fn zero_sized_probe_unresolvable() {
        let backend = MockBackend::new().with_image("flat.png", 0, 10);
        let resolver = DimensionResolver::with_backend("/public", backend);

        let err = resolver.resolve("/flat.png").unwrap_err();
        assert!(err.reason.contains("0x10"));
    }

    #[test]
    fn probes_mapped_path() {
        let backend = MockBackend::new().with_image("cat.png", 300, 200);
        let resolver = DimensionResolver::with_backend("/public", backend);

        resolver.resolve("/assets/cat.png").unwrap();
        assert_eq!(
            resolver.backend().get_probes(),
            vec![
                PathBuf::from("/public/assets/cat.png")
                    .to_string_lossy()
                    .to_string()
            ]
        );
    }
}
