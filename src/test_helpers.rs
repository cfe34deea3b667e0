//! Shared test utilities for the post-pipeline test suite.
//!
//! Provides a throwaway project layout (`_posts/` + `public/`) and synthetic
//! image writers so tests never depend on checked-in binaries.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let site = SiteFixture::new();
//! site.post("hello", "title: Hello", "![cat](/assets/cat.png)\n");
//! site.png("assets/cat.png", 300, 200);
//!
//! let store = site.store();
//! ```

use crate::config::PipelineConfig;
use crate::store::ContentStore;
use image::{ImageEncoder, RgbImage};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// =========================================================================
// Synthetic images
// =========================================================================

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
}

/// Write a valid PNG of the given size, creating parent directories.
pub fn write_png(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    gradient(width, height).save_with_format(path, image::ImageFormat::Png).unwrap();
}

/// Write a valid JPEG of the given size, creating parent directories.
pub fn write_jpeg(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let img = gradient(width, height);
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

// =========================================================================
// Project fixture
// =========================================================================

/// A temporary project root laid out with the default config directories.
pub struct SiteFixture {
    pub dir: TempDir,
    pub config: PipelineConfig,
}

impl SiteFixture {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let config = PipelineConfig::default();
        std::fs::create_dir_all(config.content_path(dir.path())).unwrap();
        std::fs::create_dir_all(config.asset_path(dir.path())).unwrap();
        Self { dir, config }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn content_dir(&self) -> PathBuf {
        self.config.content_path(self.root())
    }

    pub fn asset_dir(&self) -> PathBuf {
        self.config.asset_path(self.root())
    }

    /// Write `_posts/<slug>.md` with the given front-matter lines and body.
    pub fn post(&self, slug: &str, front_matter: &str, body: &str) -> PathBuf {
        let path = self.content_dir().join(format!("{slug}.md"));
        std::fs::write(&path, format!("---\n{front_matter}\n---\n{body}")).unwrap();
        path
    }

    /// Write `_posts/<name>` verbatim.
    pub fn raw_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.content_dir().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    /// Write a PNG under the asset root at `rel` (no leading slash).
    pub fn png(&self, rel: &str, width: u32, height: u32) -> PathBuf {
        let path = self.asset_dir().join(rel);
        write_png(&path, width, height);
        path
    }

    pub fn store(&self) -> ContentStore {
        ContentStore::from_config(self.root(), &self.config)
    }
}
