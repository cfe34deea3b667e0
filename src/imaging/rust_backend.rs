//! Pure Rust probing backend with no system dependencies.
//!
//! ## Crate mapping
//!
//! | Format | Crate / function |
//! |---|---|
//! | JPEG, PNG, GIF, TIFF, WebP | `image::ImageReader` header read, format guessed from magic bytes |
//! | AVIF | `avif-parse` container metadata (no AV1 decode) |

use super::backend::{BackendError, Dimensions, ImageBackend};
use image::{ImageFormat, ImageReader};
use std::path::Path;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-format mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn has_avif_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("avif"))
}

/// Extract dimensions from an AVIF file's container metadata (no full decode needed).
fn identify_avif(path: &Path) -> Result<Dimensions, BackendError> {
    let file_data = std::fs::read(path)?;
    let avif = avif_parse::read_avif(&mut std::io::Cursor::new(&file_data)).map_err(|e| {
        BackendError::ProbeFailed(format!("Failed to parse AVIF {}: {e:?}", path.display()))
    })?;
    let meta = avif.primary_item_metadata().map_err(|e| {
        BackendError::ProbeFailed(format!(
            "Failed to read AVIF metadata {}: {e:?}",
            path.display()
        ))
    })?;
    Ok(Dimensions {
        width: meta.max_frame_width.get(),
        height: meta.max_frame_height.get(),
    })
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        if has_avif_extension(path) {
            return identify_avif(path);
        }

        let reader = ImageReader::open(path)?.with_guessed_format()?;
        match reader.format() {
            Some(ImageFormat::Avif) => identify_avif(path),
            Some(format) if format.reading_enabled() => {
                let (width, height) = reader.into_dimensions().map_err(|e| {
                    BackendError::ProbeFailed(format!(
                        "Failed to read dimensions of {}: {e}",
                        path.display()
                    ))
                })?;
                Ok(Dimensions { width, height })
            }
            Some(format) => Err(BackendError::UnsupportedFormat(format!("{format:?}"))),
            None => Err(BackendError::UnsupportedFormat(format!(
                "unrecognized file {}",
                path.display()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{write_jpeg, write_png};

    #[test]
    fn identify_synthetic_png() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("test.png");
        write_png(&path, 300, 200);

        let dims = RustBackend::new().identify(&path).unwrap();
        assert_eq!((dims.width, dims.height), (300, 200));
    }

    #[test]
    fn identify_synthetic_jpeg() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("test.jpg");
        write_jpeg(&path, 200, 150);

        let dims = RustBackend::new().identify(&path).unwrap();
        assert_eq!((dims.width, dims.height), (200, 150));
    }

    #[test]
    fn identify_uses_magic_bytes_over_extension() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("actually-a-png.jpg");
        write_png(&path, 40, 30);

        let dims = RustBackend::new().identify(&path).unwrap();
        assert_eq!((dims.width, dims.height), (40, 30));
    }

    #[test]
    fn identify_nonexistent_file_errors() {
        let result = RustBackend::new().identify(Path::new("/nonexistent/image.jpg"));
        assert!(matches!(result, Err(BackendError::Io(_))));
    }

    #[test]
    fn identify_garbage_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("broken.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        assert!(RustBackend::new().identify(&path).is_err());
    }

    #[test]
    fn identify_text_file_is_unsupported() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("notes.txt");
        std::fs::write(&path, b"hello").unwrap();

        assert!(matches!(
            RustBackend::new().identify(&path),
            Err(BackendError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn identify_corrupt_avif_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("broken.avif");
        std::fs::write(&path, b"\0\0\0\x18ftypavif not really").unwrap();

        assert!(matches!(
            RustBackend::new().identify(&path),
            Err(BackendError::ProbeFailed(_))
        ));
    }
}
