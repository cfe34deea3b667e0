//! Image probing backend trait and shared types.
//!
//! The [`ImageBackend`] trait has a single operation, `identify`, which reads
//! just enough of a file to learn its pixel size. The production
//! implementation is [`RustBackend`](super::rust_backend::RustBackend).

use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),
    #[error("Probe failed: {0}")]
    ProbeFailed(String),
}

/// Raw result of an identify operation. Either side may be zero for
/// degenerate files; callers decide whether that is usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image probing backends.
///
/// `Sync` so one backend can be shared by every worker in the rayon pool.
pub trait ImageBackend: Sync {
    /// Get image dimensions without decoding pixel data.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Mock backend that answers from a table and records every probe.
    /// Uses Mutex (not RefCell) so it is Sync and works with rayon's par_iter.
    #[derive(Default)]
    pub struct MockBackend {
        pub dimensions: HashMap<String, Dimensions>,
        pub probes: Mutex<Vec<String>>,
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        /// Register dimensions for a path ending in `suffix`.
        pub fn with_image(mut self, suffix: &str, width: u32, height: u32) -> Self {
            self.dimensions
                .insert(suffix.to_string(), Dimensions { width, height });
            self
        }

        pub fn get_probes(&self) -> Vec<String> {
            self.probes.lock().unwrap().clone()
        }
    }

    impl ImageBackend for MockBackend {
        fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
            let path_str = path.to_string_lossy().to_string();
            self.probes.lock().unwrap().push(path_str.clone());

            self.dimensions
                .iter()
                .find(|(suffix, _)| path_str.ends_with(suffix.as_str()))
                .map(|(_, dims)| *dims)
                .ok_or_else(|| BackendError::ProbeFailed(format!("no mock image at {path_str}")))
        }
    }

    #[test]
    fn mock_answers_registered_images() {
        let backend = MockBackend::new().with_image("cat.png", 300, 200);

        let dims = backend.identify(Path::new("/public/assets/cat.png")).unwrap();
        assert_eq!((dims.width, dims.height), (300, 200));
        assert!(backend.identify(Path::new("/public/dog.png")).is_err());
    }

    #[test]
    fn mock_records_probes() {
        let backend = MockBackend::new();
        let _ = backend.identify(Path::new("/a.png"));
        let _ = backend.identify(Path::new("/b.png"));
        assert_eq!(backend.get_probes(), vec!["/a.png", "/b.png"]);
    }
}
