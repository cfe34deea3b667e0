//! Content store: markdown posts on disk, addressed by slug.
//!
//! ## Directory Structure
//!
//! ```text
//! _posts/                      # Content root (config: content_dir)
//! ├── hello-world.md           # slug "hello-world"
//! ├── dynamic-routing.md       # slug "dynamic-routing"
//! ├── .draft.md                # hidden, ignored
//! ├── notes.txt                # not a post, ignored
//! └── drafts/                  # subdirectories are ignored
//! ```
//!
//! Every post is a front-matter block followed by a markdown body (see
//! [`frontmatter`](crate::frontmatter)). Documents are loaded restricted to a
//! requested set of [`Field`]s.
//!
//! ## Failure scope
//!
//! - A missing or unreadable content root is a store-level failure
//!   ([`StoreError::Unavailable`], [`StoreError::Walk`]).
//! - An entry that cannot be read while listing is skipped with a warning.
//! - A missing post is [`StoreError::NotFound`], scoped to that slug.
//! - Bad front-matter is [`StoreError::Parse`], scoped to that document.

use crate::config::PipelineConfig;
use crate::frontmatter::{self, FrontMatterError};
use crate::naming;
use crate::types::{Author, Document, Field};
use std::cmp::Ordering;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Content root unavailable: {0}")]
    Unavailable(PathBuf),
    #[error("Failed to list content root: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("No document for slug: {0}")]
    NotFound(String),
    #[error("Failed to parse {slug}: {source}")]
    Parse {
        slug: String,
        #[source]
        source: FrontMatterError,
    },
    #[error("Document {slug} is not valid UTF-8")]
    InvalidUtf8 { slug: String },
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

/// Read-only view over a directory of markdown posts.
#[derive(Debug, Clone)]
pub struct ContentStore {
    root: PathBuf,
}

impl ContentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store rooted at `<project_root>/<content_dir>`.
    pub fn from_config(project_root: &Path, config: &PipelineConfig) -> Self {
        Self::new(config.content_path(project_root))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All slugs in the store, sorted ascending.
    ///
    /// Only regular `.md` files directly inside the root count. Files whose
    /// stem is not URL-safe are skipped with a warning.
    pub fn list_slugs(&self) -> Result<Vec<String>, StoreError> {
        if !self.root.is_dir() {
            return Err(StoreError::Unavailable(self.root.clone()));
        }

        let mut slugs = Vec::new();
        for entry in WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
        {
            // An unreadable entry (e.g. a dangling symlink) only loses that entry.
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => return Err(StoreError::Walk(e)),
                Err(e) => {
                    tracing::warn!(
                        path = ?e.path(),
                        "skipping unreadable entry in content root: {e}"
                    );
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let is_post = path
                .extension()
                .is_some_and(|e| e == naming::POST_EXTENSION);
            match naming::slug_from_path(path) {
                Some(slug) => slugs.push(slug),
                None if is_post && !is_hidden(path) => {
                    tracing::warn!(
                        path = %path.display(),
                        "skipping post whose filename is not a URL-safe slug"
                    );
                }
                None => {}
            }
        }

        slugs.sort();
        Ok(slugs)
    }

    /// Load one document, populating only the requested `fields`.
    ///
    /// `slug` is always populated. Slugs that are not URL-safe cannot name
    /// a file in the store and yield `NotFound`.
    pub fn load_document(&self, slug: &str, fields: &[Field]) -> Result<Document, StoreError> {
        if !naming::is_url_safe(slug) {
            return Err(StoreError::NotFound(slug.to_string()));
        }

        let path = self.root.join(naming::file_name_for(slug));
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(slug.to_string()));
            }
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                return Err(StoreError::InvalidUtf8 {
                    slug: slug.to_string(),
                });
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        let (front_matter, body) =
            frontmatter::parse(&content).map_err(|source| StoreError::Parse {
                slug: slug.to_string(),
                source,
            })?;

        if let Some(declared) = &front_matter.slug
            && declared != slug
        {
            tracing::debug!(slug, declared = %declared, "front-matter slug ignored");
        }

        let wants = |field: Field| fields.contains(&field);
        let mut document = Document::bare(slug);
        if wants(Field::Title) {
            document.title = front_matter.title;
        }
        if wants(Field::Date) {
            document.date = front_matter.date;
        }
        if wants(Field::Author) {
            document.author = front_matter.author.map(Author::from);
        }
        if wants(Field::Content) {
            document.body = Some(body.to_string());
        }
        if wants(Field::CoverImage) {
            document.cover_image = front_matter.cover_image;
        }
        if wants(Field::OgImage) {
            document.og_image = front_matter.og_image.map(|og| og.into_url());
        }
        Ok(document)
    }

    /// Load every document, newest first.
    ///
    /// Documents that fail to load are logged and left out. Ordering is by
    /// `date` descending (ISO-8601 strings compare chronologically), undated
    /// documents last, ties broken by slug. Dates are read even when
    /// `fields` omits them so the order does not depend on the request.
    pub fn load_all(&self, fields: &[Field]) -> Result<Vec<Document>, StoreError> {
        let mut wanted = fields.to_vec();
        if !wanted.contains(&Field::Date) {
            wanted.push(Field::Date);
        }

        let mut loaded = Vec::new();
        for slug in self.list_slugs()? {
            match self.load_document(&slug, &wanted) {
                Ok(doc) => loaded.push(doc),
                Err(e) => tracing::error!(slug = %slug, "Failed to load document: {e}"),
            }
        }

        loaded.sort_by(newest_first);

        if !fields.contains(&Field::Date) {
            for doc in &mut loaded {
                doc.date = None;
            }
        }
        Ok(loaded)
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

fn newest_first(a: &Document, b: &Document) -> Ordering {
    match (&a.date, &b.date) {
        (Some(da), Some(db)) => db.cmp(da).then_with(|| a.slug.cmp(&b.slug)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.slug.cmp(&b.slug),
    }
}
