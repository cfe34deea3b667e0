//! Pipeline orchestration: slug → rendering model.
//!
//! For one document the steps are strictly sequential:
//!
//! ```text
//! load (store)  →  scan body (scanner)  →  dedup paths  →  resolve each (resolver)  →  model
//! ```
//!
//! Only the load step can fail the build. Each image that cannot be resolved
//! is left out of `image_sizes` and reported as a [`Diagnostic`] through
//! `tracing` and, when attached, the event channel.
//!
//! ## Parallel Builds
//!
//! Documents share no mutable state, so [`Pipeline::build_all`] builds them
//! in parallel on the [rayon](https://docs.rs/rayon) pool. A [`CancelToken`]
//! is checked before each document starts; a document already in progress
//! always finishes.

use crate::config::PipelineConfig;
use crate::imaging::{ImageBackend, RustBackend};
use crate::paths;
use crate::resolver::DimensionResolver;
use crate::scanner;
use crate::store::{ContentStore, StoreError};
use crate::types::{Field, RenderingModel, SlugIndex};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;

/// An image reference whose dimensions could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub slug: String,
    pub path: String,
    pub reason: String,
}

/// Progress events sent while building.
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    ImageUnresolved(Diagnostic),
    DocumentBuilt {
        slug: String,
        image_count: usize,
        unresolved: usize,
    },
    DocumentFailed {
        slug: String,
        error: String,
    },
    DocumentSkipped {
        slug: String,
    },
}

/// Cooperative cancellation flag shared between the driver and the pass.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A successful build plus the images it had to leave out.
#[derive(Debug, Clone)]
pub struct BuiltDocument {
    pub model: RenderingModel,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug)]
pub enum DocumentResult {
    Built(BuiltDocument),
    Failed(StoreError),
    /// Not started because the pass was cancelled.
    Skipped,
}

#[derive(Debug)]
pub struct DocumentOutcome {
    pub slug: String,
    pub result: DocumentResult,
}

/// Per-document results of a pass, in slug order.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub outcomes: Vec<DocumentOutcome>,
}

impl BuildReport {
    pub fn models(&self) -> impl Iterator<Item = &RenderingModel> {
        self.outcomes.iter().filter_map(|o| match &o.result {
            DocumentResult::Built(built) => Some(&built.model),
            _ => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &StoreError)> {
        self.outcomes.iter().filter_map(|o| match &o.result {
            DocumentResult::Failed(e) => Some((o.slug.as_str(), e)),
            _ => None,
        })
    }

    pub fn built_count(&self) -> usize {
        self.models().count()
    }

    pub fn failed_count(&self) -> usize {
        self.failures().count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.result, DocumentResult::Skipped))
            .count()
    }

    pub fn unresolved_count(&self) -> usize {
        self.outcomes
            .iter()
            .map(|o| match &o.result {
                DocumentResult::Built(built) => built.diagnostics.len(),
                _ => 0,
            })
            .sum()
    }
}

/// Content store + resolver wired together for one build pass.
pub struct Pipeline<B: ImageBackend = RustBackend> {
    store: ContentStore,
    resolver: DimensionResolver<B>,
    fields: Vec<Field>,
    events: Option<Sender<PipelineEvent>>,
}

impl Pipeline<RustBackend> {
    pub fn new(project_root: &Path, config: &PipelineConfig) -> Self {
        Self::with_backend(project_root, config, RustBackend::new())
    }
}

impl<B: ImageBackend> Pipeline<B> {
    /// Pipeline using a specific backend (allows testing with mock).
    pub fn with_backend(project_root: &Path, config: &PipelineConfig, backend: B) -> Self {
        let store = ContentStore::from_config(project_root, config);
        let resolver = DimensionResolver::with_backend(config.asset_path(project_root), backend);
        Self::from_parts(store, resolver, &config.front_matter.fields)
    }

    /// Assemble from an existing store and resolver.
    ///
    /// `content` is always added to `fields`: the body must be loaded to be
    /// scanned for images.
    pub fn from_parts(store: ContentStore, resolver: DimensionResolver<B>, fields: &[Field]) -> Self {
        let mut fields = fields.to_vec();
        if !fields.contains(&Field::Content) {
            fields.push(Field::Content);
        }
        Self {
            store,
            resolver,
            fields,
            events: None,
        }
    }

    /// Send progress and diagnostic events to `tx`.
    pub fn with_events(mut self, tx: Sender<PipelineEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    pub fn store(&self) -> &ContentStore {
        &self.store
    }

    pub fn resolver(&self) -> &DimensionResolver<B> {
        &self.resolver
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    fn emit(&self, event: PipelineEvent) {
        if let Some(tx) = &self.events {
            // A dropped receiver only means nobody is listening.
            let _ = tx.send(event);
        }
    }

    /// Build the rendering model for `slug`.
    ///
    /// Fails only when the document itself cannot be loaded.
    pub fn build(&self, slug: &str) -> Result<RenderingModel, StoreError> {
        self.build_with_diagnostics(slug).map(|built| built.model)
    }

    /// Like [`build`](Self::build), also returning the unresolved images.
    pub fn build_with_diagnostics(&self, slug: &str) -> Result<BuiltDocument, StoreError> {
        let document = self.store.load_document(slug, &self.fields)?;

        let refs = scanner::scan(document.body.as_deref().unwrap_or_default());
        let mut image_sizes = BTreeMap::new();
        let mut diagnostics = Vec::new();

        for path in scanner::unique_paths(&refs) {
            match self.resolver.resolve(path) {
                Ok(dims) => {
                    image_sizes.insert(path.to_string(), dims);
                }
                Err(unresolvable) => {
                    tracing::warn!(
                        slug,
                        path,
                        reason = %unresolvable.reason,
                        "Can't get image dimensions"
                    );
                    let diagnostic = Diagnostic {
                        slug: slug.to_string(),
                        path: unresolvable.path,
                        reason: unresolvable.reason,
                    };
                    self.emit(PipelineEvent::ImageUnresolved(diagnostic.clone()));
                    diagnostics.push(diagnostic);
                }
            }
        }

        Ok(BuiltDocument {
            model: RenderingModel {
                document,
                image_sizes,
            },
            diagnostics,
        })
    }

    /// Build every slug in parallel, never aborting on a single document.
    pub fn build_all(&self, slugs: &[String], cancel: &CancelToken) -> BuildReport {
        let outcomes = slugs
            .par_iter()
            .map(|slug| {
                let result = if cancel.is_cancelled() {
                    self.emit(PipelineEvent::DocumentSkipped { slug: slug.clone() });
                    DocumentResult::Skipped
                } else {
                    match self.build_with_diagnostics(slug) {
                        Ok(built) => {
                            self.emit(PipelineEvent::DocumentBuilt {
                                slug: slug.clone(),
                                image_count: built.model.image_sizes.len(),
                                unresolved: built.diagnostics.len(),
                            });
                            DocumentResult::Built(built)
                        }
                        Err(e) => {
                            tracing::error!(slug = %slug, "Failed to build document: {e}");
                            self.emit(PipelineEvent::DocumentFailed {
                                slug: slug.clone(),
                                error: e.to_string(),
                            });
                            DocumentResult::Failed(e)
                        }
                    }
                };
                DocumentOutcome {
                    slug: slug.clone(),
                    result,
                }
            })
            .collect();

        BuildReport { outcomes }
    }

    /// Full pass: enumerate every slug, then build them all.
    ///
    /// Only a store-level failure during enumeration is an error.
    pub fn run(&self, cancel: &CancelToken) -> Result<(SlugIndex, BuildReport), StoreError> {
        let index = paths::enumerate(&self.store)?;
        tracing::info!("Found {} documents", index.len());

        let report = self.build_all(&index.slugs(), cancel);
        tracing::info!(
            built = report.built_count(),
            failed = report.failed_count(),
            skipped = report.skipped_count(),
            unresolved_images = report.unresolved_count(),
            "Build pass finished"
        );
        Ok((index, report))
    }
}
