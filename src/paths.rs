//! Path enumeration for the static build.
//!
//! Lists every slug the store knows about so the host framework can
//! pre-render one page per document. The index reads nothing but filenames.

use crate::store::{ContentStore, StoreError};
use crate::types::{SlugIndex, SlugPath};

/// One entry per document, sorted by slug. Listing failures propagate.
pub fn enumerate(store: &ContentStore) -> Result<SlugIndex, StoreError> {
    let paths = store
        .list_slugs()?
        .into_iter()
        .map(|slug| SlugPath { slug })
        .collect();
    Ok(SlugIndex { paths })
}
