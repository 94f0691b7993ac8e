//! The before-index hook.
//!
//! Hosts inject a callback that sees every document's extracted field maps
//! right before the document is committed to the index. The hook may rewrite
//! either map or drop the document entirely.

use std::sync::Arc;

use crate::{
    document::Document,
    error::BoxError,
    fields::FieldMap,
};

/// What the hook decided for one document.
#[derive(Debug, Clone)]
pub enum HookOutcome {
    /// Commit the document with these searchable and stored maps.
    Keep(FieldMap, FieldMap),

    /// Leave the document out of the index. Not an error.
    Skip,
}

/// Pre-index transformation hook.
///
/// Receives the searchable map, the stored map, and the document; the maps
/// returned by [`HookOutcome::Keep`] replace the extracted ones wholesale.
pub type BeforeIndex =
    Arc<dyn Fn(FieldMap, FieldMap, &Document) -> Result<HookOutcome, BoxError> + Send + Sync>;

/// Wrap a closure as a before-index hook.
pub fn before_index<F>(f: F) -> BeforeIndex
where
    F: Fn(FieldMap, FieldMap, &Document) -> Result<HookOutcome, BoxError> + Send + Sync + 'static,
{
    Arc::new(f)
}
