//! The field-extraction mini-language.
//!
//! Each declared field names an extraction source; evaluation against one
//! document yields the value committed to the searchable and stored maps.
//! The source set is closed, so an unrecognized kind can only occur in the
//! declarative options surface, where validation rejects it up front.

use std::{fmt, sync::Arc};

use serde_json::{Map, Value};

use crate::{document::Document, error::IndexError};

/// Ordered field name to value mapping.
///
/// Backed by `serde_json::Map` with `preserve_order`, so field declaration
/// order survives into the serialized artifact.
pub type FieldMap = Map<String, Value>;

/// Computed extraction callback.
pub type ComputedFn = Arc<dyn Fn(&Document) -> Result<Value, crate::error::BoxError> + Send + Sync>;

/// Where a field's value comes from.
#[derive(Clone)]
pub enum FieldSource {
    /// A document attribute; a missing attribute is a fatal extraction error.
    Attribute(String),

    /// A document attribute, falling back to a default when absent.
    AttributeOr { name: String, default: Value },

    /// The document's rendered content.
    Content,

    /// A caller-supplied computation over the document.
    Computed(ComputedFn),
}

impl FieldSource {
    /// Extract a required attribute.
    pub fn attribute(name: impl Into<String>) -> Self {
        Self::Attribute(name.into())
    }

    /// Extract an attribute, defaulting when the document lacks it.
    pub fn attribute_or(name: impl Into<String>, default: impl Into<Value>) -> Self {
        Self::AttributeOr {
            name: name.into(),
            default: default.into(),
        }
    }

    /// Extract the rendered content.
    pub fn content() -> Self {
        Self::Content
    }

    /// Extract via a computation.
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&Document) -> Result<Value, crate::error::BoxError> + Send + Sync + 'static,
    {
        Self::Computed(Arc::new(f))
    }
}

impl fmt::Debug for FieldSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attribute(name) => f.debug_tuple("Attribute").field(name).finish(),
            Self::AttributeOr { name, default } => f
                .debug_struct("AttributeOr")
                .field("name", name)
                .field("default", default)
                .finish(),
            Self::Content => f.write_str("Content"),
            Self::Computed(_) => f.write_str("Computed"),
        }
    }
}

/// One declared field: a name, a source, and where the value goes.
#[derive(Debug, Clone)]
pub struct FieldRule {
    /// Field name as it appears in the artifact.
    pub name: String,

    /// Extraction source.
    pub source: FieldSource,

    /// Whether the value lands in the searchable map.
    pub index: bool,

    /// Whether the value lands in the stored map.
    pub store: bool,
}

impl FieldRule {
    /// Declare a field that is both indexed and stored.
    pub fn new(name: impl Into<String>, source: FieldSource) -> Self {
        Self {
            name: name.into(),
            source,
            index: true,
            store: true,
        }
    }

    /// Set whether the field is searchable.
    #[must_use]
    pub fn with_index(mut self, index: bool) -> Self {
        self.index = index;
        self
    }

    /// Set whether the field is stored for display.
    #[must_use]
    pub fn with_store(mut self, store: bool) -> Self {
        self.store = store;
        self
    }

    /// Evaluate this rule against one document.
    pub fn extract(&self, document: &Document) -> Result<Value, IndexError> {
        match &self.source {
            FieldSource::Attribute(attr) => {
                document.attribute(attr).cloned().ok_or_else(|| {
                    IndexError::extraction(
                        document.path(),
                        &self.name,
                        format!("document has no attribute `{attr}`"),
                    )
                })
            }
            FieldSource::AttributeOr { name, default } => Ok(document
                .attribute(name)
                .cloned()
                .unwrap_or_else(|| default.clone())),
            FieldSource::Content => Ok(Value::String(document.content().to_string())),
            FieldSource::Computed(f) => (f.as_ref())(document)
                .map_err(|e| IndexError::extraction(document.path(), &self.name, e.to_string())),
        }
    }
}
