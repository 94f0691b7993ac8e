//! Search index generation stage for static-site build pipelines.
//!
//! Registers one JSON artifact with the host pipeline, built from the live
//! document collection: documents are selected by path pattern, field values
//! are extracted per a declarative field specification, an optional
//! before-index hook rewrites or drops entries, and the aggregate serializes
//! deterministically to the configured output path.
//!
//! # Modules
//!
//! - [`config`] - declarative options surface and the validated [`IndexConfig`]
//! - [`document`] - documents and the live collection this stage reads
//! - [`selector`] - path-pattern matching for document eligibility
//! - [`fields`] - the field-extraction mini-language
//! - [`hook`] - the before-index transformation hook
//! - [`builder`] - the index build stage itself
//! - [`pipeline`] - output registration and materialization
//! - [`error`] - error taxonomy
//!
//! # Example
//!
//! ```
//! use sitesearch::{
//!     Document, DocumentCollection, FieldRule, FieldSource, IndexConfig, SearchIndexStage,
//! };
//!
//! # fn main() -> Result<(), sitesearch::IndexError> {
//! let mut collection = DocumentCollection::new();
//! collection.push(
//!     Document::new("/posts/hello")
//!         .with_attribute("title", "Hello")
//!         .with_content("hello world"),
//! );
//!
//! let config = IndexConfig::builder()
//!     .resource("/posts/**")
//!     .field(FieldRule::new("title", FieldSource::attribute("title")))
//!     .field(FieldRule::new("content", FieldSource::content()))
//!     .build()?;
//!
//! let artifact = SearchIndexStage::new(config).render(&collection)?;
//! assert!(artifact.starts_with(b"[{\"index\""));
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod document;
pub mod error;
pub mod fields;
pub mod hook;
pub mod pipeline;
pub mod selector;

pub use builder::{IndexEntry, SearchIndexStage};
pub use config::{IndexConfig, IndexConfigBuilder, RawField, SearchOptions, DEFAULT_INDEX_PATH};
pub use document::{Document, DocumentCollection, PlannedOutput};
pub use error::{BoxError, ConfigError, IndexError, PipelineError};
pub use fields::{FieldMap, FieldRule, FieldSource};
pub use hook::{before_index, BeforeIndex, HookOutcome};
pub use pipeline::{MaterializeStats, Pipeline, RenderFn};
pub use selector::SelectorSet;
