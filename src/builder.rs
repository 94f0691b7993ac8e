//! The search index build stage.
//!
//! Registration inserts one planned output into the pipeline; rendering walks
//! the live document collection, extracts field values per the configuration,
//! runs the before-index hook, and serializes the aggregate to JSON. Render
//! is a pure read of the collection and the configuration, so repeated
//! renders of unchanged inputs are byte-identical and the host may run it
//! concurrently with other output renders.

use serde::Serialize;
use tracing::{debug, info};

use crate::{
    config::IndexConfig,
    document::{Document, DocumentCollection, PlannedOutput},
    error::{ConfigError, IndexError},
    fields::FieldMap,
    hook::HookOutcome,
    pipeline::Pipeline,
};

/// One document's contribution to the index artifact.
#[derive(Debug, Clone, Serialize)]
pub struct IndexEntry {
    /// Fields used for query matching.
    pub index: FieldMap,

    /// Fields returned alongside a match.
    pub store: FieldMap,
}

/// The index build stage.
#[derive(Debug, Clone)]
pub struct SearchIndexStage {
    config: IndexConfig,
}

impl SearchIndexStage {
    /// Create a stage from a validated configuration.
    #[must_use]
    pub fn new(config: IndexConfig) -> Self {
        Self { config }
    }

    /// The stage's configuration.
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Register this stage's artifact with the pipeline.
    ///
    /// Inserts the planned output descriptor into the collection and
    /// registers the render callback under the configured index path. Fails
    /// when another stage already claimed that path.
    pub fn attach(self, pipeline: &mut Pipeline) -> Result<(), ConfigError> {
        let path = self.config.index_path().to_string();
        if pipeline.contains_output(&path) {
            return Err(ConfigError::DuplicateOutputPath(path));
        }

        pipeline
            .collection_mut()
            .plan_output(PlannedOutput::new(path.clone(), "search-index"))?;

        debug!(path = %path, "registered search index output");
        pipeline.register_output(path, move |collection| {
            self.render(collection).map_err(Into::into)
        })
    }

    /// Render the index artifact from the current collection.
    pub fn render(&self, collection: &DocumentCollection) -> Result<Vec<u8>, IndexError> {
        let entries = self.collect(collection)?;

        let mut values = Vec::with_capacity(entries.len());
        for (path, entry) in &entries {
            let value = serde_json::to_value(entry)
                .map_err(|e| IndexError::serialization(Some(path.clone()), None, e.to_string()))?;
            values.push(value);
        }

        let bytes = serde_json::to_vec(&values)
            .map_err(|e| IndexError::serialization(None, None, e.to_string()))?;

        info!(
            path = self.config.index_path(),
            entries = entries.len(),
            bytes = bytes.len(),
            "rendered search index"
        );
        Ok(bytes)
    }

    /// Build the index entries, in document selection order.
    pub fn entries(&self, collection: &DocumentCollection) -> Result<Vec<IndexEntry>, IndexError> {
        Ok(self
            .collect(collection)?
            .into_iter()
            .map(|(_, entry)| entry)
            .collect())
    }

    /// Select, extract, and run the hook, keeping each entry's document path
    /// for error attribution.
    fn collect(
        &self,
        collection: &DocumentCollection,
    ) -> Result<Vec<(String, IndexEntry)>, IndexError> {
        let selectors = self.config.selectors();
        let mut entries = Vec::new();

        for document in collection.iter() {
            if !selectors.matches(document.path()) {
                continue;
            }

            let (index, store) = self.extract(document)?;

            let (index, store) = match self.config.before_index() {
                Some(hook) => match (hook.as_ref())(index, store, document) {
                    Ok(HookOutcome::Keep(index, store)) => (index, store),
                    Ok(HookOutcome::Skip) => {
                        debug!(path = document.path(), "before-index hook skipped document");
                        continue;
                    }
                    Err(e) => return Err(IndexError::hook(document.path(), e.to_string())),
                },
                None => (index, store),
            };

            debug!(path = document.path(), "indexed document");
            entries.push((document.path().to_string(), IndexEntry { index, store }));
        }

        Ok(entries)
    }

    /// Evaluate every field rule against one document.
    fn extract(&self, document: &Document) -> Result<(FieldMap, FieldMap), IndexError> {
        let mut index = FieldMap::new();
        let mut store = FieldMap::new();

        for rule in self.config.fields() {
            let value = rule.extract(document)?;
            if rule.index {
                index.insert(rule.name.clone(), value.clone());
            }
            if rule.store {
                store.insert(rule.name.clone(), value);
            }
        }

        Ok((index, store))
    }
}
