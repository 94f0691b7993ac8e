//! Documents and the live document collection.
//!
//! The host site generator produces the collection; this stage only reads it
//! during rendering. Registration additionally records planned outputs on the
//! collection so later stages can plan against files that do not exist yet.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ConfigError, ConfigResult};

/// One generated page or record, eligible for indexing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Output path of the document, unique within the collection.
    pub path: String,

    /// Arbitrary attributes supplied by the generator (frontmatter, metadata).
    #[serde(default)]
    pub attributes: Map<String, Value>,

    /// Rendered body content.
    #[serde(default)]
    pub content: String,
}

impl Document {
    /// Create a document with the given path and no attributes or content.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            attributes: Map::new(),
            content: String::new(),
        }
    }

    /// Attach an attribute value.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Attach rendered content.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// The document's output path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Look up an attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// The rendered content.
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Descriptor for an output that will exist after materialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedOutput {
    /// Output path the producing stage claimed.
    pub path: String,

    /// Short tag naming the producing stage.
    pub producer: String,
}

impl PlannedOutput {
    /// Create a planned output descriptor.
    pub fn new(path: impl Into<String>, producer: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            producer: producer.into(),
        }
    }
}

/// Ordered collection of generated documents plus planned outputs.
///
/// Enumeration order is the generator's natural order and is what the index
/// artifact preserves.
#[derive(Debug, Clone, Default)]
pub struct DocumentCollection {
    documents: Vec<Document>,
    planned: Vec<PlannedOutput>,
}

impl DocumentCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a collection from documents, preserving their order.
    pub fn from_documents(documents: Vec<Document>) -> Self {
        Self {
            documents,
            planned: Vec::new(),
        }
    }

    /// Append a document at the end of the collection.
    pub fn push(&mut self, document: Document) {
        self.documents.push(document);
    }

    /// Look up a document by path.
    pub fn get(&self, path: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.path == path)
    }

    /// Iterate documents in collection order.
    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter()
    }

    /// All documents, in collection order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the collection holds no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Record a planned output.
    ///
    /// Fails when the path is already taken by a document or another planned
    /// output.
    pub fn plan_output(&mut self, output: PlannedOutput) -> ConfigResult<()> {
        let taken = self.planned.iter().any(|p| p.path == output.path)
            || self.documents.iter().any(|d| d.path == output.path);
        if taken {
            return Err(ConfigError::DuplicateOutputPath(output.path));
        }
        self.planned.push(output);
        Ok(())
    }

    /// Outputs planned so far, in registration order.
    pub fn planned_outputs(&self) -> &[PlannedOutput] {
        &self.planned
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_document_builder() {
        let doc = Document::new("/posts/hello")
            .with_attribute("title", "Hello")
            .with_attribute("tags", json!(["a", "b"]))
            .with_content("<p>hi</p>");

        assert_eq!(doc.path(), "/posts/hello");
        assert_eq!(doc.attribute("title"), Some(&json!("Hello")));
        assert_eq!(doc.attribute("tags"), Some(&json!(["a", "b"])));
        assert_eq!(doc.attribute("missing"), None);
        assert_eq!(doc.content(), "<p>hi</p>");
    }

    #[test]
    fn test_collection_order_and_lookup() {
        let collection = DocumentCollection::from_documents(vec![
            Document::new("/b"),
            Document::new("/a"),
        ]);

        let paths: Vec<_> = collection.iter().map(Document::path).collect();
        assert_eq!(paths, vec!["/b", "/a"]);
        assert!(collection.get("/a").is_some());
        assert!(collection.get("/c").is_none());
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn test_plan_output_rejects_duplicates() {
        let mut collection = DocumentCollection::new();
        collection
            .plan_output(PlannedOutput::new("search.json", "search-index"))
            .unwrap();

        let err = collection
            .plan_output(PlannedOutput::new("search.json", "other"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateOutputPath(_)));
        assert_eq!(collection.planned_outputs().len(), 1);
    }

    #[test]
    fn test_plan_output_rejects_document_path() {
        let mut collection = DocumentCollection::from_documents(vec![Document::new("about.html")]);

        let err = collection
            .plan_output(PlannedOutput::new("about.html", "search-index"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateOutputPath(_)));
    }
}
