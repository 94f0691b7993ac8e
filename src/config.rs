//! Stage configuration.
//!
//! Two layers, mirroring how hosts configure extensions: [`SearchOptions`] is
//! the raw declarative surface (deserialized from the host's config file),
//! [`IndexConfig`] is the typed, validated, immutable bundle the builder
//! consumes. Hosts configuring in code use [`IndexConfig::builder`] directly;
//! the hook is only settable programmatically since a function value has no
//! declarative spelling.

use std::{fmt, path::Path};

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::{ConfigError, ConfigResult},
    fields::{FieldRule, FieldSource},
    hook::BeforeIndex,
    selector::SelectorSet,
};

/// Default output artifact path.
pub const DEFAULT_INDEX_PATH: &str = "search.json";

/// Raw per-field extraction options.
///
/// `kind` is `"attribute"` or `"content"`; `from` alone implies the attribute
/// kind. `default` applies to attribute fields and makes a missing attribute
/// yield the default instead of failing the build. `index` and `store`
/// control which of the two artifact maps receive the value (both by
/// default).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawField {
    /// Extraction kind name.
    #[serde(default)]
    pub kind: Option<String>,

    /// Attribute to read, for the attribute kind.
    #[serde(default)]
    pub from: Option<String>,

    /// Fallback value when the attribute is absent.
    #[serde(default)]
    pub default: Option<Value>,

    /// Whether the field is searchable.
    #[serde(default)]
    pub index: Option<bool>,

    /// Whether the field is stored for display.
    #[serde(default)]
    pub store: Option<bool>,
}

/// Declarative options surface recognized by this stage.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchOptions {
    /// Path selectors for documents eligible for indexing.
    #[serde(default)]
    pub resources: Vec<String>,

    /// Fields to extract per document, in declaration order.
    #[serde(default)]
    pub fields: IndexMap<String, RawField>,

    /// Output artifact path.
    #[serde(default = "default_index_path")]
    pub index_path: String,
}

fn default_index_path() -> String {
    DEFAULT_INDEX_PATH.to_string()
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            resources: Vec::new(),
            fields: IndexMap::new(),
            index_path: default_index_path(),
        }
    }
}

impl SearchOptions {
    /// Parse options from a TOML string.
    pub fn from_toml_str(input: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(input)?)
    }

    /// Load options from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load options from a TOML file, then layer `SITESEARCH_`-prefixed
    /// environment variables over the scalar options.
    ///
    /// `SITESEARCH_INDEX_PATH` overrides `index_path`;
    /// `SITESEARCH_RESOURCES` (comma-separated) overrides `resources`.
    pub fn load_with_env(path: &Path) -> ConfigResult<Self> {
        let mut options = Self::load(path)?;

        let env = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("SITESEARCH")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("resources"),
            )
            .build()?;

        if let Ok(index_path) = env.get_string("index_path") {
            options.index_path = index_path;
        }
        if let Ok(resources) = env.get_array("resources") {
            options.resources = resources
                .into_iter()
                .map(config::Value::into_string)
                .collect::<Result<_, _>>()?;
        }

        Ok(options)
    }

    /// Validate these options into an [`IndexConfig`].
    pub fn into_config(self) -> ConfigResult<IndexConfig> {
        let mut builder = IndexConfig::builder().index_path(self.index_path);

        for pattern in self.resources {
            builder = builder.resource(pattern);
        }

        for (name, raw) in self.fields {
            let kind = match (&raw.kind, &raw.from) {
                (Some(kind), _) => kind.clone(),
                (None, Some(_)) => "attribute".to_string(),
                (None, None) => return Err(ConfigError::MissingKind(name)),
            };

            let source = match kind.as_str() {
                "attribute" => {
                    let attr = raw
                        .from
                        .ok_or_else(|| ConfigError::MissingAttributeName(name.clone()))?;
                    match raw.default {
                        Some(default) => FieldSource::AttributeOr {
                            name: attr,
                            default,
                        },
                        None => FieldSource::Attribute(attr),
                    }
                }
                "content" => FieldSource::Content,
                other => {
                    return Err(ConfigError::UnknownKind {
                        field: name,
                        kind: other.to_string(),
                    })
                }
            };

            let rule = FieldRule::new(name, source)
                .with_index(raw.index.unwrap_or(true))
                .with_store(raw.store.unwrap_or(true));
            builder = builder.field(rule);
        }

        builder.build()
    }
}

/// Immutable, validated configuration for one search index stage.
#[derive(Clone)]
pub struct IndexConfig {
    resources: Vec<String>,
    selectors: SelectorSet,
    fields: Vec<FieldRule>,
    before_index: Option<BeforeIndex>,
    index_path: String,
}

impl IndexConfig {
    /// Start building a configuration.
    pub fn builder() -> IndexConfigBuilder {
        IndexConfigBuilder::default()
    }

    /// Source selector patterns.
    pub fn resources(&self) -> &[String] {
        &self.resources
    }

    /// Compiled selector set.
    pub fn selectors(&self) -> &SelectorSet {
        &self.selectors
    }

    /// Declared field rules, in declaration order.
    pub fn fields(&self) -> &[FieldRule] {
        &self.fields
    }

    /// The pre-index hook, when configured.
    pub fn before_index(&self) -> Option<&BeforeIndex> {
        self.before_index.as_ref()
    }

    /// Output artifact path.
    pub fn index_path(&self) -> &str {
        &self.index_path
    }
}

impl fmt::Debug for IndexConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexConfig")
            .field("resources", &self.resources)
            .field("fields", &self.fields)
            .field("before_index", &self.before_index.is_some())
            .field("index_path", &self.index_path)
            .finish()
    }
}

/// Builder for [`IndexConfig`].
#[derive(Default)]
pub struct IndexConfigBuilder {
    resources: Vec<String>,
    fields: Vec<FieldRule>,
    before_index: Option<BeforeIndex>,
    index_path: Option<String>,
}

impl IndexConfigBuilder {
    /// Add a path selector.
    #[must_use]
    pub fn resource(mut self, pattern: impl Into<String>) -> Self {
        self.resources.push(pattern.into());
        self
    }

    /// Declare a field.
    #[must_use]
    pub fn field(mut self, rule: FieldRule) -> Self {
        self.fields.push(rule);
        self
    }

    /// Set the pre-index hook.
    #[must_use]
    pub fn before_index(mut self, hook: BeforeIndex) -> Self {
        self.before_index = Some(hook);
        self
    }

    /// Set the output artifact path.
    #[must_use]
    pub fn index_path(mut self, path: impl Into<String>) -> Self {
        self.index_path = Some(path.into());
        self
    }

    /// Validate and build the configuration.
    pub fn build(self) -> ConfigResult<IndexConfig> {
        let index_path = self.index_path.unwrap_or_else(default_index_path);
        if index_path.is_empty() {
            return Err(ConfigError::EmptyIndexPath);
        }

        for (i, rule) in self.fields.iter().enumerate() {
            if self.fields[..i].iter().any(|r| r.name == rule.name) {
                return Err(ConfigError::DuplicateField(rule.name.clone()));
            }
        }

        let selectors = SelectorSet::compile(&self.resources)?;

        Ok(IndexConfig {
            resources: self.resources,
            selectors,
            fields: self.fields,
            before_index: self.before_index,
            index_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_options_defaults() {
        let options = SearchOptions::from_toml_str("").unwrap();
        assert!(options.resources.is_empty());
        assert!(options.fields.is_empty());
        assert_eq!(options.index_path, "search.json");
    }

    #[test]
    fn test_options_full_surface() {
        let options = SearchOptions::from_toml_str(
            r#"
resources = ["/posts/**", "/about"]
index_path = "assets/search.json"

[fields.title]
from = "title"

[fields.content]
kind = "content"

[fields.tags]
from = "tags"
default = []
store = false
"#,
        )
        .unwrap();

        assert_eq!(options.resources, vec!["/posts/**", "/about"]);
        assert_eq!(options.index_path, "assets/search.json");

        let config = options.into_config().unwrap();
        assert_eq!(config.fields().len(), 3);

        // Declaration order survives into the config
        let names: Vec<_> = config.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["title", "content", "tags"]);

        let tags = &config.fields()[2];
        assert!(tags.index);
        assert!(!tags.store);
        assert!(matches!(
            tags.source,
            FieldSource::AttributeOr { .. }
        ));
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let options = SearchOptions::from_toml_str(
            r#"
[fields.title]
kind = "telepathy"
"#,
        )
        .unwrap();

        let err = options.into_config().unwrap_err();
        match err {
            ConfigError::UnknownKind { field, kind } => {
                assert_eq!(field, "title");
                assert_eq!(kind, "telepathy");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_field_without_kind_rejected() {
        let options = SearchOptions::from_toml_str("[fields.title]\n").unwrap();
        let err = options.into_config().unwrap_err();
        assert!(matches!(err, ConfigError::MissingKind(_)));
    }

    #[test]
    fn test_attribute_kind_requires_source() {
        let options = SearchOptions::from_toml_str(
            r#"
[fields.title]
kind = "attribute"
"#,
        )
        .unwrap();

        let err = options.into_config().unwrap_err();
        assert!(matches!(err, ConfigError::MissingAttributeName(_)));
    }

    #[test]
    fn test_empty_index_path_rejected() {
        let err = IndexConfig::builder().index_path("").build().unwrap_err();
        assert!(matches!(err, ConfigError::EmptyIndexPath));
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let err = IndexConfig::builder()
            .field(FieldRule::new("title", FieldSource::attribute("title")))
            .field(FieldRule::new("title", FieldSource::content()))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateField(_)));
    }

    #[test]
    fn test_builder_defaults() {
        let config = IndexConfig::builder()
            .field(FieldRule::new(
                "tags",
                FieldSource::attribute_or("tags", json!([])),
            ))
            .build()
            .unwrap();

        assert_eq!(config.index_path(), "search.json");
        assert!(config.resources().is_empty());
        assert!(config.selectors().is_empty());
        assert!(config.before_index().is_none());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("search.toml");
        std::fs::write(&path, "resources = [\"/a\"]\n").expect("write options");

        let options = SearchOptions::load(&path).expect("load options");
        assert_eq!(options.resources, vec!["/a"]);
    }

    #[test]
    fn test_load_missing_file() {
        let err = SearchOptions::load(Path::new("/nonexistent/search.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_with_env_override() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("search.toml");
        std::fs::write(&path, "index_path = \"from-file.json\"\n").expect("write options");

        std::env::set_var("SITESEARCH_INDEX_PATH", "from-env.json");
        let options = SearchOptions::load_with_env(&path).expect("load options");
        std::env::remove_var("SITESEARCH_INDEX_PATH");

        assert_eq!(options.index_path, "from-env.json");
    }
}
