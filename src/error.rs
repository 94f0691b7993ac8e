//! Error types for the search index stage.

use thiserror::Error;

/// Boxed error type carried by render callbacks and hooks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type alias for configuration-time operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Configuration errors, raised before any document is processed.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The index path option is empty.
    #[error("index path must not be empty")]
    EmptyIndexPath,

    /// A field name appears more than once in the field specification.
    #[error("duplicate field `{0}` in field specification")]
    DuplicateField(String),

    /// A field declares an extraction kind this stage does not know.
    #[error("field `{field}` has unrecognized extraction kind `{kind}`")]
    UnknownKind { field: String, kind: String },

    /// A field declares no extraction kind at all.
    #[error("field `{0}` specifies no extraction kind")]
    MissingKind(String),

    /// An attribute field does not name the attribute to read.
    #[error("field `{0}` uses the attribute kind but names no attribute")]
    MissingAttributeName(String),

    /// A resource selector failed to compile.
    #[error("invalid selector pattern `{pattern}`: {message}")]
    InvalidSelector { pattern: String, message: String },

    /// An output path is already taken by another document or output.
    #[error("output path `{0}` is already registered")]
    DuplicateOutputPath(String),

    /// Options file does not exist.
    #[error("options file not found: {0}")]
    NotFound(String),

    /// File system I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Environment layering error.
    #[error("environment config error: {0}")]
    Env(#[from] config::ConfigError),
}

/// Index build errors, raised while rendering the artifact. All fatal.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A selected document cannot supply a value for a declared field.
    #[error("cannot extract field `{field}` from `{document}`: {message}")]
    FieldExtraction {
        document: String,
        field: String,
        message: String,
    },

    /// The before-index hook itself failed.
    #[error("before-index hook failed for `{document}`: {message}")]
    Hook { document: String, message: String },

    /// The aggregated entries cannot be encoded to the output format.
    #[error("cannot encode search index entry{}: {message}", attribution(.document, .field))]
    Serialization {
        document: Option<String>,
        field: Option<String>,
        message: String,
    },
}

impl IndexError {
    /// Create a field extraction error for one document and field.
    pub fn extraction(
        document: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::FieldExtraction {
            document: document.into(),
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a hook failure error for one document.
    pub fn hook(document: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Hook {
            document: document.into(),
            message: message.into(),
        }
    }

    /// Create a serialization error, attributed when the failing entry is known.
    pub fn serialization(
        document: Option<String>,
        field: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Serialization {
            document,
            field,
            message: message.into(),
        }
    }
}

/// Errors from the output materialization walk.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// File system I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A registered output failed to render.
    #[error("failed to render output `{path}`: {message}")]
    Render { path: String, message: String },
}

fn attribution(document: &Option<String>, field: &Option<String>) -> String {
    match (document, field) {
        (Some(document), Some(field)) => format!(" for `{document}` field `{field}`"),
        (Some(document), None) => format!(" for `{document}`"),
        (None, Some(field)) => format!(" for field `{field}`"),
        (None, None) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_kind_display() {
        let err = ConfigError::UnknownKind {
            field: "title".to_string(),
            kind: "telepathy".to_string(),
        };
        assert!(err.to_string().contains("title"));
        assert!(err.to_string().contains("telepathy"));
    }

    #[test]
    fn test_extraction_error_names_document_and_field() {
        let err = IndexError::extraction("/posts/a", "title", "no such attribute");
        let message = err.to_string();
        assert!(message.contains("/posts/a"));
        assert!(message.contains("title"));
    }

    #[test]
    fn test_serialization_attribution() {
        let attributed =
            IndexError::serialization(Some("/a".to_string()), None, "bad value").to_string();
        assert!(attributed.contains("/a"));

        let bare = IndexError::serialization(None, None, "bad value").to_string();
        assert!(bare.contains("bad value"));
        assert!(!bare.contains("`"));
    }

    #[test]
    fn test_config_error_converts_into_index_error() {
        let err: IndexError = ConfigError::EmptyIndexPath.into();
        assert!(err.to_string().contains("index path"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: ConfigError = io_err.into();
        assert!(err.to_string().contains("IO error"));
    }
}
