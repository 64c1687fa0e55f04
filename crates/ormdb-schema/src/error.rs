//! Schema compilation error types.

use thiserror::Error;

/// Boxed cause attached to a [`MetadataError`].
pub type BoxedCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A metadata reader could not read the annotations of a class.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct MetadataError {
    /// Description of what could not be read.
    pub message: String,
    /// Underlying cause, if the reader has one.
    #[source]
    pub source: Option<BoxedCause>,
}

impl MetadataError {
    /// Create a metadata error without an underlying cause.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Attach the underlying cause.
    pub fn with_source(mut self, source: impl Into<BoxedCause>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Errors that abort a compile run.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Annotations of a candidate class could not be read.
    #[error("unable to read metadata of `{class}`: {source}")]
    Metadata {
        /// The offending class.
        class: String,
        /// The reader failure.
        #[source]
        source: MetadataError,
    },

    /// An embeddable entity declares a relation.
    #[error("relations are not allowed within embeddable entities in `{class}`")]
    RelationInEmbeddable {
        /// Class of the embeddable entity.
        class: String,
    },

    /// A pipeline step does not resolve to a generator.
    #[error("invalid generator `{name}`")]
    InvalidGenerator {
        /// Name of the offending step.
        name: String,
    },

    /// A role is already registered and the registry is strict.
    #[error("role `{role}` is already registered")]
    DuplicateRole {
        /// The colliding role.
        role: String,
    },

    /// An entity was registered without a role.
    #[error("entity `{class}` has an empty role")]
    EmptyRole {
        /// Class of the entity.
        class: String,
    },

    /// Following parent roles from an entity leads back to itself.
    #[error("inheritance of `{role}` loops back on itself")]
    InheritanceCycle {
        /// Role where the loop was detected.
        role: String,
    },

    /// Packed schema could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl SchemaError {
    /// Wrap a reader failure for the given class.
    pub fn metadata(class: impl Into<String>, source: MetadataError) -> Self {
        SchemaError::Metadata {
            class: class.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for SchemaError {
    fn from(err: serde_json::Error) -> Self {
        SchemaError::Serialization(err.to_string())
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_display() {
        let err = SchemaError::RelationInEmbeddable {
            class: "app::Address".to_string(),
        };
        assert!(err.to_string().contains("`app::Address`"));

        let err = SchemaError::InvalidGenerator {
            name: "render_tables".to_string(),
        };
        assert_eq!(err.to_string(), "invalid generator `render_tables`");
    }

    #[test]
    fn test_metadata_error_keeps_cause() {
        let cause = std::io::Error::new(std::io::ErrorKind::InvalidData, "bad annotation");
        let err = SchemaError::metadata(
            "app::User",
            MetadataError::new("syntax error").with_source(cause),
        );

        assert!(err.to_string().contains("app::User"));
        let source = err.source().unwrap();
        assert_eq!(source.to_string(), "syntax error");
        assert_eq!(source.source().unwrap().to_string(), "bad annotation");
    }
}
