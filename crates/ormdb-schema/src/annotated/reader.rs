//! Metadata reader contract.

use crate::definition::{RelationKind, Typecast};
use crate::error::MetadataError;
use std::collections::HashMap;

/// Class-level marker of an embeddable value object.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Embeddable {
    /// Explicit role; derived from the class name when absent.
    pub role: Option<String>,
    /// Mapper override.
    pub mapper: Option<String>,
    /// Prefix prepended to every column of the embeddable.
    pub column_prefix: String,
}

impl Embeddable {
    /// Create an embeddable marker with the given column prefix.
    pub fn new(column_prefix: impl Into<String>) -> Self {
        Self {
            column_prefix: column_prefix.into(),
            ..Self::default()
        }
    }

    /// Set the role.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Set the mapper override.
    pub fn with_mapper(mut self, mapper: impl Into<String>) -> Self {
        self.mapper = Some(mapper.into());
        self
    }
}

/// Column annotation on a property.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Column {
    /// Column name; the property name when absent.
    pub name: Option<String>,
    /// Primary key column.
    pub primary: bool,
    /// Referenced column.
    pub referenced: bool,
    /// Typecast directive.
    pub typecast: Option<Typecast>,
}

/// One annotation attached to a property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    /// Maps the property to a column.
    Column(Column),
    /// Declares a relation.
    Relation {
        /// Relation kind.
        kind: RelationKind,
        /// Target role or class.
        target: String,
    },
    /// Any annotation this crate does not interpret.
    Other(String),
}

/// A declared property with its annotations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// Property name.
    pub name: String,
    /// Annotations in declaration order.
    pub annotations: Vec<Annotation>,
}

impl Property {
    /// Create a property without annotations.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotations: Vec::new(),
        }
    }

    /// Add an annotation.
    pub fn with(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Map to a column named after the property.
    pub fn column(self) -> Self {
        self.with(Annotation::Column(Column::default()))
    }

    /// First column annotation.
    pub fn column_annotation(&self) -> Option<&Column> {
        self.annotations.iter().find_map(|a| match a {
            Annotation::Column(column) => Some(column),
            _ => None,
        })
    }

    /// Check if any annotation declares a relation.
    pub fn has_relation(&self) -> bool {
        self.annotations
            .iter()
            .any(|a| matches!(a, Annotation::Relation { .. }))
    }
}

/// Reads annotations of classes.
///
/// `embeddable` returns `Ok(None)` for classes that are not embeddable.
/// Malformed annotations are reported as [`MetadataError`].
pub trait MetadataReader: Send + Sync {
    /// Class-level embeddable marker.
    fn embeddable(&self, class: &str) -> Result<Option<Embeddable>, MetadataError>;

    /// Declared properties and their annotations.
    fn properties(&self, class: &str) -> Result<Vec<Property>, MetadataError>;
}

/// Metadata of one class held by a [`MemoryReader`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClassMetadata {
    /// Embeddable marker, if any.
    pub embeddable: Option<Embeddable>,
    /// Declared properties.
    pub properties: Vec<Property>,
}

/// Reader over metadata collected ahead of time (build scripts, derives,
/// fixtures).
#[derive(Debug, Clone, Default)]
pub struct MemoryReader {
    classes: HashMap<String, ClassMetadata>,
}

impl MemoryReader {
    /// Create an empty reader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a class.
    pub fn with_class(mut self, class: impl Into<String>, metadata: ClassMetadata) -> Self {
        self.classes.insert(class.into(), metadata);
        self
    }

    /// Add an embeddable class.
    pub fn with_embeddable(
        self,
        class: impl Into<String>,
        embeddable: Embeddable,
        properties: Vec<Property>,
    ) -> Self {
        self.with_class(
            class,
            ClassMetadata {
                embeddable: Some(embeddable),
                properties,
            },
        )
    }

    fn class(&self, class: &str) -> Result<&ClassMetadata, MetadataError> {
        self.classes
            .get(class)
            .ok_or_else(|| MetadataError::new(format!("class `{}` is not known", class)))
    }
}

impl MetadataReader for MemoryReader {
    fn embeddable(&self, class: &str) -> Result<Option<Embeddable>, MetadataError> {
        Ok(self.class(class)?.embeddable.clone())
    }

    fn properties(&self, class: &str) -> Result<Vec<Property>, MetadataError> {
        Ok(self.class(class)?.properties.clone())
    }
}
