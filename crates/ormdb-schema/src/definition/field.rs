//! Field definitions for entities.

use super::typecast::Typecast;

/// A field definition within an entity.
///
/// The field name is the key under which the definition is stored on its
/// entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// Physical column name.
    pub column: String,
    /// Whether this field is the primary key.
    pub primary: bool,
    /// Whether other entities may reference this field.
    pub referenced: bool,
    /// Conversion applied when hydrating values.
    pub typecast: Option<Typecast>,
}

impl FieldDef {
    /// Create a plain field mapped to the given column.
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            primary: false,
            referenced: false,
            typecast: None,
        }
    }

    /// Create a primary key field. Primary keys are always referenced.
    pub fn primary(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            primary: true,
            referenced: true,
            typecast: None,
        }
    }

    /// Mark as referenced.
    pub fn with_referenced(mut self) -> Self {
        self.referenced = true;
        self
    }

    /// Set the typecast directive.
    pub fn with_typecast(mut self, typecast: Typecast) -> Self {
        self.typecast = Some(typecast);
        self
    }

    /// Prepend a prefix to the column name.
    pub fn with_column_prefix(mut self, prefix: &str) -> Self {
        self.column = format!("{}{}", prefix, self.column);
        self
    }

    /// Check if this field declares a typecast.
    pub fn has_typecast(&self) -> bool {
        self.typecast.is_some()
    }
}
