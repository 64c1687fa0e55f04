//! Entity definitions.

use super::field::FieldDef;
use super::relation::Relation;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Definition of one mapped type.
///
/// Fields and relations keep their declaration order, which is also the
/// order of the packed columns and relations.
#[derive(Debug, Clone)]
pub struct EntityDef {
    /// Role name (unique within a registry).
    pub role: String,
    /// Fully-qualified name of the mapped type.
    pub class: String,
    /// Field definitions keyed by field name.
    pub fields: IndexMap<String, FieldDef>,
    /// Relations keyed by relation name.
    pub relations: IndexMap<String, Arc<dyn Relation>>,
    /// Source override.
    pub source: Option<String>,
    /// Mapper override.
    pub mapper: Option<String>,
    /// Repository override.
    pub repository: Option<String>,
    /// Constrain (default scope) override.
    pub constrain: Option<String>,
    /// Engine-specific metadata, passed through to the packed entry.
    pub schema: Value,
    /// Role of the parent entity for table inheritance.
    pub parent: Option<String>,
}

impl EntityDef {
    /// Create a new entity definition without fields.
    pub fn new(role: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            class: class.into(),
            fields: IndexMap::new(),
            relations: IndexMap::new(),
            source: None,
            mapper: None,
            repository: None,
            constrain: None,
            schema: Value::Object(Map::new()),
            parent: None,
        }
    }

    /// Add a field to the entity. A field with the same name is replaced in place.
    pub fn with_field(mut self, name: impl Into<String>, field: FieldDef) -> Self {
        self.fields.insert(name.into(), field);
        self
    }

    /// Attach a relation.
    pub fn with_relation(
        mut self,
        name: impl Into<String>,
        relation: impl Relation + 'static,
    ) -> Self {
        self.relations.insert(name.into(), Arc::new(relation));
        self
    }

    /// Set the source override.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Set the mapper override.
    pub fn with_mapper(mut self, mapper: impl Into<String>) -> Self {
        self.mapper = Some(mapper.into());
        self
    }

    /// Set the repository override.
    pub fn with_repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = Some(repository.into());
        self
    }

    /// Set the constrain override.
    pub fn with_constrain(mut self, constrain: impl Into<String>) -> Self {
        self.constrain = Some(constrain.into());
        self
    }

    /// Set the engine metadata blob.
    pub fn with_schema(mut self, schema: Value) -> Self {
        self.schema = schema;
        self
    }

    /// Declare this entity a child of `parent` (single table inheritance).
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Get a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.get(name)
    }

    /// Name of the first field marked primary, if any.
    ///
    /// Entities without one are not ready to be packed.
    pub fn primary_key(&self) -> Option<&str> {
        self.fields
            .iter()
            .find(|(_, field)| field.primary)
            .map(|(name, _)| name.as_str())
    }

    /// Unqualified type name: the part of the class after the last
    /// namespace separator (`\`, `::` or `.`).
    pub fn short_name(&self) -> &str {
        let class = self.class.as_str();
        let start = [
            class.rfind('\\').map(|i| i + 1),
            class.rfind("::").map(|i| i + 2),
            class.rfind('.').map(|i| i + 1),
        ]
        .into_iter()
        .flatten()
        .max()
        .unwrap_or(0);
        &class[start..]
    }
}
