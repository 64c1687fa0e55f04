//! Relation definitions between entities.

use serde_json::{Map, Value};
use std::fmt::Debug;

/// A relation attached to an entity.
///
/// The compiler never inspects relation internals; it stores whatever
/// [`Relation::pack`] returns under the relation name.
pub trait Relation: Debug + Send + Sync {
    /// Serialize this relation into its packed schema fragment.
    fn pack(&self) -> Value;
}

/// Kind of a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    /// Inline value object stored in the owner's table.
    Embedded,
    /// One-to-one, foreign key on the target.
    HasOne,
    /// One-to-many, foreign key on the target.
    HasMany,
    /// Inverse of has-one/has-many, foreign key on the owner.
    BelongsTo,
    /// Reference to a target without ownership.
    RefersTo,
    /// Many-to-many through a pivot entity.
    ManyToMany,
}

impl RelationKind {
    /// Name used in the packed schema.
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationKind::Embedded => "embedded",
            RelationKind::HasOne => "has_one",
            RelationKind::HasMany => "has_many",
            RelationKind::BelongsTo => "belongs_to",
            RelationKind::RefersTo => "refers_to",
            RelationKind::ManyToMany => "many_to_many",
        }
    }
}

/// When related entities are loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoadStrategy {
    /// Loaded on first access.
    #[default]
    Lazy,
    /// Loaded together with the owner.
    Eager,
}

impl LoadStrategy {
    /// Name used in the packed schema.
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadStrategy::Lazy => "lazy",
            LoadStrategy::Eager => "eager",
        }
    }
}

/// Stock relation definition.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationDef {
    /// Relation kind.
    pub kind: RelationKind,
    /// Role of the target entity.
    pub target: String,
    /// Load strategy.
    pub load: LoadStrategy,
    /// Join metadata (inner/outer keys, cascade, nullable, pivot...).
    pub options: Map<String, Value>,
}

impl RelationDef {
    /// Create a relation of the given kind.
    pub fn new(kind: RelationKind, target: impl Into<String>) -> Self {
        Self {
            kind,
            target: target.into(),
            load: LoadStrategy::default(),
            options: Map::new(),
        }
    }

    /// Create a belongs-to relation.
    pub fn belongs_to(target: impl Into<String>) -> Self {
        Self::new(RelationKind::BelongsTo, target)
    }

    /// Create a has-one relation.
    pub fn has_one(target: impl Into<String>) -> Self {
        Self::new(RelationKind::HasOne, target)
    }

    /// Create a has-many relation.
    pub fn has_many(target: impl Into<String>) -> Self {
        Self::new(RelationKind::HasMany, target)
    }

    /// Create an embedded relation.
    pub fn embedded(target: impl Into<String>) -> Self {
        Self::new(RelationKind::Embedded, target)
    }

    /// Create a many-to-many relation through the given pivot role.
    pub fn many_to_many(target: impl Into<String>, through: impl Into<String>) -> Self {
        Self::new(RelationKind::ManyToMany, target)
            .with_option("through", Value::String(through.into()))
    }

    /// Load eagerly.
    pub fn eager(mut self) -> Self {
        self.load = LoadStrategy::Eager;
        self
    }

    /// Set a join option.
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }
}

impl Relation for RelationDef {
    fn pack(&self) -> Value {
        let mut packed = Map::new();
        packed.insert("type".into(), Value::from(self.kind.as_str()));
        packed.insert("target".into(), Value::from(self.target.as_str()));
        packed.insert("load".into(), Value::from(self.load.as_str()));
        packed.insert("schema".into(), Value::Object(self.options.clone()));
        Value::Object(packed)
    }
}
