//! Packed schema - the flat, serializable output of the compiler.
//!
//! Both levels are ordered maps, so encoding an unchanged schema always
//! produces the same bytes.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::btree_map::{self, BTreeMap};

/// Logical keys of a packed entry.
///
/// Variant order is the canonical key order of every entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaKey {
    /// Role of the parent entry (child back-references only).
    Role,
    /// Class of the mapped type.
    Entity,
    /// Mapper identifier.
    Mapper,
    /// Source identifier.
    Source,
    /// Repository identifier.
    Repository,
    /// Database name.
    Database,
    /// Table name.
    Table,
    /// Primary key field name.
    PrimaryKey,
    /// Fields usable to find an entity.
    FindByKeys,
    /// Field name to column name.
    Columns,
    /// Relation name to packed relation.
    Relations,
    /// Inheritance alias to child class.
    Children,
    /// Constrain identifier.
    Constrain,
    /// Field name to typecast directive.
    Typecast,
    /// Engine-specific metadata.
    Schema,
}

/// Packed descriptor of one role.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackedEntry(BTreeMap<SchemaKey, Value>);

impl PackedEntry {
    /// Create an empty entry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a child entry pointing at the parent's role.
    pub fn reference(parent_role: impl Into<String>) -> Self {
        let mut entry = Self::new();
        entry.insert(SchemaKey::Role, Value::String(parent_role.into()));
        entry
    }

    /// Set a key.
    pub fn insert(&mut self, key: SchemaKey, value: Value) {
        self.0.insert(key, value);
    }

    /// Read a key.
    pub fn get(&self, key: SchemaKey) -> Option<&Value> {
        self.0.get(&key)
    }

    /// Check if a key is present.
    pub fn contains(&self, key: SchemaKey) -> bool {
        self.0.contains_key(&key)
    }

    /// Keys in canonical order.
    pub fn keys(&self) -> impl Iterator<Item = SchemaKey> + '_ {
        self.0.keys().copied()
    }

    /// Parent role if this entry is a child back-reference.
    pub fn parent_role(&self) -> Option<&str> {
        match self.get(SchemaKey::Role) {
            Some(Value::String(role)) if self.0.len() == 1 => Some(role.as_str()),
            _ => None,
        }
    }

    /// Class of the mapped type.
    pub fn class(&self) -> Option<&str> {
        self.get(SchemaKey::Entity).and_then(Value::as_str)
    }

    /// Primary key field name.
    pub fn primary_key(&self) -> Option<&str> {
        self.get(SchemaKey::PrimaryKey).and_then(Value::as_str)
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the entry has no keys.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Packed entries keyed by role.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackedSchema(BTreeMap<String, PackedEntry>);

impl PackedSchema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an entry under a role, replacing any previous one.
    pub fn insert(&mut self, role: impl Into<String>, entry: PackedEntry) {
        self.0.insert(role.into(), entry);
    }

    /// Get the entry of a role.
    pub fn get(&self, role: &str) -> Option<&PackedEntry> {
        self.0.get(role)
    }

    /// Check if a role has an entry.
    pub fn contains(&self, role: &str) -> bool {
        self.0.contains_key(role)
    }

    /// All roles, sorted.
    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Iterate entries sorted by role.
    pub fn iter(&self) -> btree_map::Iter<'_, String, PackedEntry> {
        self.0.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the schema is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Read one key of a role's entry.
    ///
    /// Child back-references are followed to the parent entry.
    pub fn define(&self, role: &str, key: SchemaKey) -> Option<&Value> {
        let entry = self.get(role)?;
        match entry.parent_role() {
            Some(parent) if key != SchemaKey::Role => self.get(parent)?.get(key),
            _ => entry.get(key),
        }
    }

    /// Encode to canonical JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decode from JSON bytes.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

impl<'a> IntoIterator for &'a PackedSchema {
    type Item = (&'a String, &'a PackedEntry);
    type IntoIter = btree_map::Iter<'a, String, PackedEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
