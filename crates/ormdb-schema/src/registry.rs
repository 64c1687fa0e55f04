//! Ordered registry of entity definitions.

use crate::definition::{EntityDef, Relation};
use crate::error::{Result, SchemaError};
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::warn;

/// What [`Registry::register`] does when a role is already present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegistrationPolicy {
    /// Replace the existing definition, keeping its position.
    #[default]
    Replace,
    /// Reject the new definition.
    Strict,
}

/// Physical table an entity is stored in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableBinding {
    /// Database name, `None` for the default database.
    pub database: Option<String>,
    /// Table name.
    pub table: String,
}

/// Entity definitions keyed by role, in registration order.
///
/// A registry is owned by a single compile run at a time; generators
/// receive it mutably and in sequence.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entities: IndexMap<String, EntityDef>,
    tables: HashMap<String, TableBinding>,
    policy: RegistrationPolicy,
}

impl Registry {
    /// Create an empty registry with the replace policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry that rejects duplicate roles.
    pub fn strict() -> Self {
        Self::new().with_policy(RegistrationPolicy::Strict)
    }

    /// Set the registration policy.
    pub fn with_policy(mut self, policy: RegistrationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Current registration policy.
    pub fn policy(&self) -> RegistrationPolicy {
        self.policy
    }

    /// Insert an entity, or replace the one registered under the same role.
    pub fn register(&mut self, entity: EntityDef) -> Result<()> {
        if entity.role.is_empty() {
            return Err(SchemaError::EmptyRole {
                class: entity.class,
            });
        }

        if let Some(existing) = self.entities.get(&entity.role) {
            match self.policy {
                RegistrationPolicy::Strict => {
                    return Err(SchemaError::DuplicateRole { role: entity.role });
                }
                RegistrationPolicy::Replace => {
                    warn!(
                        role = %entity.role,
                        previous = %existing.class,
                        class = %entity.class,
                        "replacing registered entity"
                    );
                }
            }
        }

        self.entities.insert(entity.role.clone(), entity);
        Ok(())
    }

    /// Get an entity by role.
    pub fn find(&self, role: &str) -> Option<&EntityDef> {
        self.entities.get(role)
    }

    /// Get a mutable entity by role.
    pub fn find_mut(&mut self, role: &str) -> Option<&mut EntityDef> {
        self.entities.get_mut(role)
    }

    /// Get the first entity mapped to the given class.
    pub fn find_by_class(&self, class: &str) -> Option<&EntityDef> {
        self.entities.values().find(|e| e.class == class)
    }

    /// Check if a role is registered.
    pub fn contains(&self, role: &str) -> bool {
        self.entities.contains_key(role)
    }

    /// Iterate entities in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &EntityDef> {
        self.entities.values()
    }

    /// Iterate entities mutably in registration order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut EntityDef> {
        self.entities.values_mut()
    }

    /// Number of registered entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entities whose parent is `role`, in registration order.
    pub fn children<'a>(&'a self, role: &'a str) -> impl Iterator<Item = &'a EntityDef> + 'a {
        self.entities
            .values()
            .filter(move |e| e.parent.as_deref() == Some(role))
    }

    /// Check if the entity's parent is registered here.
    pub fn has_parent(&self, entity: &EntityDef) -> bool {
        entity
            .parent
            .as_deref()
            .is_some_and(|parent| self.contains(parent))
    }

    /// Root of the entity's inheritance chain, following registered parents.
    ///
    /// An entity without a registered parent is its own root.
    pub fn root_of<'a>(&'a self, entity: &'a EntityDef) -> Result<&'a EntityDef> {
        let mut seen = HashSet::new();
        let mut current = entity;
        while let Some(parent) = current.parent.as_deref().and_then(|p| self.find(p)) {
            if !seen.insert(current.role.as_str()) {
                return Err(SchemaError::InheritanceCycle {
                    role: entity.role.clone(),
                });
            }
            current = parent;
        }
        Ok(current)
    }

    /// Non-root entities grouped by the role of their inheritance root.
    ///
    /// Nested children are attached to the root, in registration order.
    pub fn descendants(&self) -> Result<IndexMap<&str, Vec<&EntityDef>>> {
        let mut groups: IndexMap<&str, Vec<&EntityDef>> = IndexMap::new();
        for entity in self.entities.values() {
            let root = self.root_of(entity)?;
            if root.role != entity.role {
                groups.entry(root.role.as_str()).or_default().push(entity);
            }
        }
        Ok(groups)
    }

    /// Bind a role to a physical table.
    pub fn link_table(
        &mut self,
        role: impl Into<String>,
        database: Option<String>,
        table: impl Into<String>,
    ) {
        self.tables.insert(
            role.into(),
            TableBinding {
                database,
                table: table.into(),
            },
        );
    }

    /// Check if a table is bound to the role.
    pub fn has_table(&self, role: &str) -> bool {
        self.tables.contains_key(role)
    }

    /// Database bound to the role, `None` when unbound or the default database.
    pub fn database(&self, role: &str) -> Option<&str> {
        self.tables.get(role).and_then(|b| b.database.as_deref())
    }

    /// Table bound to the role.
    pub fn table(&self, role: &str) -> Option<&str> {
        self.tables.get(role).map(|b| b.table.as_str())
    }

    /// Relations declared by the role's entity, in declaration order.
    pub fn relations_of<'a>(
        &'a self,
        role: &str,
    ) -> impl Iterator<Item = (&'a str, &'a Arc<dyn Relation>)> + 'a {
        self.entities
            .get(role)
            .into_iter()
            .flat_map(|e| e.relations.iter().map(|(name, rel)| (name.as_str(), rel)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{FieldDef, RelationDef};

    fn user() -> EntityDef {
        EntityDef::new("user", "app::User").with_field("id", FieldDef::primary("id"))
    }

    #[test]
    fn test_register_and_find() {
        let mut registry = Registry::new();
        registry.register(user()).unwrap();

        assert!(registry.contains("user"));
        assert_eq!(registry.find("user").unwrap().class, "app::User");
        assert_eq!(registry.find_by_class("app::User").unwrap().role, "user");
        assert!(registry.find("post").is_none());
    }

    #[test]
    fn test_iteration_order() {
        let mut registry = Registry::new();
        for role in ["c", "a", "b"] {
            registry.register(EntityDef::new(role, role)).unwrap();
        }

        let roles: Vec<_> = registry.iter().map(|e| e.role.as_str()).collect();
        assert_eq!(roles, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut registry = Registry::new();
        registry.register(user()).unwrap();
        registry.register(EntityDef::new("post", "app::Post")).unwrap();
        registry
            .register(EntityDef::new("user", "app::Admin"))
            .unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.iter().next().unwrap().class, "app::Admin");
    }

    #[test]
    fn test_strict_rejects_duplicates() {
        let mut registry = Registry::strict();
        registry.register(user()).unwrap();

        let err = registry.register(user()).unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateRole { role } if role == "user"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_empty_role_rejected() {
        let mut registry = Registry::new();
        let err = registry.register(EntityDef::new("", "app::Ghost")).unwrap_err();

        assert!(matches!(err, SchemaError::EmptyRole { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_children() {
        let mut registry = Registry::new();
        registry.register(EntityDef::new("vehicle", "Vehicle")).unwrap();
        registry
            .register(EntityDef::new("car", "Car").with_parent("vehicle"))
            .unwrap();
        registry
            .register(EntityDef::new("truck", "Truck").with_parent("vehicle"))
            .unwrap();
        registry
            .register(EntityDef::new("boat", "Boat").with_parent("ship"))
            .unwrap();

        let children: Vec<_> = registry.children("vehicle").map(|e| e.role.as_str()).collect();
        assert_eq!(children, vec!["car", "truck"]);
        assert!(registry.has_parent(registry.find("car").unwrap()));
        assert!(!registry.has_parent(registry.find("boat").unwrap()));
    }

    #[test]
    fn test_nested_descendants_attach_to_root() {
        let mut registry = Registry::new();
        registry.register(EntityDef::new("vehicle", "Vehicle")).unwrap();
        registry
            .register(EntityDef::new("sports_car", "SportsCar").with_parent("car"))
            .unwrap();
        registry
            .register(EntityDef::new("car", "Car").with_parent("vehicle"))
            .unwrap();
        registry
            .register(EntityDef::new("boat", "Boat").with_parent("ship"))
            .unwrap();

        let sports_car = registry.find("sports_car").unwrap();
        assert_eq!(registry.root_of(sports_car).unwrap().role, "vehicle");

        let groups = registry.descendants().unwrap();
        let roles: Vec<_> = groups["vehicle"].iter().map(|e| e.role.as_str()).collect();
        assert_eq!(roles, vec!["sports_car", "car"]);
        assert_eq!(groups.len(), 1);
    }

    #[test]
    fn test_parent_cycle_is_rejected() {
        let mut registry = Registry::new();
        registry
            .register(EntityDef::new("a", "A").with_parent("b"))
            .unwrap();
        registry
            .register(EntityDef::new("b", "B").with_parent("a"))
            .unwrap();

        let err = registry.descendants().unwrap_err();
        assert!(matches!(err, SchemaError::InheritanceCycle { ref role } if role == "a"));

        let mut registry = Registry::new();
        registry
            .register(EntityDef::new("node", "Node").with_parent("node"))
            .unwrap();
        let node = registry.find("node").unwrap();
        assert!(matches!(
            registry.root_of(node),
            Err(SchemaError::InheritanceCycle { .. })
        ));
    }

    #[test]
    fn test_table_binding() {
        let mut registry = Registry::new();
        registry.register(user()).unwrap();
        assert!(!registry.has_table("user"));

        registry.link_table("user", Some("primary".to_string()), "users");

        assert!(registry.has_table("user"));
        assert_eq!(registry.database("user"), Some("primary"));
        assert_eq!(registry.table("user"), Some("users"));
    }

    #[test]
    fn test_relations_of() {
        let mut registry = Registry::new();
        registry
            .register(
                user()
                    .with_relation("posts", RelationDef::has_many("post"))
                    .with_relation("profile", RelationDef::has_one("profile")),
            )
            .unwrap();

        let names: Vec<_> = registry.relations_of("user").map(|(n, _)| n).collect();
        assert_eq!(names, vec!["posts", "profile"]);
        assert_eq!(registry.relations_of("missing").count(), 0);
    }
}
