//! Table binding step.

use super::Generator;
use crate::error::Result;
use crate::registry::{Registry, TableBinding};
use indexmap::IndexMap;
use tracing::debug;

/// Binds roles to physical tables.
///
/// Bindings for roles that are not registered yet are skipped, so the step
/// can run before every entity is known and again after.
#[derive(Debug, Clone, Default)]
pub struct LinkTables {
    bindings: IndexMap<String, TableBinding>,
}

impl LinkTables {
    /// Create a step without bindings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a role to a table in the default database.
    pub fn with_table(self, role: impl Into<String>, table: impl Into<String>) -> Self {
        self.bind(role, None, table)
    }

    /// Bind a role to a table in a named database.
    pub fn with_database_table(
        self,
        role: impl Into<String>,
        database: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        self.bind(role, Some(database.into()), table)
    }

    fn bind(
        mut self,
        role: impl Into<String>,
        database: Option<String>,
        table: impl Into<String>,
    ) -> Self {
        self.bindings.insert(
            role.into(),
            TableBinding {
                database,
                table: table.into(),
            },
        );
        self
    }
}

impl Generator for LinkTables {
    fn name(&self) -> &str {
        "link_tables"
    }

    fn run(&self, registry: &mut Registry) -> Result<()> {
        for (role, binding) in &self.bindings {
            if !registry.contains(role) {
                debug!(role = %role, "no entity to bind table to");
                continue;
            }
            registry.link_table(role.clone(), binding.database.clone(), binding.table.clone());
        }
        Ok(())
    }
}
