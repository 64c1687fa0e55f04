//! Compiler from entity definitions to the packed schema.

use crate::config::{CompilerConfig, CompilerDefaults};
use crate::definition::EntityDef;
use crate::error::Result;
use crate::generator::{Generator, Pipeline};
use crate::packed::{PackedEntry, PackedSchema, SchemaKey};
use crate::registry::Registry;
use heck::ToUpperCamelCase;
use indexmap::IndexSet;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info, instrument, trace};

/// Runs the generator pipeline over a registry and packs every complete
/// entity.
///
/// The compiler keeps the schema of its last run, see [`Compiler::schema`].
#[derive(Debug, Default)]
pub struct Compiler {
    pipeline: Pipeline,
    defaults: CompilerDefaults,
    result: PackedSchema,
}

impl Compiler {
    /// Create a compiler with stock defaults and an empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a compiler with the given defaults.
    pub fn with_defaults(defaults: CompilerDefaults) -> Self {
        Self {
            defaults,
            ..Self::default()
        }
    }

    /// Create a compiler from configuration.
    ///
    /// Every configured generator becomes a named step; the generators
    /// themselves are supplied with [`Compiler::provide`].
    pub fn from_config(config: CompilerConfig) -> Self {
        let mut compiler = Self::with_defaults(config.defaults);
        for name in config.generators {
            compiler.add_named(name);
        }
        compiler
    }

    /// Append a generator to the pipeline.
    pub fn add_generator(&mut self, generator: impl Generator + 'static) {
        self.pipeline.add_generator(generator);
    }

    /// Append a generator the caller keeps a handle to.
    pub fn add_shared(&mut self, generator: Arc<dyn Generator>) {
        self.pipeline.add_shared(generator);
    }

    /// Append a named pipeline step.
    pub fn add_named(&mut self, name: impl Into<String>) {
        self.pipeline.add_named(name);
    }

    /// Make a generator available to named steps.
    pub fn provide(&mut self, name: impl Into<String>, generator: impl Generator + 'static) {
        self.pipeline.provide(name, generator);
    }

    /// The generator pipeline.
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Defaults applied to entities without overrides.
    pub fn defaults(&self) -> &CompilerDefaults {
        &self.defaults
    }

    /// Schema produced by the last successful run.
    pub fn schema(&self) -> &PackedSchema {
        &self.result
    }

    /// Run the pipeline over the registry and pack its entities.
    ///
    /// Entities without a primary key are not ready and are left out.
    /// Children of a registered parent, at any depth, are packed through
    /// their inheritance root. A parent cycle aborts the run.
    /// Any generator error aborts the run and leaves the schema empty.
    #[instrument(skip_all, fields(steps = self.pipeline.len()))]
    pub fn compile(&mut self, registry: &mut Registry) -> Result<&PackedSchema> {
        self.result.clear();
        self.pipeline.run(registry)?;

        let descendants = registry.descendants()?;
        for entity in registry.iter() {
            if registry.has_parent(entity) {
                continue;
            }

            let Some(primary_key) = entity.primary_key() else {
                debug!(role = %entity.role, "skipping entity without primary key");
                continue;
            };

            let children = descendants
                .get(entity.role.as_str())
                .map_or(&[][..], Vec::as_slice);
            self.compute(registry, entity, primary_key, children);
        }

        info!(entries = self.result.len(), "schema compiled");
        Ok(&self.result)
    }

    /// Pack one root entity and every entity inheriting from it.
    fn compute(
        &mut self,
        registry: &Registry,
        entity: &EntityDef,
        primary_key: &str,
        children: &[&EntityDef],
    ) {
        let defaults = &self.defaults;
        let mut packed = PackedEntry::new();

        packed.insert(SchemaKey::Entity, Value::from(entity.class.as_str()));
        packed.insert(SchemaKey::Source, or_default(&entity.source, &defaults.source));
        packed.insert(SchemaKey::Mapper, or_default(&entity.mapper, &defaults.mapper));
        packed.insert(
            SchemaKey::Repository,
            or_default(&entity.repository, &defaults.repository),
        );
        packed.insert(
            SchemaKey::Constrain,
            or_default(&entity.constrain, &defaults.constrain),
        );
        packed.insert(SchemaKey::Schema, entity.schema.clone());
        packed.insert(SchemaKey::PrimaryKey, Value::from(primary_key));
        packed.insert(SchemaKey::Columns, render_columns(entity));
        packed.insert(SchemaKey::FindByKeys, render_references(entity, primary_key));
        packed.insert(SchemaKey::Typecast, render_typecast(entity));
        packed.insert(SchemaKey::Relations, render_relations(registry, entity));

        if let Some(table) = registry.table(&entity.role) {
            packed.insert(
                SchemaKey::Database,
                registry.database(&entity.role).map_or(Value::Null, Value::from),
            );
            packed.insert(SchemaKey::Table, Value::from(table));
        }

        let mut aliases = Map::new();
        for child in children {
            self.result
                .insert(child.role.clone(), PackedEntry::reference(entity.role.clone()));
            aliases.insert(child_alias(child), Value::from(child.class.as_str()));
        }
        if !aliases.is_empty() {
            packed.insert(SchemaKey::Children, Value::Object(aliases));
        }

        trace!(role = %entity.role, keys = packed.len(), "packed entity");
        self.result.insert(entity.role.clone(), packed);
    }
}

fn or_default(value: &Option<String>, default: &Option<String>) -> Value {
    value
        .as_deref()
        .or(default.as_deref())
        .map_or(Value::Null, Value::from)
}

/// Field name to column name, in declaration order.
fn render_columns(entity: &EntityDef) -> Value {
    let columns = entity
        .fields
        .iter()
        .map(|(name, field)| (name.clone(), Value::from(field.column.as_str())))
        .collect();
    Value::Object(columns)
}

/// Primary key followed by every referenced field, without duplicates.
fn render_references(entity: &EntityDef, primary_key: &str) -> Value {
    let mut keys = IndexSet::new();
    keys.insert(primary_key);
    keys.extend(
        entity
            .fields
            .iter()
            .filter(|(_, field)| field.referenced)
            .map(|(name, _)| name.as_str()),
    );
    Value::Array(keys.into_iter().map(Value::from).collect())
}

/// Field name to typecast, for fields that declare one.
fn render_typecast(entity: &EntityDef) -> Value {
    let typecast = entity
        .fields
        .iter()
        .filter_map(|(name, field)| field.typecast.as_ref().map(|cast| (name.clone(), cast.pack())))
        .collect();
    Value::Object(typecast)
}

fn render_relations(registry: &Registry, entity: &EntityDef) -> Value {
    let relations = registry
        .relations_of(&entity.role)
        .map(|(name, relation)| (name.to_string(), relation.pack()))
        .collect();
    Value::Object(relations)
}

/// Alias of an inheritance child: its short class name in upper camel case.
fn child_alias(child: &EntityDef) -> String {
    child.short_name().to_upper_camel_case()
}
