//! ORMDB Schema - compiles entity definitions into the packed schema read by
//! the ORM runtime.
//!
//! Compilation is a single synchronous pass:
//!
//! 1. A [`Registry`] is filled with [`EntityDef`]s, usually by a metadata
//!    reader.
//! 2. The [`Compiler`]'s generators run over the registry in order, each one
//!    completing or rewriting definitions (embeddables, table bindings...).
//! 3. Every entity with a primary key is packed into a [`PackedEntry`];
//!    entities that are not ready yet are left out without error.
//!
//! # Example
//!
//! ```rust
//! use ormdb_schema::{Compiler, EntityDef, FieldDef, LinkTables, Registry, SchemaKey};
//!
//! let mut registry = Registry::new();
//! registry
//!     .register(EntityDef::new("user", "app::User").with_field("id", FieldDef::primary("id")))
//!     .unwrap();
//!
//! let mut compiler = Compiler::new();
//! compiler.add_generator(LinkTables::new().with_table("user", "users"));
//!
//! let schema = compiler.compile(&mut registry).unwrap();
//! assert_eq!(schema.get("user").unwrap().primary_key(), Some("id"));
//! assert_eq!(schema.define("user", SchemaKey::Table).unwrap(), "users");
//! ```

pub mod annotated;
pub mod compiler;
pub mod config;
pub mod definition;
pub mod error;
pub mod generator;
pub mod packed;
pub mod registry;

pub use annotated::{Embeddings, MemoryReader, MetadataReader};
pub use compiler::Compiler;
pub use config::{CompilerConfig, CompilerDefaults};
pub use definition::{
    EntityDef, FieldDef, LoadStrategy, Relation, RelationDef, RelationKind, Typecast,
};
pub use error::{MetadataError, Result, SchemaError};
pub use generator::{Generator, LinkTables, Pipeline};
pub use packed::{PackedEntry, PackedSchema, SchemaKey};
pub use registry::{RegistrationPolicy, Registry, TableBinding};
