//! In-memory definitions of mapped entities.
//!
//! Definitions are produced by a metadata reader and progressively completed
//! by generators before the compiler packs them.

mod entity;
mod field;
mod relation;
mod typecast;

pub use entity::EntityDef;
pub use field::FieldDef;
pub use relation::{LoadStrategy, Relation, RelationDef, RelationKind};
pub use typecast::Typecast;
