//! Definitions discovered from annotated classes.
//!
//! Reading annotations is left to a [`MetadataReader`] implementation; this
//! module turns what a reader reports into registry entries.

mod embeddings;
mod reader;

pub use embeddings::Embeddings;
pub use reader::{
    Annotation, ClassMetadata, Column, Embeddable, MemoryReader, MetadataReader, Property,
};
