//! Registry transformation steps.
//!
//! A generator takes the registry, completes or rewrites part of it, and
//! hands it to the next generator. Generators do not know about each other:
//! ordering is the responsibility of whoever assembles the [`Pipeline`].

mod pipeline;
mod tables;

pub use pipeline::Pipeline;
pub use tables::LinkTables;

use crate::error::Result;
use crate::registry::Registry;

/// A single step of the compilation pipeline.
pub trait Generator: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Transform the registry in place.
    fn run(&self, registry: &mut Registry) -> Result<()>;
}

impl<F> Generator for F
where
    F: Fn(&mut Registry) -> Result<()> + Send + Sync,
{
    fn run(&self, registry: &mut Registry) -> Result<()> {
        self(registry)
    }
}
