//! Ordered generator pipeline.

use super::Generator;
use crate::error::{Result, SchemaError};
use crate::registry::Registry;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// One pipeline slot.
enum Step {
    /// A generator instance.
    Generator(Arc<dyn Generator>),
    /// A generator referenced by name, resolved on every run.
    Named(String),
}

/// Generators applied to a registry, left to right.
///
/// Steps may be added by instance or by name. Named steps are looked up
/// among the provided generators each time the pipeline runs, so the
/// provided set may change between runs.
#[derive(Default)]
pub struct Pipeline {
    steps: Vec<Step>,
    provided: HashMap<String, Arc<dyn Generator>>,
}

impl Pipeline {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a generator.
    pub fn add_generator(&mut self, generator: impl Generator + 'static) {
        self.steps.push(Step::Generator(Arc::new(generator)));
    }

    /// Append a generator the caller keeps a handle to.
    pub fn add_shared(&mut self, generator: Arc<dyn Generator>) {
        self.steps.push(Step::Generator(generator));
    }

    /// Append a step referring to a provided generator by name.
    pub fn add_named(&mut self, name: impl Into<String>) {
        self.steps.push(Step::Named(name.into()));
    }

    /// Make a generator available to named steps.
    pub fn provide(&mut self, name: impl Into<String>, generator: impl Generator + 'static) {
        self.provided.insert(name.into(), Arc::new(generator));
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if the pipeline has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Resolve every step to a generator.
    ///
    /// Fails on the first named step that has no provided generator.
    pub fn resolve(&self) -> Result<Vec<Arc<dyn Generator>>> {
        self.steps
            .iter()
            .map(|step| match step {
                Step::Generator(generator) => Ok(Arc::clone(generator)),
                Step::Named(name) => self
                    .provided
                    .get(name)
                    .cloned()
                    .ok_or_else(|| SchemaError::InvalidGenerator { name: name.clone() }),
            })
            .collect()
    }

    /// Fold the registry through every step.
    ///
    /// All steps are resolved before the first one runs; the first failing
    /// generator aborts the run.
    pub fn run(&self, registry: &mut Registry) -> Result<()> {
        let generators = self.resolve()?;

        for (index, generator) in generators.iter().enumerate() {
            debug!(step = index, generator = generator.name(), "running generator");
            generator.run(registry)?;
        }

        Ok(())
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let steps: Vec<&str> = self
            .steps
            .iter()
            .map(|step| match step {
                Step::Generator(generator) => generator.name(),
                Step::Named(name) => name.as_str(),
            })
            .collect();

        f.debug_struct("Pipeline")
            .field("steps", &steps)
            .field("provided", &self.provided.keys().collect::<Vec<_>>())
            .finish()
    }
}
