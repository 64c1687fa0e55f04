//! Compiler configuration.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Default source class.
pub const DEFAULT_SOURCE: &str = "ormdb::select::Source";

/// Default mapper class.
pub const DEFAULT_MAPPER: &str = "ormdb::mapper::Mapper";

/// Default repository class.
pub const DEFAULT_REPOSITORY: &str = "ormdb::select::Repository";

/// Identifiers used for entities that do not override them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerDefaults {
    /// Default source.
    pub source: Option<String>,
    /// Default mapper.
    pub mapper: Option<String>,
    /// Default repository.
    pub repository: Option<String>,
    /// Default constrain. None unless configured.
    pub constrain: Option<String>,
}

impl Default for CompilerDefaults {
    fn default() -> Self {
        Self {
            source: Some(DEFAULT_SOURCE.to_string()),
            mapper: Some(DEFAULT_MAPPER.to_string()),
            repository: Some(DEFAULT_REPOSITORY.to_string()),
            constrain: None,
        }
    }
}

impl CompilerDefaults {
    /// Set the default source.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Set the default mapper.
    pub fn with_mapper(mut self, mapper: impl Into<String>) -> Self {
        self.mapper = Some(mapper.into());
        self
    }

    /// Set the default repository.
    pub fn with_repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = Some(repository.into());
        self
    }

    /// Set the default constrain.
    pub fn with_constrain(mut self, constrain: impl Into<String>) -> Self {
        self.constrain = Some(constrain.into());
        self
    }
}

/// Compiler configuration: defaults plus a pipeline described by generator names.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Override defaults.
    pub defaults: CompilerDefaults,
    /// Names of the generators to run, in order.
    pub generators: Vec<String>,
}

impl CompilerConfig {
    /// Create a configuration with stock defaults and no generators.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON configuration document.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Set the defaults.
    pub fn with_defaults(mut self, defaults: CompilerDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Append a named generator.
    pub fn with_generator(mut self, name: impl Into<String>) -> Self {
        self.generators.push(name.into());
        self
    }
}
