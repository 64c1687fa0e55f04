//! Typecast directives applied when hydrating column values.

use serde_json::Value;

/// Conversion applied to a field value by the ORM runtime.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Typecast {
    /// A named runtime type (`int`, `float`, `bool`, `datetime`...).
    Named(String),
    /// A callable reference invoked with the raw value.
    Callable {
        /// Class (or module) owning the callable.
        class: String,
        /// Method name.
        method: String,
    },
}

impl Typecast {
    /// Create a named typecast.
    pub fn named(name: impl Into<String>) -> Self {
        Typecast::Named(name.into())
    }

    /// Create a callable typecast.
    pub fn callable(class: impl Into<String>, method: impl Into<String>) -> Self {
        Typecast::Callable {
            class: class.into(),
            method: method.into(),
        }
    }

    /// Packed form: a string for named casts, `[class, method]` for callables.
    pub fn pack(&self) -> Value {
        match self {
            Typecast::Named(name) => Value::String(name.clone()),
            Typecast::Callable { class, method } => Value::Array(vec![
                Value::String(class.clone()),
                Value::String(method.clone()),
            ]),
        }
    }
}
