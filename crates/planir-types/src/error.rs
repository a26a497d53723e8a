//! Type-system error taxonomy

use thiserror::Error;

/// Errors produced while parsing or resolving type expressions.
///
/// Every resolution function returns one of these rather than panicking;
/// callers inspect the variant to decide whether the input can be corrected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    /// Malformed type expression: bad syntax, or a parameter list whose
    /// count or kind does not match the type's schema.
    #[error("malformed type expression `{expression}`: {reason}")]
    Grammar { expression: String, reason: String },

    /// The base name does not resolve to any built-in or user-defined type.
    #[error("type `{name}` not found")]
    NotFound { name: String },

    /// A parameter value violates the bound declared by its schema.
    #[error("parameter `{parameter}` of `{type_name}` must be in 1..={max}, got {value}")]
    Constraint {
        type_name: String,
        parameter: String,
        value: i64,
        max: i64,
    },

    /// A structure definition references itself, directly or transitively.
    #[error("recursive structure definition involving `{name}`")]
    Cycle { name: String },
}

impl TypeError {
    /// Shorthand for a grammar error on `expression`.
    pub fn grammar(expression: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Grammar {
            expression: expression.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for an unknown-name error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }
}
