//! Dialect loading and localization errors

use planir_types::TypeError;
use thiserror::Error;

/// Errors raised while loading a dialect document or localizing it
/// against a type registry.
///
/// Localization is all-or-nothing: a single unresolvable entry fails the
/// whole operation and no partially-built registry is observable.
#[derive(Debug, Error)]
pub enum DialectError {
    /// The dialect document could not be decoded from YAML.
    #[error("failed to decode dialect document: {0}")]
    Document(#[from] serde_yaml::Error),

    /// A declared dependency URI is not present in the extension
    /// collection backing the registry.
    #[error("dialect dependency `{name}` (`{uri}`) is not loaded")]
    MissingDependency { name: String, uri: String },

    /// A `supported_types` key does not name a built-in type class.
    #[error("supported type `{name}` does not resolve to a built-in type class")]
    UnknownType { name: String },

    /// The same canonical type is declared twice with conflicting
    /// localizations.
    #[error("type `{name}` is declared twice with conflicting localizations")]
    ConflictingType { name: String },

    /// Two canonical types share one local name, which would make the
    /// local-to-canonical mapping ambiguous.
    #[error("local name `{local}` is declared for more than one type")]
    AmbiguousLocalName { local: String },

    /// A function entry is not qualified by a dependency short name.
    #[error("function `{name}` is not qualified by a dependency prefix")]
    UnqualifiedFunction { name: String },

    /// A function entry's prefix names no declared dependency.
    #[error("function `{name}` references undeclared dependency `{dependency}`")]
    UnknownDependency { name: String, dependency: String },

    /// No signature for the function exists in the dependency's document.
    #[error("function `{name}` has no signature in the referenced document")]
    UnknownFunction { name: String },

    /// A declared kernel matches no argument-type combination of the
    /// function's signatures.
    #[error("kernel `{kernel}` of function `{name}` matches no declared signature")]
    UnmatchedKernel { name: String, kernel: String },

    /// A type-expression error surfaced during localization.
    #[error(transparent)]
    Type(#[from] TypeError),
}
