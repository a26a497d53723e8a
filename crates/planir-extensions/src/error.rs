//! Extension loading errors

use planir_types::TypeError;
use thiserror::Error;

/// Errors raised while loading extension documents or building registries.
#[derive(Debug, Error)]
pub enum ExtensionError {
    /// The document could not be decoded from YAML.
    #[error("failed to decode extension document `{uri}`")]
    Document {
        uri: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// A document is already loaded under this URI.
    #[error("extension document `{0}` is already loaded")]
    DuplicateUri(String),

    /// A declared type redefines a built-in name.
    #[error("type `{name}` in `{uri}` shadows a built-in type")]
    ShadowsBuiltin { uri: String, name: String },

    /// A declared type name is already defined by another loaded document.
    #[error("type `{name}` in `{uri}` is already defined")]
    DuplicateType { uri: String, name: String },

    /// A type declares both a structure and a parameter schema.
    #[error("type `{name}` in `{uri}` declares both structure and parameters")]
    AmbiguousDeclaration { uri: String, name: String },

    /// A type-expression error surfaced during registry resolution.
    #[error(transparent)]
    Type(#[from] TypeError),
}
