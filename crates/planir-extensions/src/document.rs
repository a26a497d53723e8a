//! Decoded extension document model
//!
//! Documents are ingested from YAML by an external decoding layer
//! (serde_yaml); the registries only ever see this decoded tree. Field
//! order is preserved wherever declaration order is significant.

use indexmap::IndexMap;
use serde::Deserialize;

/// One decoded extension document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtensionDocument {
    /// User-defined type declarations.
    #[serde(default)]
    pub types: Vec<TypeDeclaration>,
    /// Scalar function declaration groups.
    #[serde(default)]
    pub scalar_functions: Vec<FunctionDeclaration>,
    /// Aggregate function declaration groups.
    #[serde(default)]
    pub aggregate_functions: Vec<FunctionDeclaration>,
}

/// A user-defined type: a structure, a parametrized kind, or an opaque
/// name (neither field present).
#[derive(Debug, Clone, Deserialize)]
pub struct TypeDeclaration {
    pub name: String,
    /// Ordered field name -> type expression map of a structure type.
    #[serde(default)]
    pub structure: IndexMap<String, String>,
    /// Parameter schema of a parametrized type.
    #[serde(default)]
    pub parameters: Vec<ParameterDeclaration>,
}

/// One entry of a parametrized type's parameter schema.
#[derive(Debug, Clone, Deserialize)]
pub struct ParameterDeclaration {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ParameterKind,
    /// Inclusive upper bound for integer parameters.
    #[serde(default)]
    pub max: Option<i64>,
}

/// Declared kind of a type parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterKind {
    /// An integer literal value.
    Integer,
    /// A nested type expression.
    Type,
}

/// A named function with one or more concrete implementations.
#[derive(Debug, Clone, Deserialize)]
pub struct FunctionDeclaration {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub impls: Vec<FunctionImpl>,
}

/// One concrete implementation of a function.
#[derive(Debug, Clone, Deserialize)]
pub struct FunctionImpl {
    #[serde(default)]
    pub args: Vec<ArgumentDeclaration>,
    /// Return type expression; may reference an argument's bound
    /// parameter (e.g. `varbinary<L>`).
    #[serde(default)]
    pub return_type: Option<String>,
    #[serde(default)]
    pub description: String,
}

/// A declared function argument.
#[derive(Debug, Clone, Deserialize)]
pub struct ArgumentDeclaration {
    #[serde(default)]
    pub name: Option<String>,
    /// Argument type expression; may contain unbound type parameters.
    #[serde(rename = "type")]
    pub value_type: String,
    #[serde(default)]
    pub description: Option<String>,
}
