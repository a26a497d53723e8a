//! (name, arity) lookup over loaded function declarations

use crate::{ArgumentDeclaration, ExtensionCollection, FunctionDeclaration};
use indexmap::IndexMap;

/// One concrete implementation of a named function, flattened from its
/// declaration with the source URI attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSignature {
    name: String,
    uri: String,
    args: Vec<FunctionArgument>,
    return_type: Option<String>,
    description: String,
}

impl FunctionSignature {
    /// Declared (unqualified) function name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// URI of the document that declared this implementation.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Ordered argument list.
    pub fn args(&self) -> &[FunctionArgument] {
        &self.args
    }

    /// Number of declared arguments.
    pub fn arity(&self) -> usize {
        self.args.len()
    }

    /// Return-type expression, if declared. May reference an argument's
    /// bound parameter (e.g. `varbinary<L>`).
    pub fn return_type(&self) -> Option<&str> {
        self.return_type.as_deref()
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// One declared argument of a [`FunctionSignature`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionArgument {
    pub name: Option<String>,
    /// Argument type expression; may contain unbound type parameters.
    pub value_type: String,
    pub description: Option<String>,
}

impl From<&ArgumentDeclaration> for FunctionArgument {
    fn from(declaration: &ArgumentDeclaration) -> Self {
        Self {
            name: declaration.name.clone(),
            value_type: declaration.value_type.clone(),
            description: declaration.description.clone(),
        }
    }
}

/// Resolved, read-only view over one [`ExtensionCollection`] exposing
/// function lookup by (name, arity).
///
/// Lookup never disambiguates by argument type: every implementation with
/// a matching name and arity is returned, and callers receiving more than
/// one result choose externally. An empty result signals "no such
/// overload" and is not an error.
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    scalar: IndexMap<String, Vec<FunctionSignature>>,
    aggregate: IndexMap<String, Vec<FunctionSignature>>,
}

impl FunctionRegistry {
    pub fn new(collection: &ExtensionCollection) -> Self {
        let mut scalar: IndexMap<String, Vec<FunctionSignature>> = IndexMap::new();
        let mut aggregate: IndexMap<String, Vec<FunctionSignature>> = IndexMap::new();
        for (uri, document) in collection.iter() {
            gather(uri, &document.scalar_functions, &mut scalar);
            gather(uri, &document.aggregate_functions, &mut aggregate);
        }
        Self { scalar, aggregate }
    }

    /// Every scalar implementation matching `name` with exactly `arity`
    /// arguments.
    pub fn scalar_functions(&self, name: &str, arity: usize) -> Vec<&FunctionSignature> {
        filter_arity(self.scalar.get(name), arity)
    }

    /// Every aggregate implementation matching `name` with exactly
    /// `arity` arguments.
    pub fn aggregate_functions(&self, name: &str, arity: usize) -> Vec<&FunctionSignature> {
        filter_arity(self.aggregate.get(name), arity)
    }

    /// Every scalar implementation declared under `name`, any arity.
    pub fn scalar_functions_by_name(&self, name: &str) -> &[FunctionSignature] {
        self.scalar.get(name).map_or(&[], Vec::as_slice)
    }

    /// Every aggregate implementation declared under `name`, any arity.
    pub fn aggregate_functions_by_name(&self, name: &str) -> &[FunctionSignature] {
        self.aggregate.get(name).map_or(&[], Vec::as_slice)
    }
}

fn gather(
    uri: &str,
    declarations: &[FunctionDeclaration],
    into: &mut IndexMap<String, Vec<FunctionSignature>>,
) {
    for declaration in declarations {
        let entry = into.entry(declaration.name.clone()).or_default();
        for implementation in &declaration.impls {
            entry.push(FunctionSignature {
                name: declaration.name.clone(),
                uri: uri.to_owned(),
                args: implementation.args.iter().map(FunctionArgument::from).collect(),
                return_type: implementation.return_type.clone(),
                description: implementation.description.clone(),
            });
        }
    }
}

fn filter_arity(signatures: Option<&Vec<FunctionSignature>>, arity: usize) -> Vec<&FunctionSignature> {
    signatures
        .map(|all| all.iter().filter(|sig| sig.arity() == arity).collect())
        .unwrap_or_default()
}
