//! Dialect localization engine
//!
//! [`Dialect::localize`] validates every declared type, function and
//! kernel against a [`TypeRegistry`] and its backing extension collection,
//! and freezes the result into a [`LocalTypeRegistry`].

use crate::{Dialect, DialectError, FunctionLocalization, Result};
use indexmap::IndexMap;
use planir_extensions::{FunctionRegistry, FunctionSignature, TypeRegistry};
use planir_types::{
    Nullability, Type, TypeClass, TypeError, integer_parameters, parse_type_expression,
};

/// One canonical type class localized to an engine name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalType {
    pub class: TypeClass,
    /// Local base name; parametrized classes format as `NAME(p1,p2)`.
    pub local_name: String,
    pub supported_as_column: bool,
}

/// One validated function localization.
#[derive(Debug, Clone)]
pub struct LocalFunctionEntry {
    /// Canonical qualified name, `<dependency>.<function>`.
    pub name: String,
    pub local_name: String,
    pub infix: bool,
    /// Required engine options, recorded verbatim and uninterpreted.
    pub required_options: IndexMap<String, String>,
    /// Signatures confirmed to exist in the dependency's document, one
    /// per matched kernel (all signatures when no kernels are declared).
    pub signatures: Vec<FunctionSignature>,
}

/// Derived, read-only localization of a canonical type registry.
///
/// Built once by [`Dialect::localize`]; never mutated afterwards, so it
/// is safe for unsynchronized concurrent reads.
#[derive(Debug, Clone)]
pub struct LocalTypeRegistry {
    types: IndexMap<TypeClass, LocalType>,
    by_local: IndexMap<String, TypeClass>,
    scalar_functions: Vec<LocalFunctionEntry>,
    aggregate_functions: Vec<LocalFunctionEntry>,
}

impl Dialect {
    /// Localizes this dialect against `registry`.
    ///
    /// Validates, in order: every dependency URI is present in the
    /// registry's collection; every supported type resolves to a built-in
    /// class with an unambiguous bidirectional name mapping; every
    /// function entry resolves through the merged function registry, with
    /// every declared kernel matched to a signature.
    pub fn localize(&self, registry: &TypeRegistry) -> Result<LocalTypeRegistry> {
        for (name, uri) in &self.dependencies {
            // Already-loaded URIs are idempotent; only absence is an error.
            if !registry.collection().contains(uri) {
                return Err(DialectError::MissingDependency {
                    name: name.clone(),
                    uri: uri.clone(),
                });
            }
        }

        let mut types = IndexMap::new();
        let mut by_local = IndexMap::new();
        for (name, localization) in self.supported_types.iter() {
            let class = registry
                .resolve_class(name)
                .map_err(|_| DialectError::UnknownType {
                    name: name.to_owned(),
                })?;
            let entry = LocalType {
                class,
                local_name: localization.sql_type_name.clone(),
                supported_as_column: localization.supported_as_column,
            };
            if let Some(existing) = types.get(&class) {
                if existing != &entry {
                    return Err(DialectError::ConflictingType {
                        name: name.to_owned(),
                    });
                }
                continue;
            }
            if let Some(other) = by_local.get(&entry.local_name) {
                if *other != class {
                    return Err(DialectError::AmbiguousLocalName {
                        local: entry.local_name.clone(),
                    });
                }
            }
            by_local.insert(entry.local_name.clone(), class);
            types.insert(class, entry);
        }

        let functions = FunctionRegistry::new(registry.collection());
        let scalar_functions = self
            .scalar_functions
            .iter()
            .map(|entry| self.localize_function(entry, |name| functions.scalar_functions_by_name(name)))
            .collect::<Result<Vec<_>>>()?;
        let aggregate_functions = self
            .aggregate_functions
            .iter()
            .map(|entry| {
                self.localize_function(entry, |name| functions.aggregate_functions_by_name(name))
            })
            .collect::<Result<Vec<_>>>()?;

        log::debug!(
            "localized dialect `{}`: {} type(s), {} scalar, {} aggregate function(s)",
            self.name,
            types.len(),
            scalar_functions.len(),
            aggregate_functions.len()
        );
        Ok(LocalTypeRegistry {
            types,
            by_local,
            scalar_functions,
            aggregate_functions,
        })
    }

    fn localize_function<'r>(
        &self,
        entry: &FunctionLocalization,
        by_name: impl Fn(&str) -> &'r [FunctionSignature],
    ) -> Result<LocalFunctionEntry> {
        let Some((dependency, function)) = entry.name.split_once('.') else {
            return Err(DialectError::UnqualifiedFunction {
                name: entry.name.clone(),
            });
        };
        let Some(uri) = self.dependencies.get(dependency) else {
            return Err(DialectError::UnknownDependency {
                name: entry.name.clone(),
                dependency: dependency.to_owned(),
            });
        };
        let candidates: Vec<&FunctionSignature> = by_name(function)
            .iter()
            .filter(|signature| signature.uri() == uri)
            .collect();
        if candidates.is_empty() {
            return Err(DialectError::UnknownFunction {
                name: entry.name.clone(),
            });
        }

        let signatures = if entry.supported_kernels.is_empty() {
            candidates.into_iter().cloned().collect()
        } else {
            let mut matched: Vec<FunctionSignature> = Vec::new();
            for kernel in &entry.supported_kernels {
                let signature = candidates
                    .iter()
                    .find(|signature| kernel_matches(signature, kernel))
                    .ok_or_else(|| DialectError::UnmatchedKernel {
                        name: entry.name.clone(),
                        kernel: kernel.clone(),
                    })?;
                if !matched.iter().any(|seen| seen == *signature) {
                    matched.push((*signature).clone());
                }
            }
            matched
        };

        Ok(LocalFunctionEntry {
            name: entry.name.clone(),
            local_name: entry
                .local_name
                .clone()
                .unwrap_or_else(|| function.to_owned()),
            infix: entry.infix,
            required_options: entry.required_options.clone(),
            signatures,
        })
    }
}

/// Whether a kernel identifier names this signature's argument-type
/// combination, using either canonical or short type names.
fn kernel_matches(signature: &FunctionSignature, kernel: &str) -> bool {
    let mut canonical = Vec::with_capacity(signature.args().len());
    let mut short = Vec::with_capacity(signature.args().len());
    for arg in signature.args() {
        let base = match parse_type_expression(&arg.value_type) {
            Ok(expr) => expr.name,
            Err(_) => arg.value_type.clone(),
        };
        match TypeClass::from_name(&base) {
            Some(class) => {
                canonical.push(class.name().to_owned());
                short.push(class.short_name().to_owned());
            }
            None => {
                canonical.push(base.clone());
                short.push(base);
            }
        }
    }
    kernel == canonical.join("_") || kernel == short.join("_")
}

impl LocalTypeRegistry {
    /// Resolves a type expression written with either local or canonical
    /// base names, restricted to this dialect's supported type classes.
    pub fn resolve_local(&self, expression: &str) -> planir_types::Result<Type> {
        let expr = parse_type_expression(expression)?;
        let class = self
            .by_local
            .get(&expr.name)
            .copied()
            .or_else(|| {
                TypeClass::from_name(&expr.name).filter(|class| self.types.contains_key(class))
            })
            .ok_or_else(|| TypeError::not_found(&expr.name))?;
        let parameters = integer_parameters(expression, &expr.parameters)?;
        let kind = class.make_kind(expression, &parameters)?;
        let nullability = if expr.nullable {
            Nullability::Nullable
        } else {
            Nullability::Required
        };
        Ok(Type::new(kind, nullability))
    }

    /// Maps a local name (pattern-formatted for parametrized classes)
    /// back to its canonical type, always with Required nullability -
    /// localization does not track nullability per name.
    pub fn canonical_type_from_local_name(&self, local_name: &str) -> planir_types::Result<Type> {
        let (base, parameters) = parse_local_pattern(local_name)?;
        let class = self
            .by_local
            .get(base)
            .copied()
            .ok_or_else(|| TypeError::not_found(local_name))?;
        let kind = class.make_kind(local_name, &parameters)?;
        Ok(Type::required(kind))
    }

    /// Formats the local name of a canonical type, applying the declared
    /// pattern for parametrized classes. Fails with NotFound when the
    /// type's class is not in this dialect's supported-types map.
    pub fn local_name_from_canonical_type(&self, ty: &Type) -> planir_types::Result<String> {
        let entry = ty
            .class()
            .and_then(|class| self.types.get(&class))
            .ok_or_else(|| TypeError::not_found(ty.to_string()))?;
        Ok(format_local_pattern(
            &entry.local_name,
            &ty.kind().integer_parameters(),
        ))
    }

    /// Whether the engine supports this type as a table column. False for
    /// any class absent from the supported-types map.
    pub fn is_supported_as_column(&self, ty: &Type) -> bool {
        ty.class()
            .and_then(|class| self.types.get(&class))
            .is_some_and(|entry| entry.supported_as_column)
    }

    /// Localized types in declaration order.
    pub fn types(&self) -> impl Iterator<Item = &LocalType> {
        self.types.values()
    }

    /// Validated scalar function localizations in declaration order.
    pub fn scalar_functions(&self) -> &[LocalFunctionEntry] {
        &self.scalar_functions
    }

    /// Validated aggregate function localizations in declaration order.
    pub fn aggregate_functions(&self) -> &[LocalFunctionEntry] {
        &self.aggregate_functions
    }

    /// The scalar entry for a canonical qualified name, if localized.
    pub fn scalar_function(&self, name: &str) -> Option<&LocalFunctionEntry> {
        self.scalar_functions.iter().find(|entry| entry.name == name)
    }
}

/// Formats a local name from a pattern base and integer parameters.
/// Exact inverse of [`parse_local_pattern`] for every representable
/// parametrization.
fn format_local_pattern(base: &str, parameters: &[u64]) -> String {
    if parameters.is_empty() {
        return base.to_owned();
    }
    let rendered: Vec<String> = parameters.iter().map(u64::to_string).collect();
    format!("{base}({})", rendered.join(","))
}

/// Splits a pattern-formatted local name into its base and integer
/// parameters. Exact inverse of [`format_local_pattern`].
fn parse_local_pattern(text: &str) -> planir_types::Result<(&str, Vec<u64>)> {
    let Some(open) = text.find('(') else {
        return Ok((text, Vec::new()));
    };
    let Some(inner) = text[open + 1..].strip_suffix(')') else {
        return Err(TypeError::grammar(text, "unterminated parameter list"));
    };
    let base = &text[..open];
    let parameters = inner
        .split(',')
        .map(|part| {
            part.trim_matches(' ').parse::<u64>().map_err(|_| {
                TypeError::grammar(text, format!("`{part}` is not an integer parameter"))
            })
        })
        .collect::<planir_types::Result<Vec<u64>>>()?;
    Ok((base, parameters))
}
