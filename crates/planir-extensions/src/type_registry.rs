//! Name resolution over built-ins plus loaded type declarations

use crate::{ExtensionCollection, ParameterKind};
use indexmap::IndexMap;
use planir_types::{
    Nullability, Type, TypeClass, TypeError, TypeExpr, TypeExprParam, TypeKind, TypeParameter,
    integer_parameters, parse_type_expression,
};
use std::sync::Arc;

/// Registry-internal view of one user-defined type.
#[derive(Debug, Clone)]
enum TypeDefinition {
    /// Ordered (field name, type expression) pairs.
    Structure(Vec<(String, String)>),
    /// Ordered parameter schema.
    Parametrized(Vec<ParameterSchema>),
    /// A bare name with no structure and no parameters.
    Opaque,
}

#[derive(Debug, Clone)]
struct ParameterSchema {
    name: String,
    kind: ParameterKind,
    max: Option<i64>,
}

/// Resolved, read-only view combining the built-in name table with every
/// type declaration of one [`ExtensionCollection`].
///
/// Safe for unsynchronized concurrent lookups; nothing mutates after
/// construction. Extending the name set means building a new registry
/// from a larger collection.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    collection: Arc<ExtensionCollection>,
    definitions: IndexMap<String, TypeDefinition>,
}

impl TypeRegistry {
    /// Builds a registry over `collection`.
    ///
    /// Shadowing and duplicate declarations were already rejected when
    /// the collection was loaded, so construction cannot fail.
    pub fn new(collection: impl Into<Arc<ExtensionCollection>>) -> Self {
        let collection = collection.into();
        let mut definitions = IndexMap::new();
        for (_, document) in collection.iter() {
            for declaration in &document.types {
                let definition = if !declaration.structure.is_empty() {
                    TypeDefinition::Structure(
                        declaration
                            .structure
                            .iter()
                            .map(|(field, reference)| (field.clone(), reference.clone()))
                            .collect(),
                    )
                } else if !declaration.parameters.is_empty() {
                    TypeDefinition::Parametrized(
                        declaration
                            .parameters
                            .iter()
                            .map(|parameter| ParameterSchema {
                                name: parameter.name.clone(),
                                kind: parameter.kind,
                                max: parameter.max,
                            })
                            .collect(),
                    )
                } else {
                    TypeDefinition::Opaque
                };
                definitions.insert(declaration.name.clone(), definition);
            }
        }
        Self {
            collection,
            definitions,
        }
    }

    /// The collection this registry was built from.
    pub fn collection(&self) -> &Arc<ExtensionCollection> {
        &self.collection
    }

    /// Resolves a textual type expression to a canonical [`Type`].
    ///
    /// Fails if the base name is unknown, the parameter list does not
    /// match the name's schema, a parameter violates its bound, or a
    /// referenced structure is undefined or cyclic.
    pub fn resolve(&self, expression: &str) -> planir_types::Result<Type> {
        let expr = parse_type_expression(expression)?;
        let mut stack = Vec::new();
        self.resolve_expr(expression, &expr, &mut stack)
    }

    /// Resolves a canonical type name or short alias to its built-in class.
    pub fn resolve_class(&self, name: &str) -> planir_types::Result<TypeClass> {
        TypeClass::from_name(name).ok_or_else(|| TypeError::not_found(name))
    }

    /// Whether `name` resolves to a built-in or user-defined type.
    pub fn contains_name(&self, name: &str) -> bool {
        TypeClass::from_name(name).is_some() || self.definitions.contains_key(name)
    }

    fn resolve_expr(
        &self,
        expression: &str,
        expr: &TypeExpr,
        stack: &mut Vec<String>,
    ) -> planir_types::Result<Type> {
        let nullability = if expr.nullable {
            Nullability::Nullable
        } else {
            Nullability::Required
        };

        if let Some(class) = TypeClass::from_name(&expr.name) {
            let parameters = integer_parameters(expression, &expr.parameters)?;
            let kind = class.make_kind(expression, &parameters)?;
            return Ok(Type::new(kind, nullability));
        }

        let Some(definition) = self.definitions.get(&expr.name) else {
            return Err(TypeError::not_found(&expr.name));
        };

        match definition {
            TypeDefinition::Structure(fields) => {
                if !expr.parameters.is_empty() {
                    return Err(TypeError::grammar(
                        expression,
                        format!("structure type `{}` takes no parameters", expr.name),
                    ));
                }
                if stack.iter().any(|entered| entered == &expr.name) {
                    return Err(TypeError::Cycle {
                        name: expr.name.clone(),
                    });
                }
                stack.push(expr.name.clone());
                let mut resolved = Vec::with_capacity(fields.len());
                for (_, reference) in fields {
                    let field_expr = parse_type_expression(reference)?;
                    resolved.push(self.resolve_expr(reference, &field_expr, stack)?);
                }
                stack.pop();
                Ok(Type::new(TypeKind::Struct(resolved), nullability))
            }
            TypeDefinition::Parametrized(schema) => {
                if expr.parameters.len() != schema.len() {
                    return Err(TypeError::grammar(
                        expression,
                        format!(
                            "`{}` takes {} parameter(s), got {}",
                            expr.name,
                            schema.len(),
                            expr.parameters.len()
                        ),
                    ));
                }
                let mut parameters = Vec::with_capacity(schema.len());
                for (given, declared) in expr.parameters.iter().zip(schema) {
                    parameters.push(self.resolve_parameter(
                        expression,
                        &expr.name,
                        given,
                        declared,
                        stack,
                    )?);
                }
                Ok(Type::new(
                    TypeKind::UserDefined {
                        name: expr.name.clone(),
                        parameters,
                    },
                    nullability,
                ))
            }
            TypeDefinition::Opaque => {
                if !expr.parameters.is_empty() {
                    return Err(TypeError::grammar(
                        expression,
                        format!("type `{}` takes no parameters", expr.name),
                    ));
                }
                Ok(Type::new(
                    TypeKind::UserDefined {
                        name: expr.name.clone(),
                        parameters: Vec::new(),
                    },
                    nullability,
                ))
            }
        }
    }

    fn resolve_parameter(
        &self,
        expression: &str,
        type_name: &str,
        given: &TypeExprParam,
        declared: &ParameterSchema,
        stack: &mut Vec<String>,
    ) -> planir_types::Result<TypeParameter> {
        match (declared.kind, given) {
            (ParameterKind::Integer, TypeExprParam::Integer(value)) => {
                let value = i64::try_from(*value).map_err(|_| {
                    TypeError::grammar(
                        expression,
                        format!("parameter `{}` is out of range", declared.name),
                    )
                })?;
                if let Some(max) = declared.max {
                    // Bounds are inclusive: 0 < value <= max, never clamped.
                    if value < 1 || value > max {
                        return Err(TypeError::Constraint {
                            type_name: type_name.to_owned(),
                            parameter: declared.name.clone(),
                            value,
                            max,
                        });
                    }
                }
                Ok(TypeParameter::Integer(value))
            }
            (ParameterKind::Type, TypeExprParam::Expr(nested)) => Ok(TypeParameter::Type(
                self.resolve_expr(expression, nested, stack)?,
            )),
            (ParameterKind::Integer, TypeExprParam::Expr(_)) => Err(TypeError::grammar(
                expression,
                format!(
                    "parameter `{}` of `{type_name}` must be an integer literal",
                    declared.name
                ),
            )),
            (ParameterKind::Type, TypeExprParam::Integer(_)) => Err(TypeError::grammar(
                expression,
                format!(
                    "parameter `{}` of `{type_name}` must be a type expression",
                    declared.name
                ),
            )),
        }
    }
}
