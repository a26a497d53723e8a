//! Type-expression grammar
//!
//! `NAME ['?'] ['<' PARAM (',' PARAM)* '>']` where `NAME` is an identifier,
//! `'?'` follows the base name (before any parameter list) and selects
//! nullable, and each `PARAM` is an unsigned integer literal or a nested
//! type expression. Spaces are permitted around parameters inside the
//! angle brackets and nowhere else.
//!
//! Parsing is purely syntactic; names are resolved by the registries.

use crate::TypeError;
use winnow::ascii::digit1;
use winnow::combinator::{alt, delimited, opt, separated};
use winnow::prelude::*;
use winnow::token::take_while;

/// Syntactic form of a type expression, before name resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeExpr {
    /// Base name as written (alias resolution happens in the registry).
    pub name: String,
    /// Whether the `?` nullability marker was present.
    pub nullable: bool,
    /// Parameter list, empty when no `<...>` was written.
    pub parameters: Vec<TypeExprParam>,
}

/// A single parameter of a [`TypeExpr`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExprParam {
    /// An unsigned decimal integer literal.
    Integer(u64),
    /// A nested type expression.
    Expr(TypeExpr),
}

fn base_name<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    (
        take_while(1, |c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
    )
        .take()
        .parse_next(input)
}

fn integer(input: &mut &str) -> ModalResult<u64> {
    digit1.parse_to().parse_next(input)
}

fn spaces(input: &mut &str) -> ModalResult<()> {
    take_while(0.., ' ').void().parse_next(input)
}

fn parameter(input: &mut &str) -> ModalResult<TypeExprParam> {
    delimited(
        spaces,
        alt((
            integer.map(TypeExprParam::Integer),
            type_expr.map(TypeExprParam::Expr),
        )),
        spaces,
    )
    .parse_next(input)
}

fn type_expr(input: &mut &str) -> ModalResult<TypeExpr> {
    (
        base_name,
        opt('?'),
        opt(delimited('<', separated(1.., parameter, ','), '>')),
    )
        .map(
            |(name, nullable, parameters): (&str, Option<char>, Option<Vec<TypeExprParam>>)| {
                TypeExpr {
                    name: name.to_owned(),
                    nullable: nullable.is_some(),
                    parameters: parameters.unwrap_or_default(),
                }
            },
        )
        .parse_next(input)
}

/// Parses a complete type expression, consuming all input.
pub fn parse_type_expression(expression: &str) -> crate::Result<TypeExpr> {
    type_expr
        .parse(expression)
        .map_err(|err| TypeError::grammar(expression, err.to_string()))
}

/// Requires every parameter to be an integer literal, as built-in
/// parametrized classes do. `expression` is the original text, used for
/// error context.
pub fn integer_parameters(expression: &str, parameters: &[TypeExprParam]) -> crate::Result<Vec<u64>> {
    parameters
        .iter()
        .map(|parameter| match parameter {
            TypeExprParam::Integer(value) => Ok(*value),
            TypeExprParam::Expr(nested) => Err(TypeError::grammar(
                expression,
                format!("parameter `{}` must be an integer literal", nested.name),
            )),
        })
        .collect()
}
