//! Registry resolution tests
//!
//! Covers the built-in name table, short aliases, nullability, parametrized
//! built-ins, user-defined structure and parametrized types, cycle
//! detection, and function lookup by (name, arity).

use planir_extensions::{ExtensionCollection, FunctionRegistry, TypeRegistry};
use planir_types::{Nullability, Type, TypeError, TypeKind, TypeParameter};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn empty_registry() -> TypeRegistry {
    TypeRegistry::new(ExtensionCollection::new())
}

fn required(kind: TypeKind) -> Type {
    Type::required(kind)
}

fn nullable(kind: TypeKind) -> Type {
    Type::nullable(kind)
}

#[rstest]
#[case("i8", required(TypeKind::I8))]
#[case("i16", required(TypeKind::I16))]
#[case("i32", required(TypeKind::I32))]
#[case("i64", required(TypeKind::I64))]
#[case("fp32", required(TypeKind::Fp32))]
#[case("fp64", required(TypeKind::Fp64))]
#[case("string", required(TypeKind::String))]
#[case("timestamp", required(TypeKind::Timestamp))]
#[case("date", required(TypeKind::Date))]
#[case("time", required(TypeKind::Time))]
#[case("timestamp_tz", required(TypeKind::TimestampTz))]
#[case("interval_year", required(TypeKind::IntervalYear))]
#[case("interval_day", required(TypeKind::IntervalDay))]
#[case("uuid", required(TypeKind::Uuid))]
#[case("binary", required(TypeKind::Binary))]
#[case("boolean", required(TypeKind::Boolean))]
// short names
#[case("bool", required(TypeKind::Boolean))]
#[case("vbin", required(TypeKind::Binary))]
#[case("str", required(TypeKind::String))]
#[case("ts", required(TypeKind::Timestamp))]
#[case("tstz", required(TypeKind::TimestampTz))]
#[case("iyear", required(TypeKind::IntervalYear))]
#[case("iday", required(TypeKind::IntervalDay))]
// nullable forms
#[case("i8?", nullable(TypeKind::I8))]
#[case("timestamp_tz?", nullable(TypeKind::TimestampTz))]
#[case("bool?", nullable(TypeKind::Boolean))]
#[case("vbin?", nullable(TypeKind::Binary))]
#[case("str?", nullable(TypeKind::String))]
#[case("ts?", nullable(TypeKind::Timestamp))]
#[case("tstz?", nullable(TypeKind::TimestampTz))]
#[case("iyear?", nullable(TypeKind::IntervalYear))]
#[case("iday?", nullable(TypeKind::IntervalDay))]
// parametrized built-ins
#[case("decimal<10,2>", required(TypeKind::Decimal { precision: 10, scale: 2 }))]
#[case("decimal?<10,2>", nullable(TypeKind::Decimal { precision: 10, scale: 2 }))]
#[case("decimal?<38,0>", nullable(TypeKind::Decimal { precision: 38, scale: 0 }))]
#[case("varchar<10>", required(TypeKind::VarChar { length: 10 }))]
#[case("varchar?<10>", nullable(TypeKind::VarChar { length: 10 }))]
#[case("fixedchar<10>", required(TypeKind::FixedChar { length: 10 }))]
#[case("fixedchar?<10>", nullable(TypeKind::FixedChar { length: 10 }))]
#[case("fixedbinary<10>", required(TypeKind::FixedBinary { length: 10 }))]
#[case("fixedbinary?<10>", nullable(TypeKind::FixedBinary { length: 10 }))]
fn resolves_builtin(#[case] expression: &str, #[case] expected: Type) {
    let registry = empty_registry();
    assert_eq!(registry.resolve(expression).unwrap(), expected);
}

#[test]
fn required_and_nullable_differ_only_in_nullability() {
    let registry = empty_registry();
    let required = registry.resolve("i32").unwrap();
    let nullable = registry.resolve("i32?").unwrap();
    assert_ne!(required, nullable);
    assert_eq!(required.kind(), nullable.kind());
    assert_eq!(required.with_nullability(Nullability::Nullable), nullable);
}

#[test]
fn resolution_is_deterministic_across_registries() {
    let first = empty_registry();
    let second = empty_registry();
    for expression in ["i32", "decimal<10,2>", "varchar?<10>", "tstz"] {
        assert_eq!(
            first.resolve(expression).unwrap(),
            second.resolve(expression).unwrap()
        );
    }
}

#[rstest]
#[case("decimal<10,2>")]
#[case("decimal?<38,0>")]
#[case("varchar<10>")]
#[case("fixedchar?<10>")]
#[case("fixedbinary<10>")]
fn formatting_round_trips(#[case] expression: &str) {
    let registry = empty_registry();
    let resolved = registry.resolve(expression).unwrap();
    assert_eq!(registry.resolve(&resolved.to_string()).unwrap(), resolved);
}

#[rstest]
#[case("badType")]
#[case("nonexistent?")]
fn unknown_names_are_not_found(#[case] expression: &str) {
    let registry = empty_registry();
    assert!(matches!(
        registry.resolve(expression),
        Err(TypeError::NotFound { .. })
    ));
}

const EXTENSION_TYPES: &str = r#"---
types:
  - name: point
    structure:
      latitude: i32
      longitude: i32
  - name: line
    structure:
      start: point
      end: point
  - name: varbinary
    parameters:
      - name: length
        type: integer
        max: 8388608
"#;

fn user_registry() -> TypeRegistry {
    let mut collection = ExtensionCollection::new();
    collection
        .load_str("http://localhost/sample.yaml", EXTENSION_TYPES)
        .unwrap();
    TypeRegistry::new(collection)
}

#[test]
fn structure_types_expand_recursively_in_field_order() {
    let registry = user_registry();
    let point = required(TypeKind::Struct(vec![
        required(TypeKind::I32),
        required(TypeKind::I32),
    ]));
    assert_eq!(registry.resolve("point").unwrap(), point);
    assert_eq!(
        registry.resolve("line").unwrap(),
        required(TypeKind::Struct(vec![point.clone(), point]))
    );
}

#[rstest]
#[case("varbinary<10>", 10)]
#[case("varbinary<8388608>", 8388608)]
fn parametrized_user_types_accept_values_within_bounds(
    #[case] expression: &str,
    #[case] length: i64,
) {
    let registry = user_registry();
    assert_eq!(
        registry.resolve(expression).unwrap(),
        required(TypeKind::UserDefined {
            name: "varbinary".to_owned(),
            parameters: vec![TypeParameter::Integer(length)],
        })
    );
}

#[test]
fn parameter_above_bound_is_a_constraint_error() {
    let registry = user_registry();
    assert!(matches!(
        registry.resolve("varbinary<8388609>"),
        Err(TypeError::Constraint {
            value: 8388609,
            max: 8388608,
            ..
        })
    ));
}

#[test]
fn missing_required_parameter_is_a_grammar_error() {
    let registry = user_registry();
    assert!(matches!(
        registry.resolve("varbinary"),
        Err(TypeError::Grammar { .. })
    ));
}

#[test]
fn structure_reference_cycles_are_rejected() {
    let mut collection = ExtensionCollection::new();
    collection
        .load_str(
            "http://localhost/cyclic.yaml",
            "---\ntypes:\n  - name: ouroboros\n    structure:\n      head: i32\n      tail: ouroboros\n",
        )
        .unwrap();
    let registry = TypeRegistry::new(collection);
    assert!(matches!(
        registry.resolve("ouroboros"),
        Err(TypeError::Cycle { name }) if name == "ouroboros"
    ));
}

#[test]
fn mutual_structure_cycles_are_rejected() {
    let mut collection = ExtensionCollection::new();
    collection
        .load_str(
            "http://localhost/mutual.yaml",
            "---\ntypes:\n  - name: yin\n    structure:\n      other: yang\n  - name: yang\n    structure:\n      other: yin\n",
        )
        .unwrap();
    let registry = TypeRegistry::new(collection);
    assert!(matches!(
        registry.resolve("yin"),
        Err(TypeError::Cycle { .. })
    ));
}

#[test]
fn undefined_structure_field_reference_is_not_found() {
    let mut collection = ExtensionCollection::new();
    collection
        .load_str(
            "http://localhost/dangling.yaml",
            "---\ntypes:\n  - name: dangling\n    structure:\n      field: missing\n",
        )
        .unwrap();
    let registry = TypeRegistry::new(collection);
    assert!(matches!(
        registry.resolve("dangling"),
        Err(TypeError::NotFound { name }) if name == "missing"
    ));
}

const BINARY_FUNCTIONS: &str = r#"---
scalar_functions:
  -
    name: "to_binary"
    description: >
        Converts a string to a binary string.
    impls:
      - args:
          - name: string_expr
            type: string
            description: "The string to convert to binary."
        return_type: varbinary<L>
        description: "The binary representation of the input string in hex."
"#;

#[test]
fn function_lookup_matches_name_and_arity() {
    let mut collection = ExtensionCollection::new();
    collection
        .load_str("http://localhost/sample.yaml", EXTENSION_TYPES)
        .unwrap();
    collection
        .load_str("http://localhost/binary_functions.yaml", BINARY_FUNCTIONS)
        .unwrap();

    let registry = FunctionRegistry::new(&collection);

    let matches = registry.scalar_functions("to_binary", 1);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].args().len(), 1);
    assert_eq!(matches[0].args()[0].value_type, "string");
    assert_eq!(matches[0].return_type(), Some("varbinary<L>"));

    // Wrong arity is an empty result, not an error.
    assert!(registry.scalar_functions("to_binary", 2).is_empty());
    assert!(registry.scalar_functions("no_such_function", 1).is_empty());
}

#[test]
fn aggregate_lookup_is_separate_from_scalar() {
    let mut collection = ExtensionCollection::new();
    collection
        .load_str(
            "http://localhost/agg.yaml",
            "---\naggregate_functions:\n  - name: count_distinct\n    impls:\n      - args:\n          - name: input\n            type: i64\n        return_type: i64\n",
        )
        .unwrap();
    let registry = FunctionRegistry::new(&collection);
    assert_eq!(registry.aggregate_functions("count_distinct", 1).len(), 1);
    assert!(registry.scalar_functions("count_distinct", 1).is_empty());
}
