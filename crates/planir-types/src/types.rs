//! Canonical, immutable type values
//!
//! A [`Type`] pairs a [`TypeKind`] with a [`Nullability`]. Values never
//! mutate: "changing" nullability produces a new value via
//! [`Type::with_nullability`]. Two types are equal only if the kind, all
//! parameters and the nullability match.

use std::fmt;

/// Whether a type instance may represent an absent value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Nullability {
    /// The value is always present.
    #[default]
    Required,
    /// The value may be absent.
    Nullable,
}

impl Nullability {
    pub fn is_nullable(self) -> bool {
        matches!(self, Self::Nullable)
    }
}

/// The closed set of type kinds understood by the plan IR.
///
/// Built-in kinds form a fixed set so that exhaustive matching stays
/// possible; open extension happens through [`TypeKind::UserDefined`],
/// which carries the registry name plus its instantiation parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKind {
    // Fixed-width scalars
    Boolean,
    I8,
    I16,
    I32,
    I64,
    Fp32,
    Fp64,
    Uuid,

    // Variable-width scalars
    String,
    Binary,

    // Temporal
    Date,
    Time,
    Timestamp,
    TimestampTz,
    IntervalYear,
    IntervalDay,

    // Parametrized scalars
    Decimal { precision: u32, scale: u32 },
    FixedChar { length: u32 },
    VarChar { length: u32 },
    FixedBinary { length: u32 },

    /// Ordered, anonymous field list. Field names from the defining
    /// structure are schema-only and not retained; only order matters
    /// for equality.
    Struct(Vec<Type>),

    /// A type declared by an extension document, instantiated with the
    /// parameters its schema requires.
    UserDefined {
        name: String,
        parameters: Vec<TypeParameter>,
    },
}

impl TypeKind {
    /// Canonical base name as written in a type expression.
    pub fn base_name(&self) -> &str {
        match self {
            Self::Boolean => "boolean",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::Fp32 => "fp32",
            Self::Fp64 => "fp64",
            Self::Uuid => "uuid",
            Self::String => "string",
            Self::Binary => "binary",
            Self::Date => "date",
            Self::Time => "time",
            Self::Timestamp => "timestamp",
            Self::TimestampTz => "timestamp_tz",
            Self::IntervalYear => "interval_year",
            Self::IntervalDay => "interval_day",
            Self::Decimal { .. } => "decimal",
            Self::FixedChar { .. } => "fixedchar",
            Self::VarChar { .. } => "varchar",
            Self::FixedBinary { .. } => "fixedbinary",
            Self::Struct(_) => "struct",
            Self::UserDefined { name, .. } => name,
        }
    }

    /// The built-in class this kind belongs to, if any.
    ///
    /// Struct and user-defined kinds have no class; they cannot be the
    /// target of a dialect type localization.
    pub fn class(&self) -> Option<TypeClass> {
        let class = match self {
            Self::Boolean => TypeClass::Boolean,
            Self::I8 => TypeClass::I8,
            Self::I16 => TypeClass::I16,
            Self::I32 => TypeClass::I32,
            Self::I64 => TypeClass::I64,
            Self::Fp32 => TypeClass::Fp32,
            Self::Fp64 => TypeClass::Fp64,
            Self::Uuid => TypeClass::Uuid,
            Self::String => TypeClass::String,
            Self::Binary => TypeClass::Binary,
            Self::Date => TypeClass::Date,
            Self::Time => TypeClass::Time,
            Self::Timestamp => TypeClass::Timestamp,
            Self::TimestampTz => TypeClass::TimestampTz,
            Self::IntervalYear => TypeClass::IntervalYear,
            Self::IntervalDay => TypeClass::IntervalDay,
            Self::Decimal { .. } => TypeClass::Decimal,
            Self::FixedChar { .. } => TypeClass::FixedChar,
            Self::VarChar { .. } => TypeClass::VarChar,
            Self::FixedBinary { .. } => TypeClass::FixedBinary,
            Self::Struct(_) | Self::UserDefined { .. } => return None,
        };
        Some(class)
    }

    /// Integer parameters of a parametrized built-in kind, in declaration
    /// order. Empty for simple kinds.
    pub fn integer_parameters(&self) -> Vec<u64> {
        match self {
            Self::Decimal { precision, scale } => vec![u64::from(*precision), u64::from(*scale)],
            Self::FixedChar { length } | Self::VarChar { length } | Self::FixedBinary { length } => {
                vec![u64::from(*length)]
            }
            _ => Vec::new(),
        }
    }
}

/// A parameter instantiating a user-defined type kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeParameter {
    /// An integer literal value.
    Integer(i64),
    /// A nested type.
    Type(Type),
}

impl fmt::Display for TypeParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{value}"),
            Self::Type(ty) => write!(f, "{ty}"),
        }
    }
}

/// An immutable, structurally-comparable type value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Type {
    kind: TypeKind,
    nullability: Nullability,
}

impl Type {
    pub fn new(kind: TypeKind, nullability: Nullability) -> Self {
        Self { kind, nullability }
    }

    /// A required (non-nullable) type of the given kind.
    pub fn required(kind: TypeKind) -> Self {
        Self::new(kind, Nullability::Required)
    }

    /// A nullable type of the given kind.
    pub fn nullable(kind: TypeKind) -> Self {
        Self::new(kind, Nullability::Nullable)
    }

    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    pub fn nullability(&self) -> Nullability {
        self.nullability
    }

    pub fn is_nullable(&self) -> bool {
        self.nullability.is_nullable()
    }

    /// Returns a new value with the same kind and the given nullability.
    pub fn with_nullability(&self, nullability: Nullability) -> Self {
        Self {
            kind: self.kind.clone(),
            nullability,
        }
    }

    /// The built-in class of this type's kind, if any.
    pub fn class(&self) -> Option<TypeClass> {
        self.kind.class()
    }
}

impl fmt::Display for Type {
    /// Formats the canonical type expression: `name ['?'] ['<' params '>']`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.base_name())?;
        if self.nullability.is_nullable() {
            f.write_str("?")?;
        }
        match &self.kind {
            TypeKind::Struct(fields) => {
                f.write_str("<")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{field}")?;
                }
                f.write_str(">")
            }
            TypeKind::UserDefined { parameters, .. } if !parameters.is_empty() => {
                f.write_str("<")?;
                for (i, parameter) in parameters.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{parameter}")?;
                }
                f.write_str(">")
            }
            other => {
                let parameters = other.integer_parameters();
                if parameters.is_empty() {
                    return Ok(());
                }
                f.write_str("<")?;
                for (i, parameter) in parameters.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{parameter}")?;
                }
                f.write_str(">")
            }
        }
    }
}

/// A built-in type class: the parameterless identity of a built-in kind.
///
/// Dialects localize classes, not instantiated kinds - `decimal<10,2>` and
/// `decimal<38,0>` share the [`TypeClass::Decimal`] localization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeClass {
    Boolean,
    I8,
    I16,
    I32,
    I64,
    Fp32,
    Fp64,
    Uuid,
    String,
    Binary,
    Date,
    Time,
    Timestamp,
    TimestampTz,
    IntervalYear,
    IntervalDay,
    Decimal,
    FixedChar,
    VarChar,
    FixedBinary,
}

impl TypeClass {
    /// Resolves a canonical name or one of the fixed short aliases.
    /// Lookup is case-sensitive and exact.
    pub fn from_name(name: &str) -> Option<Self> {
        let class = match name {
            "boolean" | "bool" => Self::Boolean,
            "i8" => Self::I8,
            "i16" => Self::I16,
            "i32" => Self::I32,
            "i64" => Self::I64,
            "fp32" => Self::Fp32,
            "fp64" => Self::Fp64,
            "uuid" => Self::Uuid,
            "string" | "str" => Self::String,
            "binary" | "vbin" => Self::Binary,
            "date" => Self::Date,
            "time" => Self::Time,
            "timestamp" | "ts" => Self::Timestamp,
            "timestamp_tz" | "tstz" => Self::TimestampTz,
            "interval_year" | "iyear" => Self::IntervalYear,
            "interval_day" | "iday" => Self::IntervalDay,
            "decimal" | "dec" => Self::Decimal,
            "fixedchar" | "fchar" | "char" => Self::FixedChar,
            "varchar" | "vchar" => Self::VarChar,
            "fixedbinary" | "fbin" => Self::FixedBinary,
            _ => return None,
        };
        Some(class)
    }

    /// Canonical name of this class.
    pub fn name(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::Fp32 => "fp32",
            Self::Fp64 => "fp64",
            Self::Uuid => "uuid",
            Self::String => "string",
            Self::Binary => "binary",
            Self::Date => "date",
            Self::Time => "time",
            Self::Timestamp => "timestamp",
            Self::TimestampTz => "timestamp_tz",
            Self::IntervalYear => "interval_year",
            Self::IntervalDay => "interval_day",
            Self::Decimal => "decimal",
            Self::FixedChar => "fixedchar",
            Self::VarChar => "varchar",
            Self::FixedBinary => "fixedbinary",
        }
    }

    /// Preferred short alias of this class, as used in kernel identifiers.
    /// Classes without a short alias return the canonical name.
    pub fn short_name(self) -> &'static str {
        match self {
            Self::Boolean => "bool",
            Self::String => "str",
            Self::Binary => "vbin",
            Self::Timestamp => "ts",
            Self::TimestampTz => "tstz",
            Self::IntervalYear => "iyear",
            Self::IntervalDay => "iday",
            Self::Decimal => "dec",
            Self::FixedChar => "fchar",
            Self::VarChar => "vchar",
            Self::FixedBinary => "fbin",
            other => other.name(),
        }
    }

    /// Number of integer parameters an expression of this class must supply.
    pub fn parameter_arity(self) -> usize {
        match self {
            Self::Decimal => 2,
            Self::FixedChar | Self::VarChar | Self::FixedBinary => 1,
            _ => 0,
        }
    }

    /// Instantiates a kind of this class from the given integer parameters.
    ///
    /// `expression` is the original text, used only for error context.
    pub fn make_kind(self, expression: &str, parameters: &[u64]) -> crate::Result<TypeKind> {
        let arity = self.parameter_arity();
        if parameters.len() != arity {
            return Err(crate::TypeError::grammar(
                expression,
                format!(
                    "`{}` takes {} parameter(s), got {}",
                    self.name(),
                    arity,
                    parameters.len()
                ),
            ));
        }
        let width = |value: u64| -> crate::Result<u32> {
            u32::try_from(value).map_err(|_| {
                crate::TypeError::grammar(expression, format!("parameter {value} is out of range"))
            })
        };
        let kind = match self {
            Self::Boolean => TypeKind::Boolean,
            Self::I8 => TypeKind::I8,
            Self::I16 => TypeKind::I16,
            Self::I32 => TypeKind::I32,
            Self::I64 => TypeKind::I64,
            Self::Fp32 => TypeKind::Fp32,
            Self::Fp64 => TypeKind::Fp64,
            Self::Uuid => TypeKind::Uuid,
            Self::String => TypeKind::String,
            Self::Binary => TypeKind::Binary,
            Self::Date => TypeKind::Date,
            Self::Time => TypeKind::Time,
            Self::Timestamp => TypeKind::Timestamp,
            Self::TimestampTz => TypeKind::TimestampTz,
            Self::IntervalYear => TypeKind::IntervalYear,
            Self::IntervalDay => TypeKind::IntervalDay,
            Self::Decimal => TypeKind::Decimal {
                precision: width(parameters[0])?,
                scale: width(parameters[1])?,
            },
            Self::FixedChar => TypeKind::FixedChar {
                length: width(parameters[0])?,
            },
            Self::VarChar => TypeKind::VarChar {
                length: width(parameters[0])?,
            },
            Self::FixedBinary => TypeKind::FixedBinary {
                length: width(parameters[0])?,
            },
        };
        Ok(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn nullability_changes_produce_new_values() {
        let required = Type::required(TypeKind::I32);
        let nullable = required.with_nullability(Nullability::Nullable);
        assert_eq!(required.kind(), nullable.kind());
        assert_ne!(required, nullable);
        assert!(!required.is_nullable());
        assert!(nullable.is_nullable());
    }

    #[test]
    fn equality_includes_parameters() {
        let a = Type::required(TypeKind::Decimal {
            precision: 10,
            scale: 2,
        });
        let b = Type::required(TypeKind::Decimal {
            precision: 10,
            scale: 0,
        });
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn display_is_canonical() {
        assert_eq!(Type::required(TypeKind::I32).to_string(), "i32");
        assert_eq!(Type::nullable(TypeKind::I32).to_string(), "i32?");
        assert_eq!(
            Type::required(TypeKind::Decimal {
                precision: 10,
                scale: 2
            })
            .to_string(),
            "decimal<10,2>"
        );
        assert_eq!(
            Type::nullable(TypeKind::VarChar { length: 7 }).to_string(),
            "varchar?<7>"
        );
        let point = Type::required(TypeKind::Struct(vec![
            Type::required(TypeKind::I32),
            Type::required(TypeKind::I32),
        ]));
        assert_eq!(point.to_string(), "struct<i32,i32>");
    }

    #[test]
    fn alias_table_is_exact() {
        assert_eq!(TypeClass::from_name("iyear"), Some(TypeClass::IntervalYear));
        assert_eq!(TypeClass::from_name("char"), Some(TypeClass::FixedChar));
        assert_eq!(TypeClass::from_name("IYEAR"), None);
        assert_eq!(TypeClass::from_name("int"), None);
    }

    #[test]
    fn make_kind_checks_arity() {
        assert!(TypeClass::I64.make_kind("i64<10>", &[10]).is_err());
        assert!(TypeClass::Decimal.make_kind("decimal<10>", &[10]).is_err());
        assert_eq!(
            TypeClass::Decimal.make_kind("decimal<10,2>", &[10, 2]).unwrap(),
            TypeKind::Decimal {
                precision: 10,
                scale: 2
            }
        );
    }
}
