//! Decoded dialect document model
//!
//! Loading a dialect only decodes the document; nothing is resolved until
//! [`crate::Dialect::localize`] runs against a type registry.
//!
//! Duplicate keys inside a single mapping are not last-write-wins: a
//! repeated key carrying the identical value is accepted (idempotent),
//! a repeated key with a conflicting value fails the load.

use indexmap::IndexMap;
use serde::Deserialize;
use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use std::fmt;
use std::io;

/// A named, engine-specific localization of the canonical type/function
/// system.
#[derive(Debug, Clone, Deserialize)]
pub struct Dialect {
    pub name: String,
    /// Dialect kind tag, e.g. `sql`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Short dependency name -> extension document URI.
    #[serde(default)]
    pub dependencies: IndexMap<String, String>,
    /// Canonical type name (or alias) -> local naming entry.
    #[serde(default)]
    pub supported_types: SupportedTypes,
    /// Scalar function localization entries.
    #[serde(default)]
    pub scalar_functions: Vec<FunctionLocalization>,
    /// Aggregate function localization entries.
    #[serde(default)]
    pub aggregate_functions: Vec<FunctionLocalization>,
}

impl Dialect {
    /// Decodes a dialect document from already-opened content.
    pub fn load(reader: impl io::Read) -> crate::Result<Self> {
        let dialect: Self = serde_yaml::from_reader(reader)?;
        log::debug!(
            "loaded dialect `{}` ({}): {} supported type(s), {} scalar function(s)",
            dialect.name,
            dialect.kind,
            dialect.supported_types.len(),
            dialect.scalar_functions.len()
        );
        Ok(dialect)
    }

    /// Decodes a dialect document from a string slice.
    pub fn load_str(content: &str) -> crate::Result<Self> {
        Self::load(content.as_bytes())
    }
}

/// Ordered canonical-name -> localization map with duplicate-key checking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupportedTypes(IndexMap<String, TypeLocalization>);

impl SupportedTypes {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypeLocalization)> {
        self.0.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn get(&self, name: &str) -> Option<&TypeLocalization> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for SupportedTypes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        struct SupportedTypesVisitor;

        impl<'de> Visitor<'de> for SupportedTypesVisitor {
            type Value = SupportedTypes;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a map of type localizations")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = IndexMap::new();
                while let Some((name, entry)) = access.next_entry::<String, TypeLocalization>()? {
                    if let Some(existing) = entries.get(&name) {
                        if existing != &entry {
                            return Err(de::Error::custom(format!(
                                "type `{name}` is declared twice with conflicting values"
                            )));
                        }
                    } else {
                        entries.insert(name, entry);
                    }
                }
                Ok(SupportedTypes(entries))
            }
        }

        deserializer.deserialize_map(SupportedTypesVisitor)
    }
}

/// How one canonical type class is named and supported by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeLocalization {
    /// Local name; for parametrized classes this is the pattern base,
    /// formatted as `NAME(p1,p2)`.
    pub sql_type_name: String,
    /// Whether the engine supports the type as a table column.
    pub supported_as_column: bool,
}

impl<'de> Deserialize<'de> for TypeLocalization {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        struct LocalizationVisitor;

        fn set_once<A, T>(slot: &mut Option<T>, value: T, field: &str) -> Result<(), A>
        where
            A: de::Error,
            T: PartialEq + fmt::Debug,
        {
            if let Some(existing) = slot {
                if existing != &value {
                    return Err(A::custom(format!(
                        "field `{field}` is declared twice with conflicting values"
                    )));
                }
            } else {
                *slot = Some(value);
            }
            Ok(())
        }

        impl<'de> Visitor<'de> for LocalizationVisitor {
            type Value = TypeLocalization;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a type localization entry")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut sql_type_name: Option<String> = None;
                let mut supported_as_column: Option<bool> = None;
                while let Some(key) = access.next_key::<String>()? {
                    match key.as_str() {
                        "sql_type_name" => {
                            let value: String = access.next_value()?;
                            set_once::<A::Error, _>(&mut sql_type_name, value, "sql_type_name")?;
                        }
                        "supported_as_column" => {
                            let value: bool = access.next_value()?;
                            set_once::<A::Error, _>(
                                &mut supported_as_column,
                                value,
                                "supported_as_column",
                            )?;
                        }
                        _ => {
                            access.next_value::<IgnoredAny>()?;
                        }
                    }
                }
                Ok(TypeLocalization {
                    sql_type_name: sql_type_name
                        .ok_or_else(|| de::Error::missing_field("sql_type_name"))?,
                    supported_as_column: supported_as_column.unwrap_or(false),
                })
            }
        }

        deserializer.deserialize_map(LocalizationVisitor)
    }
}

/// One scalar- or aggregate-function localization entry.
#[derive(Debug, Clone, Deserialize)]
pub struct FunctionLocalization {
    /// Canonical qualified name, `<dependency>.<function>`.
    pub name: String,
    /// Engine-local name; defaults to the unqualified canonical name.
    #[serde(default)]
    pub local_name: Option<String>,
    /// Whether the engine writes this function infix.
    #[serde(default)]
    pub infix: bool,
    /// Engine options required for canonical semantics, recorded verbatim.
    #[serde(default)]
    pub required_options: IndexMap<String, String>,
    /// Kernel identifiers (argument-type combinations) the engine supports.
    #[serde(default)]
    pub supported_kernels: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn identical_duplicate_fields_are_idempotent() {
        let dialect = Dialect::load_str(
            "---\nname: d\ntype: sql\nsupported_types:\n  i64:\n    sql_type_name: int64\n    supported_as_column: true\n    supported_as_column: true\n",
        )
        .unwrap();
        assert_eq!(
            dialect.supported_types.get("i64"),
            Some(&TypeLocalization {
                sql_type_name: "int64".to_owned(),
                supported_as_column: true,
            })
        );
    }

    #[test]
    fn conflicting_duplicate_fields_fail_the_load() {
        let err = Dialect::load_str(
            "---\nname: d\ntype: sql\nsupported_types:\n  i64:\n    sql_type_name: int64\n    supported_as_column: true\n    supported_as_column: false\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("supported_as_column"));
    }

    #[test]
    fn conflicting_duplicate_type_keys_fail_the_load() {
        let err = Dialect::load_str(
            "---\nname: d\ntype: sql\nsupported_types:\n  i32:\n    sql_type_name: int32\n  i32:\n    sql_type_name: integer\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("i32"));
    }

    #[test]
    fn identical_duplicate_type_keys_are_idempotent() {
        let dialect = Dialect::load_str(
            "---\nname: d\ntype: sql\nsupported_types:\n  i32:\n    sql_type_name: int32\n  i32:\n    sql_type_name: int32\n",
        )
        .unwrap();
        assert_eq!(dialect.supported_types.len(), 1);
    }

    #[test]
    fn missing_sql_type_name_is_an_error() {
        assert!(
            Dialect::load_str(
                "---\nname: d\ntype: sql\nsupported_types:\n  i32:\n    supported_as_column: true\n",
            )
            .is_err()
        );
    }
}
