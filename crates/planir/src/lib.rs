//! Cross-engine query-plan IR type system
//!
//! Planir parses textual type expressions, maintains a registry of
//! built-in and user-extensible types, resolves function signatures
//! declared in extension documents, and localizes the canonical type
//! system to engine-specific dialect naming and capability rules.
//!
//! # Example
//!
//! ```
//! use planir::{ExtensionCollection, TypeRegistry};
//!
//! let mut collection = ExtensionCollection::new();
//! collection.load_str(
//!     "http://localhost/geo.yaml",
//!     "types:\n  - name: point\n    structure:\n      latitude: i32\n      longitude: i32\n",
//! )?;
//!
//! let registry = TypeRegistry::new(collection);
//! let decimal = registry.resolve("decimal?<10,2>")?;
//! assert!(decimal.is_nullable());
//!
//! let point = registry.resolve("point")?;
//! assert_eq!(point.to_string(), "struct<i32,i32>");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export the public APIs of the member crates
pub use planir_dialect as dialect;
pub use planir_extensions as extensions;
pub use planir_types as types;

// Convenience re-exports
pub use planir_dialect::{Dialect, DialectError, LocalTypeRegistry};
pub use planir_extensions::{
    ExtensionCollection, ExtensionError, FunctionRegistry, FunctionSignature, TypeRegistry,
};
pub use planir_types::{Nullability, Type, TypeClass, TypeError, TypeKind, TypeParameter};

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn end_to_end_resolution() {
        let registry = TypeRegistry::new(ExtensionCollection::new());
        let ty = registry.resolve("varchar?<42>").unwrap();
        assert_eq!(ty, Type::nullable(TypeKind::VarChar { length: 42 }));
        assert_eq!(ty.class(), Some(TypeClass::VarChar));
    }
}
