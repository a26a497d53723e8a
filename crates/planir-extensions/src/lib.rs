//! Extension documents and registries for the Planir plan IR
//!
//! Extension documents declare user-defined types and function signatures
//! beyond the built-in set. This crate provides:
//! - the decoded document model ([`ExtensionDocument`])
//! - [`ExtensionCollection`] - the merged, URI-keyed document set
//! - [`TypeRegistry`] - name resolution over built-ins plus loaded types
//! - [`FunctionRegistry`] - (name, arity) lookup over loaded signatures
//!
//! All registries are build-then-freeze: construction is synchronous and
//! all-or-nothing, and a built registry is safe for unsynchronized
//! concurrent reads.

mod collection;
mod document;
mod error;
mod function_registry;
mod type_registry;

pub use collection::*;
pub use document::*;
pub use error::*;
pub use function_registry::*;
pub use type_registry::*;

/// Result type for extension-loading operations
pub type Result<T> = std::result::Result<T, ExtensionError>;
