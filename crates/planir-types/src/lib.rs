//! Canonical type model for the Planir plan IR
//!
//! This crate provides the engine-neutral type representation shared by every
//! other Planir crate:
//! - [`Type`], [`TypeKind`] and [`Nullability`] - the immutable type values
//! - the textual type-expression grammar (`name ['?'] ['<' params '>']`)
//! - the [`TypeError`] taxonomy used across registries

mod error;
mod parser;
mod types;

pub use error::*;
pub use parser::*;
pub use types::*;

/// Result type for type-system operations
pub type Result<T> = std::result::Result<T, TypeError>;
