//! Engine dialects for the Planir plan IR
//!
//! A dialect localizes the canonical type/function system to one engine's
//! naming and capability rules. Loading a [`Dialect`] document touches no
//! registry; localizing it against a [`planir_extensions::TypeRegistry`]
//! validates every declared type, function and kernel and produces a
//! frozen [`LocalTypeRegistry`] with bidirectional canonical/local name
//! mapping.

mod document;
mod error;
mod localize;

pub use document::*;
pub use error::*;
pub use localize::*;

/// Result type for dialect operations
pub type Result<T> = std::result::Result<T, DialectError>;
