//! C header collection and FFI definition emission for the salient bindings.
//!
//! Turns the native library's public headers into definition text a
//! permissive C declaration parser accepts, in include order.
//!
//! ## Modules
//!
//! - [`normalize`]: Lexical stripping of comments, directives and annotations
//! - [`unit`]: A single cleaned header and its include dependencies
//! - [`context`]: Per-build registry of parsed headers
//! - [`resolve`]: Include-order resolution
//! - [`decl`]: Permissive C declaration grammar
//! - [`cdef`]: Definition text emission with diagnostics

pub mod cdef;
pub mod context;
pub mod decl;
pub mod error;
pub mod normalize;
pub mod resolve;
pub mod unit;

// Re-export key types for convenience
pub use cdef::{Cdef, CdefEmitter, CheckedHeader};
pub use context::HeaderContext;
pub use decl::{parse_declarations, Declaration, FunctionDecl};
pub use error::{HeaderError, Result};
pub use normalize::{Normalizer, Pass};
pub use unit::HeaderUnit;
