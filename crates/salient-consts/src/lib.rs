//! Constant and enum module generation for the salient bindings.
//!
//! Reads the integer `#define`s kept in checked header declarations and
//! renders them as scripting-facing modules.
//!
//! ## Modules
//!
//! - [`table`]: Constant collection with exclusion rules
//! - [`render`]: Module, enum and JSON rendering
//! - [`all`]: Maintenance of the generated `__all__` section

pub mod all;
pub mod error;
pub mod render;
pub mod table;

pub use all::{update_module_all, update_module_all_file};
pub use error::{ConstError, Result};
pub use render::{enum_members, render_enum_class, render_json, render_module};
pub use table::{Constant, ConstantTable, ExclusionRules};
