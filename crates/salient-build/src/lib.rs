//! Build configuration for the salient native extension.
//!
//! Resolves the build mode, picks compiler and linker flags for the host
//! toolchain, adds platform macros and discovers C sources. The result is a
//! serializable [`BuildPlan`] handed to whatever drives the compiler.
//!
//! ## Modules
//!
//! - [`mode`]: `DEBUG` / `RELEASE` selection from the environment
//! - [`toolchain`]: Target OS, toolchain and their flag tables
//! - [`platform`]: Per-OS define macros, libraries and include dirs
//! - [`sources`]: C source discovery
//! - [`plan`]: Build configuration and the assembled plan

pub mod error;
pub mod mode;
pub mod plan;
pub mod platform;
pub mod sources;
pub mod toolchain;

pub use error::{BuildError, Result};
pub use mode::BuildMode;
pub use plan::{BuildConfig, BuildPlan, Target};
pub use platform::{DefineMacro, PlatformSettings};
pub use sources::SourceSpec;
pub use toolchain::{TargetOs, Toolchain};
