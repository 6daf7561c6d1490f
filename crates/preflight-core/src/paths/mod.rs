//! Working directory resolution.
//!
//! All file inputs (dependency manifest, local package, task entry point,
//! downloaded artifacts) are resolved relative to one working directory.
//!
//! # Design
//!
//! - The resolver is pure; callers pass in the override, executable
//!   location and current directory
//! - `PathError` keeps I/O details out of the orchestrator

mod error;
mod workdir;

pub use error::PathError;
pub use workdir::{WorkdirResolution, WorkdirSource, resolve_workdir};
