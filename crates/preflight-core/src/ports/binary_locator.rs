//! Binary lookup port used by the interpreter resolver.

use std::path::PathBuf;

/// Finds executables by name.
pub trait BinaryLocator: Send + Sync {
    /// Full path of `name` if it can be executed, `None` otherwise.
    fn locate(&self, name: &str) -> Option<PathBuf>;
}
