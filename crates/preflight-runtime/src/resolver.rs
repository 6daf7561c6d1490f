//! Interpreter selection.

use preflight_core::config::InterpreterPreference;
use preflight_core::domain::{InterpreterHandle, InterpreterSource};
use preflight_core::ports::BinaryLocator;
use std::path::PathBuf;
use tracing::{debug, warn};

/// `BinaryLocator` backed by a `PATH` search.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathLocator;

impl BinaryLocator for PathLocator {
    fn locate(&self, name: &str) -> Option<PathBuf> {
        which::which(name).ok()
    }
}

/// Select the interpreter every later step runs with.
///
/// A non-empty override is returned verbatim with no existence check.
/// Otherwise the preferred binary is used when the locator finds it, and
/// the fallback name when it does not. Never fails: a missing interpreter
/// only surfaces when a step using it fails to launch.
pub fn resolve_interpreter(
    override_value: Option<&str>,
    preference: &InterpreterPreference,
    locator: &dyn BinaryLocator,
) -> InterpreterHandle {
    if let Some(value) = override_value.filter(|value| !value.is_empty()) {
        debug!("Using interpreter override: {value}");
        return InterpreterHandle::new(value, InterpreterSource::Override);
    }

    if let Some(path) = locator.locate(&preference.preferred) {
        debug!("Found {} at {}", preference.preferred, path.display());
        return InterpreterHandle::new(preference.preferred.clone(), InterpreterSource::Preferred);
    }

    warn!(
        "{} not found on PATH, falling back to {}",
        preference.preferred, preference.fallback
    );
    InterpreterHandle::new(preference.fallback.clone(), InterpreterSource::Fallback)
}
