//! Interpreter handle selected by the resolver.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How the interpreter handle was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterpreterSource {
    /// Taken verbatim from the override environment variable.
    Override,
    /// The preferred interpreter binary was found on `PATH`.
    Preferred,
    /// Nothing better was found; the generic default name is used.
    Fallback,
}

impl InterpreterSource {
    /// Short label for logs.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Override => "override",
            Self::Preferred => "preferred",
            Self::Fallback => "fallback",
        }
    }
}

/// The interpreter every later step is run with.
///
/// The program is a binary name or path. It is never validated: a missing
/// interpreter only shows up when a step that uses it fails to launch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpreterHandle {
    program: String,
    source: InterpreterSource,
}

impl InterpreterHandle {
    pub fn new(program: impl Into<String>, source: InterpreterSource) -> Self {
        Self {
            program: program.into(),
            source,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub const fn source(&self) -> InterpreterSource {
        self.source
    }
}

impl fmt::Display for InterpreterHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.program, self.source.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_source() {
        let handle = InterpreterHandle::new("python3", InterpreterSource::Preferred);
        assert_eq!(handle.to_string(), "python3 (preferred)");
        assert_eq!(handle.program(), "python3");
    }
}
