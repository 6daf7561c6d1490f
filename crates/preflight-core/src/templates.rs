//! Inline query programs handed to the interpreter with `-c`.
//!
//! The orchestrator treats these as opaque invocations: the probe is judged
//! by its exit code alone and the report by its exit code plus one JSON line
//! on stdout.

/// Quote `value` as a single-quoted Python string literal.
fn py_literal(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}

/// Program that exits 0 when `module` can be found, 1 otherwise.
///
/// Uses `importlib.util.find_spec`, so the module is located but never
/// imported or executed.
pub fn probe_program(module: &str) -> String {
    format!(
        "import importlib.util, sys; sys.exit(0 if importlib.util.find_spec({}) is not None else 1)",
        py_literal(module)
    )
}

/// Program that imports `module` and prints its accelerator details as JSON.
///
/// Exits non-zero (with a traceback on stderr) when the module cannot be
/// imported.
pub fn report_program(module: &str) -> String {
    [
        "import importlib, json".to_string(),
        format!("m = importlib.import_module({})", py_literal(module)),
        "available = bool(m.cuda.is_available())".to_string(),
        "count = int(m.cuda.device_count()) if available else 0".to_string(),
        "name = m.cuda.get_device_name(0) if count > 0 else None".to_string(),
        "print(json.dumps({'version': getattr(m, '__version__', None), 'available': available, 'device_count': count, 'device_name': name}))".to_string(),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_does_not_import() {
        let program = probe_program("torch");
        assert!(program.contains("find_spec('torch')"));
        assert!(!program.contains("import torch"));
    }

    #[test]
    fn report_imports_module_and_prints_json() {
        let program = report_program("torch");
        assert!(program.contains("importlib.import_module('torch')"));
        assert!(program.contains("json.dumps"));
        assert_eq!(program.lines().count(), 6);
    }

    #[test]
    fn module_names_are_escaped() {
        assert_eq!(py_literal("a'b"), "'a\\'b'");
        assert_eq!(py_literal("a\\b"), "'a\\\\b'");
    }
}
