//! Command-line definition.
//!
//! The bootstrap takes no behavior-changing arguments: everything it does is
//! fixed, and the only inputs are environment variables.

use clap::Parser;

const AFTER_HELP: &str = "\
Environment:
  PYTHON_BIN          Interpreter to use instead of auto-detecting python3/python
  PREFLIGHT_WORKDIR   Working directory (defaults to the executable's directory)
  RUST_LOG            Log filter, e.g. debug or preflight_runtime=trace";

/// Provision the Python environment, verify the accelerator and run inference.
#[derive(Debug, Parser)]
#[command(name = "preflight")]
#[command(version)]
#[command(about = "Provision the Python environment and launch run_inference.py")]
#[command(after_help = AFTER_HELP)]
pub struct Cli {}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_arguments_accepted() {
        assert!(Cli::try_parse_from(["preflight"]).is_ok());
        assert!(Cli::try_parse_from(["preflight", "--verbose"]).is_err());
        assert!(Cli::try_parse_from(["preflight", "extra"]).is_err());
    }

    #[test]
    fn test_version_flag_exits_early() {
        let err = Cli::try_parse_from(["preflight", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }
}
