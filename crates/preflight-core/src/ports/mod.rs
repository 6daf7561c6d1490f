//! Port definitions for the bootstrap orchestrator.
//!
//! Core owns the traits and their value types; `preflight-runtime` owns the
//! implementations (process spawning, `PATH` lookup, HTTP downloads). The
//! binary wires them together in its composition root.

mod asset_fetcher;
mod binary_locator;
mod command_runner;

pub use asset_fetcher::{AssetError, AssetFetcher};
pub use binary_locator::BinaryLocator;
pub use command_runner::{
    CommandOutput, CommandRunner, CommandSpec, EXIT_CANNOT_EXECUTE, EXIT_INTERRUPTED,
    EXIT_NOT_FOUND, OutputMode, RunError,
};
