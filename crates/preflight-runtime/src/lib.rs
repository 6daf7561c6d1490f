//! Adapters and orchestration for the preflight bootstrap.
//!
//! Implements the `preflight-core` ports against the real system (tokio
//! process spawning with signal-aware shutdown, `PATH` lookup, HTTP archive
//! downloads) and drives them in the fixed bootstrap order.

#![deny(unsafe_code)]

pub mod assets;
pub mod command;
pub mod installer;
pub mod invoke;
pub mod orchestrator;
pub mod pipeline;
pub mod probe;
pub mod resolver;
pub mod verify;

// Re-export the concrete port implementations
pub use assets::{AssetPreflight, HttpAssetFetcher};
pub use command::SystemCommandRunner;
pub use resolver::{PathLocator, resolve_interpreter};

// Re-export the orchestration entry point
pub use orchestrator::{Orchestrator, Ports, RunSummary};
