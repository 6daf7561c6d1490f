//! Shared fixtures for orchestration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use preflight_core::ports::{
    AssetError, AssetFetcher, BinaryLocator, CommandOutput, CommandRunner, CommandSpec,
    OutputMode, RunError,
};
use preflight_runtime::Ports;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

pub const REPORT_ONE_GPU: &str =
    r#"{"version": "2.1.0+cu118", "available": true, "device_count": 1, "device_name": "NVIDIA A10G"}"#;

/// What kind of invocation a command is, judged from its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Call {
    Probe,
    Install,
    UpgradeInstaller,
    Requirements,
    LocalPackage,
    Verify,
    Fetch,
    Task,
    Other(String),
}

impl Call {
    fn classify(spec: &CommandSpec) -> Self {
        let args = spec.args.join(" ");
        if args.starts_with("-c ") && args.contains("find_spec") {
            Self::Probe
        } else if args.starts_with("-c ") {
            Self::Verify
        } else if args.contains("--index-url") {
            Self::Install
        } else if args.contains("--upgrade pip") {
            Self::UpgradeInstaller
        } else if args.contains("install -r") {
            Self::Requirements
        } else if args.contains("install -e") {
            Self::LocalPackage
        } else if args.ends_with("run_inference.py") {
            Self::Task
        } else {
            Self::Other(args)
        }
    }
}

/// Runner that answers each kind of invocation from a script and records
/// every command it was asked to run, in order.
pub struct ScriptedRunner {
    exit_codes: HashMap<Call, i32>,
    report: String,
    cancel_on: Option<(Call, CancellationToken)>,
    calls: Mutex<Vec<(Call, CommandSpec, OutputMode)>>,
}

impl ScriptedRunner {
    /// Everything succeeds; the capability is already installed.
    pub fn healthy() -> Self {
        Self {
            exit_codes: HashMap::new(),
            report: REPORT_ONE_GPU.to_string(),
            cancel_on: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// The probe reports the capability as absent.
    pub fn capability_absent() -> Self {
        Self::healthy().exit(Call::Probe, 1)
    }

    #[must_use]
    pub fn exit(mut self, call: Call, code: i32) -> Self {
        self.exit_codes.insert(call, code);
        self
    }

    /// Cancel `token` while running `call`, as a terminal Ctrl-C would.
    #[must_use]
    pub fn cancelling(mut self, call: Call, token: CancellationToken) -> Self {
        self.cancel_on = Some((call, token));
        self
    }

    /// Record an invocation that did not go through the runner.
    pub fn record(&self, call: Call) {
        self.calls
            .lock()
            .unwrap()
            .push((call, CommandSpec::new(""), OutputMode::Discard));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(call, _, _)| call.clone())
            .collect()
    }

    pub fn specs_for(&self, call: &Call) -> Vec<(CommandSpec, OutputMode)> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, _, _)| c == call)
            .map(|(_, spec, mode)| (spec.clone(), *mode))
            .collect()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.specs_for(call).len()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, spec: &CommandSpec, mode: OutputMode) -> Result<CommandOutput, RunError> {
        let call = Call::classify(spec);
        self.calls
            .lock()
            .unwrap()
            .push((call.clone(), spec.clone(), mode));
        if let Some((target, token)) = &self.cancel_on
            && *target == call
        {
            token.cancel();
        }

        let code = self.exit_codes.get(&call).copied().unwrap_or(0);
        if call == Call::Verify && code == 0 {
            return Ok(CommandOutput::with_stdout(0, self.report.clone()));
        }
        Ok(CommandOutput::exited(code))
    }
}

/// Locator with a fixed set of binaries on `PATH`.
pub struct FixedLocator(pub Vec<&'static str>);

impl BinaryLocator for FixedLocator {
    fn locate(&self, name: &str) -> Option<PathBuf> {
        self.0
            .contains(&name)
            .then(|| PathBuf::from("/usr/bin").join(name))
    }
}

/// Fetcher that must never be reached.
pub struct NoFetcher;

#[async_trait]
impl AssetFetcher for NoFetcher {
    async fn fetch(&self, url: &str, _dest: &Path) -> Result<(), AssetError> {
        panic!("unexpected download of {url}");
    }

    fn unpack(&self, archive: &Path, _into: &Path) -> Result<(), AssetError> {
        panic!("unexpected unpack of {}", archive.display());
    }
}

/// Fetcher that "downloads" a stub archive and "unpacks" it by creating
/// `provides` under the target directory. Fetches are logged on the runner
/// so their position among commands can be asserted.
pub struct RecordingFetcher {
    pub log: Arc<ScriptedRunner>,
    pub provides: Vec<&'static str>,
}

#[async_trait]
impl AssetFetcher for RecordingFetcher {
    async fn fetch(&self, _url: &str, dest: &Path) -> Result<(), AssetError> {
        self.log.record(Call::Fetch);
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(dest, b"zip").unwrap();
        Ok(())
    }

    fn unpack(&self, _archive: &Path, into: &Path) -> Result<(), AssetError> {
        for relative in &self.provides {
            let path = into.join(relative);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, b"").unwrap();
        }
        Ok(())
    }
}

pub fn ports(runner: Arc<ScriptedRunner>) -> Ports {
    ports_with_fetcher(runner, Arc::new(NoFetcher))
}

pub fn ports_with_fetcher(runner: Arc<ScriptedRunner>, fetcher: Arc<dyn AssetFetcher>) -> Ports {
    Ports {
        runner,
        locator: Arc::new(FixedLocator(vec!["python3"])),
        fetcher,
    }
}
