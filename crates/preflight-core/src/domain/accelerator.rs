//! Accelerator availability as reported by the capability module.

use serde::{Deserialize, Serialize};

/// Accelerator details reported by the verification query.
///
/// The query program prints one JSON object; field names on the wire are
/// `version`, `available`, `device_count` and `device_name`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceleratorReport {
    /// Version string of the capability module itself.
    #[serde(rename = "version", default)]
    pub capability_version: Option<String>,
    pub available: bool,
    #[serde(default)]
    pub device_count: u32,
    #[serde(rename = "device_name", default)]
    pub first_device_name: Option<String>,
}

impl AcceleratorReport {
    /// Parse the report from query output.
    ///
    /// Modules sometimes print warnings to stdout on import, so the last line
    /// that looks like a JSON object wins.
    pub fn from_query_output(stdout: &str) -> Result<Self, serde_json::Error> {
        let payload = stdout
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| line.starts_with('{'))
            .unwrap_or("");
        serde_json::from_str(payload)
    }

    /// One human-readable line per field.
    pub fn diagnostic_lines(&self, capability: &str) -> Vec<String> {
        let mut lines = vec![
            format!(
                "{capability} version: {}",
                self.capability_version.as_deref().unwrap_or("unknown")
            ),
            format!("Accelerator available: {}", self.available),
            format!("Device count: {}", self.device_count),
        ];
        if let Some(name) = &self.first_device_name {
            lines.push(format!("Device name: {name}"));
        }
        lines
    }
}
