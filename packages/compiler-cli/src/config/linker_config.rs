use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::linker::LinkerOptions;
use crate::ngtsc::logging::LogLevel;

/// Contents of a linker configuration file:
///
/// ```json
/// { "linkerOptions": { "linkerJitMode": true }, "logLevel": "info" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinkerConfig {
    pub linker_options: LinkerOptions,
    pub log_level: Option<LogLevel>,
}

impl LinkerConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read linker config {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse linker config {}", path.display()))
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}
