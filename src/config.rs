//! Configuration file handling for toolenv
//!
//! `toolenv.yaml` declares the tools to activate:
//!
//! ```yaml
//! backend: asdf
//! tools:
//!   nodejs: "20:latest"
//!   golang: 1.22.12
//! plugins:
//!   mytool: "mytool::https://example.com/asdf-mytool.git"
//! ```
//!
//! The `tools` mapping keeps declaration order; installs run in that order.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, ToolenvError};
use crate::request::{ToolRequest, canonical_tool_id};

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "toolenv.yaml";

#[derive(Debug, Deserialize)]
struct RawConfig {
    backend: Option<String>,
    // serde_yaml::Mapping keeps YAML document order
    #[serde(default)]
    tools: serde_yaml::Mapping,
    #[serde(default)]
    plugins: HashMap<String, String>,
}

/// Parsed toolenv configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Backend selector; the default backend applies when unset
    pub backend: Option<String>,
    /// Declared tools as (tool id, version spec), in declaration order
    pub tools: Vec<(String, String)>,
    /// Per-tool plugin override strings
    pub plugins: HashMap<String, String>,
}

impl Config {
    /// Load a configuration file from disk
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(ToolenvError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, &path.display().to_string())
    }

    /// Parse configuration from a YAML string
    pub fn parse(content: &str, path: &str) -> Result<Self> {
        let raw: RawConfig =
            serde_yaml::from_str(content).map_err(|e| ToolenvError::ConfigParseFailed {
                path: path.to_string(),
                reason: e.to_string(),
            })?;

        let mut tools = Vec::with_capacity(raw.tools.len());
        for (key, value) in &raw.tools {
            let tool = key
                .as_str()
                .ok_or_else(|| ToolenvError::ConfigInvalid {
                    message: format!("tool id must be a string, got: {key:?}"),
                })?
                .to_string();
            let spec = yaml_scalar_to_string(value).ok_or_else(|| ToolenvError::ConfigInvalid {
                message: format!("version spec for '{tool}' must be a scalar, got: {value:?}"),
            })?;
            tools.push((tool, spec));
        }

        Ok(Self {
            backend: raw.backend,
            tools,
            plugins: raw.plugins,
        })
    }

    /// Build tool requests from the declared tools, in declaration order
    pub fn requests(&self) -> Result<Vec<ToolRequest>> {
        self.tools
            .iter()
            .map(|(tool, spec)| {
                let canonical = canonical_tool_id(tool);
                let plugin_override = self
                    .plugins
                    .get(tool)
                    .or_else(|| self.plugins.get(&canonical))
                    .cloned();
                ToolRequest::new(tool, spec, plugin_override)
            })
            .collect()
    }
}

/// Version specs may be written as YAML strings or bare numbers
fn yaml_scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Null => Some(String::new()),
        _ => None,
    }
}
