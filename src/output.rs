//! Rendering of the composed environment diff
//!
//! The diff itself is format-agnostic; this module is the peripheral CLI
//! concern of turning it into `KEY=value` lines, `export` statements for
//! `eval`, or a flat JSON object.

use std::collections::BTreeMap;

use crate::activate::EnvironmentDiff;
use crate::error::Result;
use crate::execenv::shell_escape;

/// Output format for the `env` command
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    /// `KEY=value` lines
    Plain,
    /// `export KEY=value` statements suitable for `eval`
    Export,
    /// Flat JSON object
    Json,
}

/// Render an environment diff in the requested format
pub fn render(diff: &EnvironmentDiff, format: Format) -> Result<String> {
    // BTreeMap keeps output deterministic; PATH sorts in with the rest
    let mut flat: BTreeMap<&str, &str> = diff
        .vars
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    flat.insert("PATH", &diff.path);

    match format {
        Format::Plain => Ok(flat
            .iter()
            .map(|(key, value)| format!("{key}={value}\n"))
            .collect()),
        Format::Export => {
            let mut rendered = String::new();
            for (key, value) in &flat {
                let escaped = shell_escape(value)?;
                rendered.push_str(&format!("export {key}={escaped}\n"));
            }
            Ok(rendered)
        }
        Format::Json => {
            let mut json = serde_json::to_string_pretty(&flat)?;
            json.push('\n');
            Ok(json)
        }
    }
}
