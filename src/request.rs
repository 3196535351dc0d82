//! Tool requests and version spec parsing
//!
//! A declared tool is a canonical id plus a version spec string. The spec
//! grammar is `<version>`, `<version>:latest` or `<version>:installed`;
//! `<version>` may itself be empty or the literal `latest`/`installed`,
//! which the resolution engine reinterprets later.

use crate::error::Result;

/// Known tool id aliases, canonicalized before any catalog lookup
const ALIASES: &[(&str, &str)] = &[
    ("go", "golang"),
    ("node", "nodejs"),
    ("golang-ci", "golangci-lint"),
];

/// Policy for resolving a partial or ambiguous version request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStrategy {
    /// The requested string must match a released version exactly
    Strict,
    /// Newest installed version matching the request, falling back to released
    LatestInstalled,
    /// Newest released version matching the request
    LatestReleased,
}

/// One declared tool: canonical id, unparsed version, strategy, optional
/// plugin override string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolRequest {
    /// Canonical tool id (aliases already applied)
    pub tool: String,
    /// Version string with any `:latest`/`:installed` suffix stripped
    pub version: String,
    /// Strategy derived from the spec suffix
    pub strategy: ResolutionStrategy,
    /// Raw plugin override from configuration, if declared
    pub plugin_override: Option<String>,
}

impl ToolRequest {
    /// Build a request from a declared tool id and version spec
    pub fn new(tool: &str, version_spec: &str, plugin_override: Option<String>) -> Result<Self> {
        let (version, strategy) = parse_version_spec(version_spec);
        Ok(Self {
            tool: canonical_tool_id(tool),
            version,
            strategy,
            plugin_override,
        })
    }
}

/// Canonicalize a tool id through the alias map
pub fn canonical_tool_id(tool: &str) -> String {
    let tool = tool.trim();
    for (alias, canonical) in ALIASES {
        if tool == *alias {
            return (*canonical).to_string();
        }
    }
    tool.to_string()
}

/// Split a raw version spec into (plain version, strategy)
///
/// Only the `:latest` and `:installed` suffixes are syntactic; a bare
/// `latest`, `installed` or empty string passes through as Strict and is
/// reinterpreted by the resolution engine.
pub fn parse_version_spec(spec: &str) -> (String, ResolutionStrategy) {
    if let Some(prefix) = spec.strip_suffix(":latest") {
        return (prefix.to_string(), ResolutionStrategy::LatestReleased);
    }
    if let Some(prefix) = spec.strip_suffix(":installed") {
        return (prefix.to_string(), ResolutionStrategy::LatestInstalled);
    }
    (spec.to_string(), ResolutionStrategy::Strict)
}
