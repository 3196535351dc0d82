//! Plugin source resolution
//!
//! Maps a canonical tool id to a backend plugin identity: a plugin name plus
//! a source URL. Sources come from an explicit per-tool override string
//! (`name` or `name::url`) or from a static, injectable catalog of vetted
//! community plugins.

use std::collections::HashMap;

use crate::error::{Result, ToolenvError};
use crate::request::ToolRequest;

/// Separator between plugin name and source URL in an override string
const OVERRIDE_SEPARATOR: &str = "::";

/// Vetted plugin sources for well-known tools
const VETTED_SOURCES: &[(&str, &str, &str)] = &[
    (
        "nodejs",
        "nodejs",
        "https://github.com/asdf-vm/asdf-nodejs.git",
    ),
    (
        "python",
        "python",
        "https://github.com/asdf-community/asdf-python.git",
    ),
    (
        "golang",
        "golang",
        "https://github.com/asdf-community/asdf-golang.git",
    ),
    ("ruby", "ruby", "https://github.com/asdf-vm/asdf-ruby.git"),
    ("java", "java", "https://github.com/halcyon/asdf-java.git"),
    (
        "rust",
        "rust",
        "https://github.com/asdf-community/asdf-rust.git",
    ),
    (
        "terraform",
        "terraform",
        "https://github.com/asdf-community/asdf-hashicorp.git",
    ),
    (
        "kubectl",
        "kubectl",
        "https://github.com/asdf-community/asdf-kubectl.git",
    ),
    (
        "golangci-lint",
        "golangci-lint",
        "https://github.com/hypnoglow/asdf-golangci-lint.git",
    ),
];

/// A resolved backend plugin identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginSource {
    /// Plugin name as the backend knows it
    pub name: String,
    /// Source URL the plugin installs from; empty means the backend's
    /// own short-name registry is used
    pub url: String,
}

impl PluginSource {
    /// Parse an explicit override string: `name` or `name::url`
    pub fn parse_override(tool: &str, input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ToolenvError::PluginOverrideInvalid {
                tool: tool.to_string(),
                input: input.to_string(),
            });
        }

        let mut parts = input.split(OVERRIDE_SEPARATOR);
        let name = parts.next().unwrap_or_default();
        let url = parts.next().unwrap_or_default();

        // More than one separator, or an empty half around one
        if parts.next().is_some()
            || name.is_empty()
            || (input.contains(OVERRIDE_SEPARATOR) && url.is_empty())
        {
            return Err(ToolenvError::PluginOverrideInvalid {
                tool: tool.to_string(),
                input: input.to_string(),
            });
        }

        // A URL in name position means the separator was forgotten
        if name.starts_with("http://") || name.starts_with("https://") {
            return Err(ToolenvError::PluginOverrideInvalid {
                tool: tool.to_string(),
                input: input.to_string(),
            });
        }

        Ok(Self {
            name: name.to_string(),
            url: url.to_string(),
        })
    }
}

/// Immutable lookup table of plugin sources
///
/// Built once per invocation from the vetted defaults merged with any
/// per-tool overrides from configuration; configured overrides win.
#[derive(Debug, Clone)]
pub struct PluginCatalog {
    sources: HashMap<String, PluginSource>,
}

impl PluginCatalog {
    /// Build a catalog from the vetted defaults plus configured overrides
    pub fn new(overrides: &HashMap<String, String>) -> Result<Self> {
        let mut sources = HashMap::new();

        for (tool, name, url) in VETTED_SOURCES {
            sources.insert(
                (*tool).to_string(),
                PluginSource {
                    name: (*name).to_string(),
                    url: (*url).to_string(),
                },
            );
        }

        for (tool, spec) in overrides {
            sources.insert(tool.clone(), PluginSource::parse_override(tool, spec)?);
        }

        Ok(Self { sources })
    }

    /// Catalog of vetted defaults only
    pub fn vetted() -> Self {
        // Static entries cannot fail override parsing
        #[allow(clippy::expect_used)]
        Self::new(&HashMap::new()).expect("vetted catalog is well-formed")
    }

    /// Resolve the plugin source for a request
    ///
    /// A non-empty per-request override wins over the catalog; an unknown
    /// tool without an override is fatal for that tool.
    pub fn resolve(&self, request: &ToolRequest) -> Result<PluginSource> {
        if let Some(spec) = request
            .plugin_override
            .as_deref()
            .filter(|s| !s.trim().is_empty())
        {
            return PluginSource::parse_override(&request.tool, spec);
        }

        self.sources
            .get(&request.tool)
            .cloned()
            .ok_or_else(|| ToolenvError::PluginUnresolved {
                tool: request.tool.clone(),
            })
    }
}
