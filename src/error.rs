//! Error types and handling for toolenv
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Every error carries enough context (tool id, requested version, backend
//! output) for the CLI to render a structured block: cause, recommendation,
//! and raw output are all independently accessible.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for toolenv operations
#[derive(Error, Diagnostic, Debug)]
pub enum ToolenvError {
    // Override grammar errors
    #[error("Invalid plugin override for '{tool}': {input}")]
    #[diagnostic(
        code(toolenv::plugin::override_invalid),
        help("Valid forms: <pluginName> or <pluginName>::<sourceURL>")
    )]
    PluginOverrideInvalid { tool: String, input: String },

    // Plugin resolution errors
    #[error("No plugin source found for tool '{tool}'")]
    #[diagnostic(
        code(toolenv::plugin::unresolved),
        help(
            "Tool is not in the vetted plugin catalog. Declare an explicit plugin \
             override as <pluginName>::<sourceURL> in the plugins section."
        )
    )]
    PluginUnresolved { tool: String },

    #[error("Plugin '{plugin}' is not installed")]
    #[diagnostic(code(toolenv::plugin::not_installed))]
    PluginNotInstalled { plugin: String },

    // Version resolution errors
    #[error(transparent)]
    #[diagnostic(transparent)]
    NoMatchingVersion(#[from] NoMatchingVersion),

    // Install errors
    #[error("Failed to install {tool} {version}: {cause}")]
    #[diagnostic(code(toolenv::install::failed))]
    ToolInstall {
        tool: String,
        version: String,
        cause: String,
        #[help]
        recommendation: Option<String>,
        output: Option<String>,
    },

    // Backend subprocess errors
    #[error("Command failed: {command}")]
    #[diagnostic(code(toolenv::exec::command_failed))]
    CommandFailed { command: String, output: String },

    #[error("Command timed out after {seconds}s: {command}")]
    #[diagnostic(code(toolenv::exec::timed_out))]
    CommandTimedOut {
        command: String,
        seconds: u64,
        output: String,
    },

    #[error("Failed to escape shell argument: {argument}")]
    #[diagnostic(code(toolenv::exec::escape_failed))]
    ShellEscapeFailed { argument: String },

    // CLI errors
    #[error("Unknown shell: {name}")]
    #[diagnostic(
        code(toolenv::cli::unknown_shell),
        help("Supported shells: bash, elvish, fish, powershell, zsh")
    )]
    UnknownShell { name: String },

    // Backend selection errors
    #[error("Unknown backend: {name}")]
    #[diagnostic(
        code(toolenv::backend::unknown),
        help("Supported backends: asdf")
    )]
    UnknownBackend { name: String },

    // Configuration errors
    #[error("Configuration file not found: {path}")]
    #[diagnostic(
        code(toolenv::config::not_found),
        help("Create a toolenv.yaml with a tools section, or pass --config")
    )]
    ConfigNotFound { path: String },

    #[error("Failed to parse configuration file: {path}")]
    #[diagnostic(code(toolenv::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(toolenv::config::invalid))]
    ConfigInvalid { message: String },

    // File system errors
    #[error("IO error: {message}")]
    #[diagnostic(code(toolenv::fs::io_error))]
    IoError { message: String },
}

impl ToolenvError {
    /// Wrap an error with the tool id and operation it occurred in
    pub fn in_context(self, tool: &str, operation: &str) -> ToolenvError {
        match self {
            ToolenvError::CommandFailed { command, output } => ToolenvError::ToolInstall {
                tool: tool.to_string(),
                version: String::new(),
                cause: format!("{operation}: command failed: {command}"),
                recommendation: None,
                output: Some(output),
            },
            other => other,
        }
    }

    /// Raw backend output attached to this error, if any
    pub fn raw_output(&self) -> Option<&str> {
        match self {
            ToolenvError::ToolInstall { output, .. } => output.as_deref(),
            ToolenvError::CommandFailed { output, .. }
            | ToolenvError::CommandTimedOut { output, .. } => Some(output),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ToolenvError {
    fn from(err: std::io::Error) -> Self {
        ToolenvError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for ToolenvError {
    fn from(err: serde_yaml::Error) -> Self {
        ToolenvError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ToolenvError {
    fn from(err: serde_json::Error) -> Self {
        ToolenvError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

/// No version matched the request after scanning installed and released lists.
///
/// Keeps the requested string and the full candidate list so the message can
/// point at versions sharing the requested string as a literal prefix.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
#[diagnostic(code(toolenv::resolve::no_matching_version))]
pub struct NoMatchingVersion {
    /// Tool the request was for
    pub tool: String,
    /// Version string as requested (after suffix stripping)
    pub requested: String,
    /// Versions that were available when resolution failed
    pub available: Vec<String>,
}

impl NoMatchingVersion {
    /// Versions from `available` that share `requested` as a literal prefix
    pub fn similar(&self) -> Vec<&str> {
        self.available
            .iter()
            .filter(|v| v.starts_with(&self.requested))
            .map(String::as_str)
            .collect()
    }
}

impl std::fmt::Display for NoMatchingVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "No matching version for {} '{}'",
            self.tool, self.requested
        )?;

        if self.available.is_empty() {
            return Ok(());
        }

        let similar = self.similar();
        if !similar.is_empty() {
            write!(f, " (similar versions: {})", similar.join(", "))?;
        }

        Ok(())
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, ToolenvError>;
