//! Version-manager backends
//!
//! A backend is the external program that performs actual plugin management,
//! downloads and installs. The resolution engine never talks to a backend
//! directly; it is parameterized only by the installed/released version
//! lists a backend produces.
//!
//! The reference backend is asdf. A second backend must satisfy the same
//! [`Backend`] contract but its internals are unspecified.

pub mod asdf;

use std::time::Duration;

use crate::activate::Activation;
use crate::catalog::PluginSource;
use crate::error::{Result, ToolenvError};
use crate::execenv::CommandOutput;

pub use asdf::AsdfBackend;

/// Capability contract every version-manager backend satisfies
pub trait Backend {
    /// Backend selector name
    fn name(&self) -> &'static str;

    /// Verify the backend program is usable before any tool work starts
    fn bootstrap(&self) -> Result<()>;

    /// Install the plugin if missing; idempotent. An already-installed
    /// plugin with a different source URL warns, never fails.
    fn ensure_plugin(&self, source: &PluginSource) -> Result<()>;

    /// Refresh the plugin's own metadata (release lists)
    fn update_plugin(&self, plugin: &str) -> Result<()>;

    /// Versions currently installed for a tool; zero versions is an empty
    /// list, only a missing plugin is an error
    fn installed_versions(&self, tool: &str) -> Result<Vec<String>>;

    /// All released versions for a tool (the expensive, network-bound call)
    fn released_versions(&self, tool: &str) -> Result<Vec<String>>;

    /// Install one exact version
    fn install(&self, tool: &str, version: &str) -> Result<CommandOutput>;

    /// Tool-specific fixups after a fresh install (e.g. re-enabling a
    /// bundled package manager); tolerated on failure
    fn post_install(&self, tool: &str, version: &str) -> Result<()>;

    /// Env var and PATH contributions making an installed version active
    fn activation(&self, tool: &str, version: &str) -> Activation;
}

/// Create a backend by selector name; `asdf` is the default
pub fn create(selector: Option<&str>, timeout: Option<Duration>) -> Result<Box<dyn Backend>> {
    match selector.unwrap_or(AsdfBackend::NAME) {
        AsdfBackend::NAME => Ok(Box::new(AsdfBackend::from_env(timeout)?)),
        other => Err(ToolenvError::UnknownBackend {
            name: other.to_string(),
        }),
    }
}
