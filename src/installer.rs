//! Tool installation orchestration
//!
//! Runs the per-tool pipeline: ensure plugin, list installed versions,
//! resolve, install if missing, post-install fixups. Tools are installed
//! strictly sequentially in declaration order; the only cross-tool state is
//! the caller-owned result list.
//!
//! Listing released versions is the expensive call (network-bound), so a
//! request whose version exactly matches an installed one never triggers
//! it. A resolution miss is retried exactly once after asking the backend
//! to refresh the plugin's metadata, which recovers from stale release
//! lists.

use crate::activate::Activation;
use crate::backend::Backend;
use crate::catalog::PluginCatalog;
use crate::error::{NoMatchingVersion, Result, ToolenvError};
use crate::request::{ResolutionStrategy, ToolRequest};
use crate::resolve::{VersionResolution, resolve};

/// Outcome of installing one tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInstallResult {
    /// Canonical tool id
    pub tool: String,
    /// Concrete installed version
    pub version: String,
    /// Whether the version was already installed before this run
    pub already_installed: bool,
}

/// Installer for a set of declared tools
pub struct ToolInstaller<'a> {
    backend: &'a dyn Backend,
    catalog: &'a PluginCatalog,
}

impl<'a> ToolInstaller<'a> {
    pub fn new(backend: &'a dyn Backend, catalog: &'a PluginCatalog) -> Self {
        Self { backend, catalog }
    }

    /// Install all requests sequentially, in declaration order
    pub fn install_all(&self, requests: &[ToolRequest]) -> Result<Vec<ToolInstallResult>> {
        let mut results = Vec::with_capacity(requests.len());
        for request in requests {
            results.push(self.install(request)?);
        }
        Ok(results)
    }

    /// Install one tool
    pub fn install(&self, request: &ToolRequest) -> Result<ToolInstallResult> {
        let source = self.catalog.resolve(request)?;
        self.backend.ensure_plugin(&source)?;

        let installed = self.backend.installed_versions(&request.tool)?;
        let requested = request.version.trim();

        // An exact installed match needs no released-version fetch at all,
        // whatever the strategy. The bare ""/"latest"/"installed" literals
        // are excluded only while still Strict, where the engine
        // reinterprets them as absolute-latest requests.
        let reinterpreted = request.strategy == ResolutionStrategy::Strict
            && matches!(requested, "" | "latest" | "installed");
        if !reinterpreted && installed.iter().any(|v| v == requested) {
            return Ok(ToolInstallResult {
                tool: request.tool.clone(),
                version: requested.to_string(),
                already_installed: true,
            });
        }

        let released = self.backend.released_versions(&request.tool)?;
        if installed.is_empty() && released.is_empty() {
            return Err(NoMatchingVersion {
                tool: request.tool.clone(),
                requested: requested.to_string(),
                available: Vec::new(),
            }
            .into());
        }

        let resolution = self.resolve_with_retry(request, &source.name, &installed, released)?;

        if resolution.installed {
            return Ok(ToolInstallResult {
                tool: request.tool.clone(),
                version: resolution.version,
                already_installed: true,
            });
        }

        if let Err(err) = self.backend.install(&request.tool, &resolution.version) {
            return Err(ToolenvError::ToolInstall {
                tool: request.tool.clone(),
                version: resolution.version,
                cause: "backend install command failed".to_string(),
                recommendation: None,
                output: err.raw_output().map(str::to_string),
            });
        }

        self.backend.post_install(&request.tool, &resolution.version)?;

        Ok(ToolInstallResult {
            tool: request.tool.clone(),
            version: resolution.version,
            already_installed: false,
        })
    }

    /// Resolve, retrying exactly once after a plugin metadata refresh
    fn resolve_with_retry(
        &self,
        request: &ToolRequest,
        plugin: &str,
        installed: &[String],
        released: Vec<String>,
    ) -> Result<VersionResolution> {
        match resolve(request, installed, &released) {
            Ok(resolution) => Ok(resolution),
            Err(_stale_miss) => {
                self.backend
                    .update_plugin(plugin)
                    .map_err(|e| e.in_context(&request.tool, "plugin update"))?;
                let refreshed = self.backend.released_versions(&request.tool)?;

                resolve(request, installed, &refreshed).map_err(|no_match| {
                    let requested = request.version.trim();
                    ToolenvError::ToolInstall {
                        tool: request.tool.clone(),
                        version: request.version.clone(),
                        cause: no_match.to_string(),
                        recommendation: Some(format!(
                            "Use '{requested}:installed' to match the newest installed \
                             version, or '{requested}:latest' to match the newest release"
                        )),
                        output: None,
                    }
                })
            }
        }
    }

    /// Environment contribution for one install result
    pub fn activation(&self, result: &ToolInstallResult) -> Activation {
        self.backend.activation(&result.tool, &result.version)
    }
}
