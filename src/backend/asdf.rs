//! asdf reference backend
//!
//! Drives the `asdf` version manager through isolated subshells. Honors
//! `ASDF_DIR` and `ASDF_DATA_DIR`, defaulting both under the user's home
//! directory, and sources `asdf.sh` before every command when present.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use console::style;

use crate::activate::Activation;
use crate::catalog::PluginSource;
use crate::error::{Result, ToolenvError};
use crate::execenv::{CommandOutput, ExecEnv, shell_escape};

use super::Backend;

/// Backend output marker for a plugin with zero installed versions
const NO_VERSIONS_INSTALLED: &str = "No versions installed";

/// Backend output marker for a missing plugin
const NO_SUCH_PLUGIN: &str = "No such plugin";

/// Backend output marker for an empty plugin list
const NO_PLUGINS_INSTALLED: &str = "No plugins installed";

/// The asdf version-manager backend
pub struct AsdfBackend {
    exec: ExecEnv,
    data_dir: PathBuf,
    timeout: Option<Duration>,
}

impl AsdfBackend {
    pub const NAME: &'static str = "asdf";

    /// Build from the process environment (`ASDF_DIR`, `ASDF_DATA_DIR`)
    pub fn from_env(timeout: Option<Duration>) -> Result<Self> {
        let asdf_dir = std::env::var("ASDF_DIR")
            .map(PathBuf::from)
            .ok()
            .or_else(|| dirs::home_dir().map(|home| home.join(".asdf")))
            .ok_or_else(|| ToolenvError::IoError {
                message: "cannot determine home directory for ASDF_DIR".to_string(),
            })?;
        let data_dir = std::env::var("ASDF_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| asdf_dir.clone());

        Ok(Self::new(&asdf_dir, &data_dir, timeout))
    }

    /// Build against explicit asdf directories
    pub fn new(asdf_dir: &Path, data_dir: &Path, timeout: Option<Duration>) -> Self {
        let mut exec = ExecEnv::inherited()
            .with_var("ASDF_DIR", asdf_dir.display().to_string())
            .with_var("ASDF_DATA_DIR", data_dir.display().to_string());

        // asdf <0.16 is a shell function; source its init when present
        let init = asdf_dir.join("asdf.sh");
        if init.is_file() {
            if let Ok(escaped) = shell_escape(&init.display().to_string()) {
                exec = exec.with_init_script(format!(". {escaped}"));
            }
        }

        Self {
            exec,
            data_dir: data_dir.to_path_buf(),
            timeout,
        }
    }

    fn run(&self, argv: &[&str]) -> Result<CommandOutput> {
        let extra = HashMap::new();
        match self.timeout {
            Some(timeout) => self.exec.run_with_timeout(argv, &extra, timeout),
            None => self.exec.run(argv, &extra),
        }
    }

    /// Installed plugins as (name, source url) pairs
    fn plugin_list(&self) -> Result<Vec<(String, String)>> {
        let output = match self.run(&["asdf", "plugin", "list", "--urls"]) {
            Ok(output) => output,
            Err(ToolenvError::CommandFailed { output, .. })
                if output.contains(NO_PLUGINS_INSTALLED) =>
            {
                return Ok(Vec::new());
            }
            Err(err) => return Err(err),
        };

        Ok(output
            .lines()
            .iter()
            .filter(|l| !l.contains(NO_PLUGINS_INSTALLED))
            .map(|line| {
                let mut columns = line.split_whitespace();
                let name = columns.next().unwrap_or_default().to_string();
                let url = columns.next().unwrap_or_default().to_string();
                (name, url)
            })
            .collect())
    }
}

impl Backend for AsdfBackend {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn bootstrap(&self) -> Result<()> {
        self.run(&["asdf", "--version"]).map(|_| ())
    }

    fn ensure_plugin(&self, source: &PluginSource) -> Result<()> {
        for (name, url) in self.plugin_list()? {
            if name == source.name {
                if !source.url.is_empty() && !url.is_empty() && url != source.url {
                    eprintln!(
                        "{} plugin '{}' is installed from {} (requested {})",
                        style("warning:").yellow().bold(),
                        name,
                        url,
                        source.url
                    );
                }
                return Ok(());
            }
        }

        if source.url.is_empty() {
            self.run(&["asdf", "plugin", "add", &source.name])?;
        } else {
            self.run(&["asdf", "plugin", "add", &source.name, &source.url])?;
        }
        Ok(())
    }

    fn update_plugin(&self, plugin: &str) -> Result<()> {
        self.run(&["asdf", "plugin", "update", plugin]).map(|_| ())
    }

    fn installed_versions(&self, tool: &str) -> Result<Vec<String>> {
        let output = match self.run(&["asdf", "list", tool]) {
            Ok(output) => output,
            // Some asdf versions report zero installed versions through a
            // non-zero exit; that is still an empty list, not an error
            Err(ToolenvError::CommandFailed { output, .. })
                if output.contains(NO_VERSIONS_INSTALLED) =>
            {
                return Ok(Vec::new());
            }
            Err(ToolenvError::CommandFailed { output, .. }) if output.contains(NO_SUCH_PLUGIN) => {
                return Err(ToolenvError::PluginNotInstalled {
                    plugin: tool.to_string(),
                });
            }
            Err(err) => return Err(err),
        };

        if output.combined.contains(NO_VERSIONS_INSTALLED) {
            return Ok(Vec::new());
        }

        Ok(output
            .lines()
            .iter()
            .map(|line| line.trim_start_matches('*').trim().to_string())
            .filter(|line| !line.is_empty())
            .collect())
    }

    fn released_versions(&self, tool: &str) -> Result<Vec<String>> {
        Ok(self.run(&["asdf", "list", "all", tool])?.lines())
    }

    fn install(&self, tool: &str, version: &str) -> Result<CommandOutput> {
        self.run(&["asdf", "install", tool, version])
    }

    fn post_install(&self, tool: &str, version: &str) -> Result<()> {
        // A fresh nodejs install ships corepack disabled; re-enable it so
        // yarn/pnpm shims exist. Failure is a warning, not an error.
        if tool == "nodejs" {
            let activation = self.activation(tool, version);
            let mut extra: HashMap<String, String> = activation.vars.clone();
            let current_path = std::env::var("PATH").unwrap_or_default();
            let path = crate::activate::compose(std::slice::from_ref(&activation), &current_path);
            extra.insert("PATH".to_string(), path.path);

            if let Err(err) = self.exec.run(&["corepack", "enable"], &extra) {
                eprintln!(
                    "{} could not re-enable corepack for nodejs {}: {}",
                    style("warning:").yellow().bold(),
                    version,
                    err
                );
            }
        }
        Ok(())
    }

    fn activation(&self, tool: &str, version: &str) -> Activation {
        let mut vars = HashMap::new();
        vars.insert(version_env_var(tool), version.to_string());

        let bin_dir = self
            .data_dir
            .join("installs")
            .join(tool)
            .join(version)
            .join("bin");

        Activation {
            vars,
            paths: vec![bin_dir.display().to_string()],
        }
    }
}

/// `ASDF_<TOOL>_VERSION` env var name for a tool id
fn version_env_var(tool: &str) -> String {
    let upper: String = tool
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("ASDF_{upper}_VERSION")
}
