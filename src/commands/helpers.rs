//! Shared setup for commands that drive the installer

use std::path::PathBuf;
use std::time::Duration;

use crate::backend::{self, Backend};
use crate::catalog::PluginCatalog;
use crate::config::{Config, DEFAULT_CONFIG_FILE};
use crate::error::Result;
use crate::request::ToolRequest;

/// Everything a tool-driving command needs, built from the config file
pub struct Session {
    pub backend: Box<dyn Backend>,
    pub catalog: PluginCatalog,
    pub requests: Vec<ToolRequest>,
}

/// Load configuration and construct the backend and plugin catalog
pub fn open_session(config_path: Option<PathBuf>, timeout_secs: Option<u64>) -> Result<Session> {
    let path = config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let config = Config::load(&path)?;

    let backend = backend::create(
        config.backend.as_deref(),
        timeout_secs.map(Duration::from_secs),
    )?;
    let catalog = PluginCatalog::new(&config.plugins)?;
    let requests = config.requests()?;

    Ok(Session {
        backend,
        catalog,
        requests,
    })
}
