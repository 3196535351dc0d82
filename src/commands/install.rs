//! Install command implementation
//!
//! Installs every tool declared in the configuration, strictly in
//! declaration order. For each tool: ensure its backend plugin, resolve the
//! requested version against installed and released lists, install what is
//! missing, and run any tool-specific post-install fixup.

use std::path::PathBuf;

use console::style;

use crate::cli::InstallArgs;
use crate::commands::helpers::open_session;
use crate::error::Result;
use crate::installer::ToolInstaller;
use crate::progress::ProgressDisplay;

/// Run install command
pub fn run(config: Option<PathBuf>, args: InstallArgs) -> Result<()> {
    let session = open_session(config, args.timeout)?;
    session.backend.bootstrap()?;

    if session.requests.is_empty() {
        println!("No tools declared, nothing to install");
        return Ok(());
    }

    let installer = ToolInstaller::new(session.backend.as_ref(), &session.catalog);
    let progress = ProgressDisplay::new(session.requests.len() as u64);

    let mut installed = 0usize;
    let mut reused = 0usize;

    for request in &session.requests {
        progress.update_tool(&request.tool, &request.version);

        let result = match installer.install(request) {
            Ok(result) => result,
            Err(err) => {
                progress.abandon();
                return Err(err);
            }
        };

        if result.already_installed {
            reused += 1;
        } else {
            installed += 1;
        }
        progress.inc_tool();
    }

    progress.finish();
    println!(
        "{} {} tool(s) installed, {} already present",
        style("Done:").green().bold(),
        installed,
        reused
    );

    Ok(())
}
