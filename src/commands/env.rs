//! Env command implementation
//!
//! Installs declared tools (idempotently), then composes every tool's
//! environment contribution into one diff and prints it. All diagnostics go
//! to stderr so stdout stays `eval`-safe.

use std::path::PathBuf;

use crate::activate::compose;
use crate::cli::EnvArgs;
use crate::commands::helpers::open_session;
use crate::error::Result;
use crate::installer::ToolInstaller;
use crate::output::render;

/// Run env command
pub fn run(config: Option<PathBuf>, args: EnvArgs) -> Result<()> {
    let session = open_session(config, args.timeout)?;
    session.backend.bootstrap()?;

    let installer = ToolInstaller::new(session.backend.as_ref(), &session.catalog);
    let results = installer.install_all(&session.requests)?;

    let activations: Vec<_> = results
        .iter()
        .map(|result| installer.activation(result))
        .collect();

    let current_path = std::env::var("PATH").unwrap_or_default();
    let diff = compose(&activations, &current_path);

    print!("{}", render(&diff, args.format)?);
    Ok(())
}
