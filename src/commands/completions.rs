//! Shell completions command

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::{Cli, CompletionsArgs};
use crate::error::{Result, ToolenvError};

/// Generate shell completions on stdout
pub fn run(args: CompletionsArgs) -> Result<()> {
    let shell = parse_shell(&args.shell)?;
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "toolenv", &mut std::io::stdout().lock());
    Ok(())
}

/// Map a shell name, case-insensitively, to a completion target
fn parse_shell(name: &str) -> Result<Shell> {
    match name.to_lowercase().as_str() {
        "bash" => Ok(Shell::Bash),
        "elvish" => Ok(Shell::Elvish),
        "fish" => Ok(Shell::Fish),
        "powershell" | "pwsh" => Ok(Shell::PowerShell),
        "zsh" => Ok(Shell::Zsh),
        _ => Err(ToolenvError::UnknownShell {
            name: name.to_string(),
        }),
    }
}
