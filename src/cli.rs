//! CLI definitions using clap derive API

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::output::Format;

/// toolenv - declarative tool version manager
///
/// Resolve declared tool versions against a version-manager backend and
/// emit the environment changes that make them active.
#[derive(Parser, Debug)]
#[command(
    name = "toolenv",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Declarative tool version resolution and environment activation",
    long_about = "toolenv reads a declarative tool list (e.g. nodejs 20:latest), resolves \
                  each entry to a concrete installed version through a version-manager \
                  backend, installs what is missing, and emits the env var and PATH \
                  changes needed to activate the result.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  toolenv install\n    \
                  toolenv env --format export\n    \
                  eval \"$(toolenv env --format export)\"\n\n\
                  \x1b[1m\x1b[32mDocumentation:\x1b[0m\n    \
                  https://github.com/asyrjasalo/toolenv"
)]
pub struct Cli {
    /// Configuration file (defaults to toolenv.yaml in the current directory)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install all declared tools
    Install(InstallArgs),

    /// Install declared tools and print the resulting environment
    Env(EnvArgs),

    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the install command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Install everything declared in toolenv.yaml:\n    toolenv install\n\n\
                  Use an alternate configuration file:\n    toolenv install -c ci/tools.yaml\n\n\
                  Bound each backend command to 120 seconds:\n    toolenv install --timeout 120")]
pub struct InstallArgs {
    /// Per-command timeout in seconds for backend calls
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,
}

/// Arguments for the env command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Print KEY=value lines:\n    toolenv env\n\n\
                  Activate in the current shell:\n    eval \"$(toolenv env --format export)\"\n\n\
                  Machine-readable output:\n    toolenv env --format json")]
pub struct EnvArgs {
    /// Output format
    #[arg(long, value_enum, default_value = "plain")]
    pub format: Format,

    /// Per-command timeout in seconds for backend calls
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,
}

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    toolenv completions --shell bash > ~/.bash_completion.d/toolenv\n\n\
                  Generate zsh completions:\n    toolenv completions --shell zsh > ~/.zfunc/_toolenv\n\n\
                  Generate fish completions:\n    toolenv completions --shell fish > ~/.config/fish/completions/toolenv.fish")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    #[arg(long)]
    pub shell: String,
}
