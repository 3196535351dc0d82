//! toolenv - declarative tool version manager
//!
//! Resolves a declarative "tool + version" list (e.g. `nodejs 20:latest`)
//! into concrete installed runtimes through a version-manager backend, and
//! emits the environment changes needed to make them active.

use clap::Parser;

mod activate;
mod backend;
mod catalog;
mod cli;
mod commands;
mod config;
mod error;
mod execenv;
mod installer;
mod output;
mod progress;
mod request;
mod resolve;

use cli::{Cli, Commands};
use console::style;
use error::ToolenvError;
use miette::Diagnostic;

/// Render an error as a structured block: cause, recommendation, raw output
fn render_error(err: &ToolenvError) {
    eprintln!("{} {}", style("Error:").red().bold(), err);

    if let Some(help) = err.help() {
        eprintln!("{} {}", style("Recommendation:").yellow().bold(), help);
    }

    if let Some(output) = err.raw_output() {
        let output = output.trim_end();
        if !output.is_empty() {
            eprintln!("{}", style("Backend output:").dim());
            for line in output.lines() {
                eprintln!("  {line}");
            }
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Install(args) => commands::install::run(cli.config, args),
        Commands::Env(args) => commands::env::run(cli.config, args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        render_error(&e);
        std::process::exit(1);
    }
}
