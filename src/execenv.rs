//! Isolated subprocess execution for backend commands
//!
//! Every backend call goes through [`ExecEnv::run`]: the command token list
//! is escaped, concatenated after the backend's shell-init snippet, and run
//! in a `bash -c` subshell with a controlled environment. Combined
//! stdout+stderr is always captured and travels with any error.
//!
//! Shell strings are only ever built here, through [`shell_escape`].

use std::collections::HashMap;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use crate::error::{Result, ToolenvError};

/// Poll interval for the timeout wait loop
const WAIT_POLL: Duration = Duration::from_millis(50);

/// Output of a completed backend command
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Combined stdout and stderr, stdout first
    pub combined: String,
}

impl CommandOutput {
    /// Trimmed non-empty output lines
    pub fn lines(&self) -> Vec<String> {
        self.combined
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Read-only subprocess configuration shared by all backend calls
#[derive(Debug, Clone, Default)]
pub struct ExecEnv {
    /// Environment variable overrides applied to every command
    pub vars: HashMap<String, String>,
    /// Whether the parent process environment is inherited
    pub inherit: bool,
    /// Shell snippet sourced before the command (backend initialization)
    pub init_script: Option<String>,
}

impl ExecEnv {
    /// An environment that inherits the parent process env
    pub fn inherited() -> Self {
        Self {
            vars: HashMap::new(),
            inherit: true,
            init_script: None,
        }
    }

    /// Set the shell snippet sourced before every command
    #[must_use]
    pub fn with_init_script(mut self, script: impl Into<String>) -> Self {
        self.init_script = Some(script.into());
        self
    }

    /// Add a persistent env var override
    #[must_use]
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    /// Run a command to completion, capturing combined output
    ///
    /// A non-zero exit becomes [`ToolenvError::CommandFailed`] carrying the
    /// captured output.
    pub fn run(&self, argv: &[&str], extra_vars: &HashMap<String, String>) -> Result<CommandOutput> {
        let script = self.build_script(argv)?;
        let mut command = self.build_command(&script, extra_vars);

        let output = command.output()?;
        let combined = combine_output(&output.stdout, &output.stderr);

        if !output.status.success() {
            return Err(ToolenvError::CommandFailed {
                command: display_argv(argv),
                output: combined,
            });
        }

        Ok(CommandOutput { combined })
    }

    /// Run a command with a deadline
    ///
    /// Expiry kills the subshell and returns the distinct
    /// [`ToolenvError::CommandTimedOut`] kind, never a generic failure. The
    /// output captured up to that point travels with the error.
    pub fn run_with_timeout(
        &self,
        argv: &[&str],
        extra_vars: &HashMap<String, String>,
        timeout: Duration,
    ) -> Result<CommandOutput> {
        let script = self.build_script(argv)?;
        let mut command = self.build_command(&script, extra_vars);
        command.stdout(Stdio::piped()).stderr(Stdio::piped());

        let mut child = command.spawn()?;
        let stdout_reader = child.stdout.take().map(drain_in_background);
        let stderr_reader = child.stderr.take().map(drain_in_background);
        let start = Instant::now();

        loop {
            match child.try_wait()? {
                Some(status) => {
                    let stdout = collect_drained(stdout_reader);
                    let stderr = collect_drained(stderr_reader);
                    let combined = combine_output(&stdout, &stderr);
                    if !status.success() {
                        return Err(ToolenvError::CommandFailed {
                            command: display_argv(argv),
                            output: combined,
                        });
                    }
                    return Ok(CommandOutput { combined });
                }
                None => {
                    if start.elapsed() > timeout {
                        let _ = child.kill();
                        let _ = child.wait();
                        // Whatever the command managed to print before the
                        // deadline travels with the error
                        let stdout = collect_drained(stdout_reader);
                        let stderr = collect_drained(stderr_reader);
                        return Err(ToolenvError::CommandTimedOut {
                            command: display_argv(argv),
                            seconds: timeout.as_secs(),
                            output: combine_output(&stdout, &stderr),
                        });
                    }
                    std::thread::sleep(WAIT_POLL);
                }
            }
        }
    }

    /// Build the subshell script: sourced init, then the escaped command
    fn build_script(&self, argv: &[&str]) -> Result<String> {
        let escaped: Vec<String> = argv
            .iter()
            .map(|arg| shell_escape(arg))
            .collect::<Result<_>>()?;
        let command = escaped.join(" ");

        Ok(match &self.init_script {
            Some(init) => format!("{init}\n{command}"),
            None => command,
        })
    }

    fn build_command(&self, script: &str, extra_vars: &HashMap<String, String>) -> Command {
        let mut command = Command::new("bash");
        command.arg("-c").arg(script);

        if !self.inherit {
            command.env_clear();
            // A cleared environment still needs the basics to exec anything
            if let Ok(path) = std::env::var("PATH") {
                command.env("PATH", path);
            }
            if let Ok(home) = std::env::var("HOME") {
                command.env("HOME", home);
            }
        }

        for (key, value) in &self.vars {
            command.env(key, value);
        }
        for (key, value) in extra_vars {
            command.env(key, value);
        }

        command
    }
}

/// Escape one argument for inclusion in a shell string
///
/// The single seam through which all shell-string construction passes.
pub fn shell_escape(argument: &str) -> Result<String> {
    shlex::try_quote(argument)
        .map(|quoted| quoted.into_owned())
        .map_err(|_| ToolenvError::ShellEscapeFailed {
            argument: argument.to_string(),
        })
}

/// Drain a child pipe on its own thread so a chatty subprocess never
/// blocks on a full pipe buffer while the timeout loop polls
fn drain_in_background<R: std::io::Read + Send + 'static>(
    mut reader: R,
) -> std::thread::JoinHandle<Vec<u8>> {
    std::thread::spawn(move || {
        let mut buffer = Vec::new();
        let _ = reader.read_to_end(&mut buffer);
        buffer
    })
}

fn collect_drained(handle: Option<std::thread::JoinHandle<Vec<u8>>>) -> Vec<u8> {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}

fn combine_output(stdout: &[u8], stderr: &[u8]) -> String {
    let mut combined = String::from_utf8_lossy(stdout).into_owned();
    let err = String::from_utf8_lossy(stderr);
    if !err.is_empty() {
        if !combined.is_empty() && !combined.ends_with('\n') {
            combined.push('\n');
        }
        combined.push_str(&err);
    }
    combined
}

fn display_argv(argv: &[&str]) -> String {
    argv.join(" ")
}
