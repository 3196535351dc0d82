//! Common test utilities for toolenv integration tests
//!
//! Builds a throwaway workspace containing a `toolenv.yaml` and a fake
//! `asdf` shell script placed first on `PATH`. The fake backend keeps its
//! plugin and version state in plain files under the workspace, so tests
//! can seed released/installed lists and inspect which backend commands
//! actually ran.

use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

/// The fake asdf backend; state lives under `$TOOLENV_TEST_STATE`
const FAKE_ASDF: &str = r#"#!/usr/bin/env bash
set -eu
state="${TOOLENV_TEST_STATE:?}"
echo "$*" >> "$state/calls"
if [ -f "$state/slow" ]; then
  sleep 5
fi
cmd="${1:-}"; shift || true
case "$cmd" in
  --version)
    echo "v0.14.1"
    ;;
  plugin)
    sub="${1:-}"; shift || true
    case "$sub" in
      list)
        if [ -s "$state/plugins" ]; then
          cat "$state/plugins"
        else
          echo "No plugins installed"
        fi
        ;;
      add)
        echo "$1 ${2:-}" >> "$state/plugins"
        ;;
      update)
        if [ -f "$state/released-$1.updated" ]; then
          mv "$state/released-$1.updated" "$state/released-$1"
        fi
        ;;
    esac
    ;;
  list)
    if [ "${1:-}" = "all" ]; then
      tool="$2"
      if [ -f "$state/released-$tool" ]; then
        cat "$state/released-$tool"
      fi
    else
      tool="$1"
      if ! grep -q "^$tool " "$state/plugins" 2>/dev/null; then
        echo "No such plugin: $tool" >&2
        exit 1
      fi
      if [ -s "$state/installed-$tool" ]; then
        cat "$state/installed-$tool"
      else
        echo "No versions installed"
      fi
    fi
    ;;
  install)
    tool="$1"; version="$2"
    if [ -f "$state/fail-install" ]; then
      echo "Download failed: checksum mismatch for $tool $version" >&2
      exit 1
    fi
    echo "$version" >> "$state/installed-$tool"
    ;;
  *)
    echo "unknown command: $cmd" >&2
    exit 1
    ;;
esac
"#;

/// A test workspace with a seeded fake backend
#[allow(dead_code)]
pub struct TestWorkspace {
    /// Temporary directory
    pub temp: TempDir,
    /// Path to workspace root
    pub path: PathBuf,
    /// Fake backend state directory
    pub state: PathBuf,
}

#[allow(dead_code)]
impl TestWorkspace {
    /// Create a new test workspace with the fake asdf on PATH
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        let state = path.join("state");

        std::fs::create_dir_all(&state).expect("Failed to create state directory");
        std::fs::create_dir_all(path.join("bin")).expect("Failed to create bin directory");
        std::fs::create_dir_all(path.join("asdf")).expect("Failed to create asdf directory");
        std::fs::create_dir_all(path.join("asdf-data"))
            .expect("Failed to create asdf data directory");

        let script = path.join("bin").join("asdf");
        std::fs::write(&script, FAKE_ASDF).expect("Failed to write fake asdf");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755))
                .expect("Failed to mark fake asdf executable");
        }

        Self { temp, path, state }
    }

    /// Write the workspace `toolenv.yaml`
    pub fn write_config(&self, content: &str) {
        std::fs::write(self.path.join("toolenv.yaml"), content)
            .expect("Failed to write config file");
    }

    /// Seed the released version list for a tool
    pub fn set_released(&self, tool: &str, versions: &[&str]) {
        self.write_state(&format!("released-{tool}"), versions);
    }

    /// Seed the released list that takes effect after `plugin update`
    pub fn set_released_after_update(&self, tool: &str, versions: &[&str]) {
        self.write_state(&format!("released-{tool}.updated"), versions);
    }

    /// Seed the installed version list for a tool
    pub fn set_installed(&self, tool: &str, versions: &[&str]) {
        self.write_state(&format!("installed-{tool}"), versions);
    }

    /// Pre-register a backend plugin
    pub fn add_plugin(&self, name: &str, url: &str) {
        let line = format!("{name} {url}\n");
        let path = self.state.join("plugins");
        let mut existing = std::fs::read_to_string(&path).unwrap_or_default();
        existing.push_str(&line);
        std::fs::write(&path, existing).expect("Failed to register plugin");
    }

    /// Make every subsequent `asdf install` fail
    pub fn fail_installs(&self) {
        std::fs::write(self.state.join("fail-install"), "").expect("Failed to arm failure");
    }

    /// Make every backend call sleep long enough to trip a short timeout
    pub fn slow_backend(&self) {
        std::fs::write(self.state.join("slow"), "").expect("Failed to arm slowness");
    }

    /// Every backend invocation so far, one argv per line
    pub fn backend_calls(&self) -> String {
        std::fs::read_to_string(self.state.join("calls")).unwrap_or_default()
    }

    /// Versions the fake backend currently has installed for a tool
    pub fn installed_versions(&self, tool: &str) -> Vec<String> {
        std::fs::read_to_string(self.state.join(format!("installed-{tool}")))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// A toolenv command wired to this workspace and its fake backend
    pub fn cmd(&self) -> Command {
        let bin = self.path.join("bin");
        let inherited_path = std::env::var("PATH").unwrap_or_default();

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_toolenv"));
        cmd.current_dir(&self.path)
            .env("PATH", format!("{}:{inherited_path}", bin.display()))
            .env("TOOLENV_TEST_STATE", &self.state)
            .env("ASDF_DIR", self.path.join("asdf"))
            .env("ASDF_DATA_DIR", self.path.join("asdf-data"))
            .env("HOME", &self.path);
        cmd
    }

    fn write_state(&self, file: &str, versions: &[&str]) {
        let mut content = versions.join("\n");
        content.push('\n');
        std::fs::write(self.state.join(file), content).expect("Failed to seed backend state");
    }
}
