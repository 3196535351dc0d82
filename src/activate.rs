//! Environment activation and composition
//!
//! Each installed tool contributes an [`Activation`]: env var assignments
//! plus ordered PATH entries. Composing N activations folds the vars with
//! last-writer-wins semantics and prepends all PATH contributions onto the
//! current PATH, deduplicated so a path string never appears twice.

use std::collections::HashMap;

/// Environment contribution of one activated tool
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Activation {
    /// Env var assignments
    pub vars: HashMap<String, String>,
    /// PATH entries, in contribution order
    pub paths: Vec<String>,
}

/// A composed, flat environment diff ready for serialization
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentDiff {
    /// Final env var map (PATH excluded)
    pub vars: HashMap<String, String>,
    /// Final PATH value
    pub path: String,
}

/// Compose activations over the current PATH value
///
/// Later activations overwrite earlier same-named vars. All non-empty PATH
/// contributions are collected in order and prepended onto `current_path`;
/// an entry that is both newly contributed and already present keeps only
/// its new, prepended position, and empty segments are dropped.
pub fn compose(activations: &[Activation], current_path: &str) -> EnvironmentDiff {
    let mut vars = HashMap::new();
    let mut contributed: Vec<String> = Vec::new();

    for activation in activations {
        for (key, value) in &activation.vars {
            vars.insert(key.clone(), value.clone());
        }
        for path in &activation.paths {
            if !path.is_empty() {
                contributed.push(path.clone());
            }
        }
    }

    // Deduplicate contributions keeping the most recent occurrence's position
    let mut segments: Vec<String> = Vec::new();
    for segment in contributed.iter().rev() {
        if !segments.contains(segment) {
            segments.push(segment.clone());
        }
    }
    segments.reverse();

    for segment in current_path.split(':') {
        if segment.is_empty() {
            continue;
        }
        if !segments.iter().any(|s| s == segment) {
            segments.push(segment.to_string());
        }
    }

    EnvironmentDiff {
        vars,
        path: segments.join(":"),
    }
}
