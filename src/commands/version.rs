//! Version command implementation

use crate::backend::AsdfBackend;
use crate::error::Result;

/// Print version and build information
pub fn run() -> Result<()> {
    println!("toolenv {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Build info:");
    println!("  Profile: {}", build_profile());
    println!("  Default backend: {}", AsdfBackend::NAME);

    Ok(())
}

fn build_profile() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_succeeds() {
        assert!(run().is_ok());
    }
}
