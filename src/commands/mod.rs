//! Command implementations for the toolenv CLI

pub mod completions;
pub mod env;
pub mod helpers;
pub mod install;
pub mod version;
