//! Filesystem materialization of generated artifacts

pub mod filesystem;

pub use filesystem::*;
