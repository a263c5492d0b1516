//! Subprocess execution for the build pipeline

pub mod command_executor;

pub use command_executor::*;
