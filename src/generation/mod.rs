//! Generation domain module - materializes model output into projects
//!
//! This module implements the core materialization logic: parsing model
//! text into discrete files, laying them out deterministically on disk,
//! and (for framework projects) scaffolding and building a runnable
//! skeleton. Infrastructure adapters implement the ports declared in
//! [`traits`]; the [`orchestrator`] wires them into the two entry points.

pub mod errors;
pub mod orchestrator;
pub mod parser;
pub mod traits;
pub mod types;

pub use errors::*;
pub use orchestrator::*;
pub use traits::*;
pub use types::*;
