//! pageforge - turn model-produced text into runnable web projects on disk
//!
//! The pipeline is: output-kind dispatch → lexical parsing of the model
//! text into discrete files → deterministic on-disk layout → (framework
//! projects only) dependency install and build via subprocess. A streaming
//! variant forwards chunks to the consumer while accumulating them, then
//! finalizes through the same pipeline once the source stream ends.

#![deny(unsafe_code)]

pub mod application;
pub mod config;
pub mod generation;
pub mod infrastructure;
