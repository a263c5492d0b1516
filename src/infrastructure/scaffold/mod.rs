//! Skeleton synthesis for framework projects

pub mod vue;

pub use vue::*;
