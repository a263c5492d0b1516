//! Best-effort building of scaffolded framework projects

pub mod node;

pub use node::*;
