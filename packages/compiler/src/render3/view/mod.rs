//! Render3 View Module
//!
//! Directive and component definition compilation.

pub mod api;
pub mod compiler;
pub mod query_generation;
pub mod util;

// Re-exports
pub use api::*;
pub use compiler::*;
pub use query_generation::*;
