//! Logging Module
//!
//! Leveled loggers shared by the linker and the `ng-link` binary.

pub mod src;

pub use src::logger::{LogLevel, Logger, NullLogger};
pub use src::tracing_logger::TracingLogger;
