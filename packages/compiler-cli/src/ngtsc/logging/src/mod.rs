pub mod logger;
pub mod tracing_logger;
