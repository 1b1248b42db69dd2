// Tracing Logger
//
// Logger that forwards to `tracing` events under the `angular_linker` target.

use super::logger::{LogLevel, Logger};

pub struct TracingLogger {
    level: LogLevel,
}

impl TracingLogger {
    pub fn new(level: LogLevel) -> Self {
        Self { level }
    }
}

impl Default for TracingLogger {
    fn default() -> Self {
        Self::new(LogLevel::Debug)
    }
}

impl Logger for TracingLogger {
    fn level(&self) -> LogLevel {
        self.level
    }

    fn debug(&self, msg: &str) {
        if self.is_enabled(LogLevel::Debug) {
            tracing::debug!(target: "angular_linker", "{}", msg);
        }
    }

    fn info(&self, msg: &str) {
        if self.is_enabled(LogLevel::Info) {
            tracing::info!(target: "angular_linker", "{}", msg);
        }
    }

    fn warn(&self, msg: &str) {
        if self.is_enabled(LogLevel::Warn) {
            tracing::warn!(target: "angular_linker", "{}", msg);
        }
    }

    fn error(&self, msg: &str) {
        if self.is_enabled(LogLevel::Error) {
            tracing::error!(target: "angular_linker", "{}", msg);
        }
    }
}
