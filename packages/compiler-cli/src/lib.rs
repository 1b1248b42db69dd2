#![deny(clippy::all)]

/**
 * Angular Linker - Rust Implementation
 *
 * Links the partial declarations of published Angular libraries into full definitions
 */
// Re-export compiler for convenience
pub use angular_compiler as compiler;

pub mod config;
pub mod linker;
pub mod ngtsc;

use std::sync::Once;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

static INIT_TRACING: Once = Once::new();

/// Installs the global `tracing` subscriber, filtered by `RUST_LOG` or else `default_filter`.
/// Later calls are no-ops.
pub fn init_tracing(default_filter: &str) {
    INIT_TRACING.call_once(|| {
        let filter = match std::env::var("RUST_LOG") {
            Ok(directives) if !directives.is_empty() => EnvFilter::new(directives),
            _ => EnvFilter::new(default_filter),
        };
        // Another subscriber may already be installed by the embedder.
        let _ = tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .try_init();
    });
}

/// Linker version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
