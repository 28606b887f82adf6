//! Tracing initialisation for embedders and tests

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Initialise the global tracing subscriber.
///
/// Honours `RUST_LOG` when set, otherwise falls back to the configured level
/// scoped to this crate. `format = "json"` switches to structured output for
/// log shippers. Safe to call once per process; embedders that install their
/// own subscriber should skip this.
pub fn init(config: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("villaflow={}", config.level).into());

    if config.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
