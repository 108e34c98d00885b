//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once at startup
//! - Resolve the log filter from the environment or the configured level
//!
//! # Design Decisions
//! - `RUST_LOG` wins over the configured level when set
//! - A bare level such as `info` is scoped to this crate and tower_http

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build the filter for a configured level.
///
/// A directive containing `=` or `,` is used verbatim; a bare level applies
/// to this crate and to the HTTP trace layer.
pub fn filter_for(level: &str) -> Result<EnvFilter, tracing_subscriber::filter::ParseError> {
    if level.contains('=') || level.contains(',') {
        EnvFilter::try_new(level)
    } else {
        EnvFilter::try_new(format!("cors_relay={level},tower_http={level}"))
    }
}

/// Install the global subscriber.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| filter_for(level))
        .unwrap_or_else(|_| EnvFilter::new("cors_relay=info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
