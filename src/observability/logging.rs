//! Structured logging.
//!
//! # Responsibilities
//! - Initialize logging subsystem
//! - Pick the log filter from the environment, CLI and config
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - `RUST_LOG` wins over everything else

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directive for a configured level, raised by `-v` flags.
pub fn filter_directive(log_level: &str, verbose: u8) -> String {
    let level = match verbose {
        0 => log_level,
        1 => "debug",
        _ => "trace",
    };
    format!("gopkg={level},tower_http={level}")
}

/// Install the global subscriber.
pub fn init(log_level: &str, verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| filter_directive(log_level, verbose).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
