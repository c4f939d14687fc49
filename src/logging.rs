//! Tracing setup
//!
//! Logs go to stderr so report output on stdout stays machine-readable.
//! `RUST_LOG` takes precedence over the configured filter.

use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

static TRACING_INIT: Once = Once::new();

/// Default filter when neither `RUST_LOG` nor settings provide one
pub const DEFAULT_LOG_FILTER: &str = "family_funds=warn";

/// Filter directive for a configured base filter raised by `-v` flags
pub fn filter_directive(base: &str, verbosity: u8) -> String {
    let base = if base.trim().is_empty() {
        DEFAULT_LOG_FILTER
    } else {
        base.trim()
    };
    match verbosity {
        0 => base.to_string(),
        1 => format!("{},family_funds=info", base),
        _ => format!("{},family_funds=debug", base),
    }
}

/// Initialize the global subscriber once
pub fn init_tracing(base_filter: &str, verbosity: u8) {
    TRACING_INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(filter_directive(base_filter, verbosity)));

        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    });
}
