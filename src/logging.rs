//! Logging and tracing setup.
//!
//! Library code only emits `tracing` events. Binaries and tests call one of
//! the init functions here to install a subscriber; the filter defaults to
//! `info` and follows `RUST_LOG` when set.

use std::sync::Once;
use tracing::info;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

static INIT: Once = Once::new();

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize the global tracing subscriber with human-readable output.
///
/// Subsequent calls (of either init function) are ignored. A subscriber
/// installed elsewhere first is left in place.
pub fn init_tracing() {
    INIT.call_once(|| {
        let fmt_layer = fmt::layer()
            .with_span_events(FmtSpan::CLOSE)
            .with_target(true)
            .with_file(true)
            .with_line_number(true);

        if tracing_subscriber::registry()
            .with(env_filter())
            .with(fmt_layer)
            .try_init()
            .is_ok()
        {
            info!("image-bytemap tracing initialized");
        }
    });
}

/// Initialize tracing with JSON output for structured logging.
pub fn init_tracing_json() {
    INIT.call_once(|| {
        let fmt_layer = fmt::layer()
            .json()
            .with_span_events(FmtSpan::CLOSE)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_current_span(true);

        if tracing_subscriber::registry()
            .with(env_filter())
            .with(fmt_layer)
            .try_init()
            .is_ok()
        {
            info!("image-bytemap tracing initialized (JSON mode)");
        }
    });
}

/// Macro for creating spans around image operations
#[macro_export]
macro_rules! span_trace {
    ($name:expr) => {
        tracing::info_span!($name)
    };
    ($name:expr, $($field:tt)*) => {
        tracing::info_span!($name, $($field)*)
    };
}

/// Log an error and hand it back, for use in `map_err` chains.
#[macro_export]
macro_rules! log_error {
    ($err:expr) => {{
        let e = $err;
        tracing::error!(error = %e, "Operation failed");
        e
    }};
    ($err:expr, $msg:expr) => {{
        let e = $err;
        tracing::error!(error = %e, message = $msg, "Operation failed");
        e
    }};
}
