//! Logging setup
//!
//! Library code only emits `tracing` events. Binaries and test harnesses that
//! embed the engine call [`init_tracing`] once to install a subscriber.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "info,casesync=debug";

/// Output format of the installed subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TracingFormat {
    /// Single-line human readable output.
    #[default]
    Compact,
    /// One JSON object per event, for log shippers.
    Json,
}

/// Install the global subscriber.
///
/// Returns `false` if a global subscriber was already set; the existing one
/// is left in place.
pub fn init_tracing(format: TracingFormat) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let result = match format {
        TracingFormat::Compact => Registry::default()
            .with(filter)
            .with(fmt::layer().compact().with_target(true))
            .try_init(),
        TracingFormat::Json => Registry::default()
            .with(filter)
            .with(fmt::layer().json().with_current_span(true).with_target(true))
            .try_init(),
    };

    result.is_ok()
}
