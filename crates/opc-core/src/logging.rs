//! Tracing setup for the command-line tools.
//!
//! Logs go to stderr so stdout stays reserved for command output.
//! `RUST_LOG` wins over the built-in filter when set.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Filter used when `RUST_LOG` is not set.
pub fn default_filter(debug: bool) -> &'static str {
    if debug {
        "warn,opc_core=debug,opc_cli=debug"
    } else {
        "warn"
    }
}

/// Installs the global subscriber. Later calls are no-ops.
pub fn init(debug: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(debug)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}
