// SPDX-License-Identifier: MIT
//
// Diagnostic logging setup.
//
// Events go to stderr so they never mix with command output on stdout.
// Filtering follows `RUST_LOG` when set:
// - `RUST_LOG=debug` - every executed, undone, and redone command
// - `RUST_LOG=quill_core::buffer=trace` - individual buffer mutations
// - `RUST_LOG=quill_core::history=debug` - history only
//
// Without `RUST_LOG` the `--log-level` flag decides, defaulting to `warn`.

use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Directive used when neither `RUST_LOG` nor `--log-level` is given.
pub const DEFAULT_LEVEL: &str = "warn";

/// Build the filter: `RUST_LOG` first, then `fallback`, then [`DEFAULT_LEVEL`].
#[must_use]
pub fn filter(fallback: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback.unwrap_or(DEFAULT_LEVEL)))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
}

/// Install the global subscriber. Safe to call once per process; a second
/// call is ignored.
pub fn init(level: Option<&str>) {
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true);

    let _ = tracing_subscriber::registry()
        .with(layer.with_filter(filter(level)))
        .try_init();
}
