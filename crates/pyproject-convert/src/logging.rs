//! Diagnostic logging for the converters.
//!
//! The core emits `tracing` events; this installs a stderr subscriber whose
//! level follows the `--verbose` and `--quiet` flags.

use std::io::IsTerminal;

use tracing::level_filters::LevelFilter;

use crate::printer::Printer;

/// The most detailed level shown for the given output settings.
pub(crate) fn level_filter(printer: Printer) -> LevelFilter {
    if printer.is_quiet() {
        return LevelFilter::OFF;
    }
    match printer.verbosity() {
        0 => LevelFilter::WARN,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Install the global subscriber. A subscriber that is already installed is
/// left in place.
pub(crate) fn setup_logging(printer: Printer) {
    let result = tracing_subscriber::fmt()
        .with_max_level(level_filter(printer))
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .try_init();
    if result.is_err() {
        tracing::debug!("Logging was already initialized");
    }
}
