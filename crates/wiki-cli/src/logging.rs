//! Logging setup.

use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use wiki_core::LogLevel;

pub fn level_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Quiet => LevelFilter::OFF,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Verbose => LevelFilter::DEBUG,
        LogLevel::Debug => LevelFilter::TRACE,
    }
}

/// Install a stderr subscriber for this crate and `wiki_core`.
///
/// Messages are printed bare: no timestamp, target, level or color.
pub fn init(level: LogLevel) {
    let filter = level_filter(level);
    let targets = Targets::new()
        .with_target("wiki", filter)
        .with_target("wiki_core", filter);

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .with_level(false)
        .with_ansi(false)
        .with_filter(targets);

    // A subscriber may already be set when running under a test harness.
    let _ = tracing_subscriber::registry().with(layer).try_init();
}
