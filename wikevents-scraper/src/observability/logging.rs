use std::fs;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Sets up the global tracing subscriber: human-readable console output on
/// stderr plus daily-rotated JSON logs under `logs/`.
///
/// Stdout stays clean because the CLI writes result JSON there.
pub fn init_logging() {
    let _ = fs::create_dir_all("logs");

    let file_appender = tracing_appender::rolling::daily("logs", "wikevents.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = fmt::layer().json().with_writer(file_writer);

    let console_layer = fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    // RUST_LOG wins when set; otherwise our crate logs at debug.
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("wikevents_scraper=debug,info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    // The guard must outlive main so buffered file logs get flushed.
    std::mem::forget(guard);
}
