use std::io;
use std::path::Path;
use tracing::dispatcher::DefaultGuard;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{registry, Layer};

// This is a helper struct to store the logger guards. When they are dropped, logging can be reset.
#[allow(dead_code)]
pub struct LogGuards {
    log_guard: WorkerGuard,
    default: DefaultGuard,
}

/// Plain stdout logging for tests and small tools. The returned guard resets
/// the subscriber when dropped.
pub fn init_std_out_logging_thread_local() -> DefaultGuard {
    let collector = registry().with(
        fmt::Layer::new()
            .with_writer(io::stdout)
            .with_filter(LevelFilter::INFO),
    );
    tracing::subscriber::set_default(collector)
}

/// Logging setup for simulation runs: INFO and above to stdout, everything
/// additionally as JSON lines into `log_<discriminant>.txt` in `dir`. The
/// discriminant keeps concurrently running scenarios apart.
pub fn init_logging(dir: &Path, file_discriminant: &str) -> LogGuards {
    let log_file_name = format!("log_{file_discriminant}.txt");
    let log_file_appender = rolling::never(dir, log_file_name);
    let (log_file, log_guard) = non_blocking(log_file_appender);
    let log_layer = fmt::Layer::new()
        .with_writer(log_file)
        .json()
        .with_ansi(false)
        .with_filter(LevelFilter::DEBUG);

    let console_layer = fmt::layer()
        .with_writer(io::stdout)
        .with_filter(LevelFilter::INFO);

    let collector = registry().with(log_layer).with(console_layer);
    let default = tracing::subscriber::set_default(collector);

    LogGuards { log_guard, default }
}
