//! Subscriber setup for a seeding run.
//!
//! The trace goes to a plain-text log file and to stderr. The subscriber is
//! installed as the default for the calling thread only while the returned
//! [`LogGuards`] is alive.

use std::io;
use std::path::Path;

use tracing::subscriber::DefaultGuard;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Keeps the log file writer flushing and the subscriber installed.
pub struct LogGuards {
    _default: DefaultGuard,
    _worker: WorkerGuard,
}

/// Build the file + console subscriber and install it for this thread.
///
/// `filter` uses `EnvFilter` directives, e.g. `info` or `irisseed=info`.
pub fn init_logging(path_log_file: &Path, filter: &str) -> io::Result<LogGuards> {
    let build_filter = || {
        EnvFilter::try_new(filter)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))
    };
    let env_filter_file = build_filter()?;
    let env_filter_console = build_filter()?;

    let path_dir_log = match path_log_file.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let c_file_name = path_log_file
        .file_name()
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("log file has no file name: {}", path_log_file.display()),
            )
        })?
        .to_string_lossy()
        .to_string();

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(c_file_name)
        .build(path_dir_log)
        .map_err(io::Error::other)?;
    let (file_writer, worker_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_filter(env_filter_file);
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .with_filter(env_filter_console);

    let subscriber = tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer);
    let default_guard = tracing::subscriber::set_default(subscriber);

    Ok(LogGuards {
        _default: default_guard,
        _worker: worker_guard,
    })
}
