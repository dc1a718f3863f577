//! Logging setup.
//!
//! Log output always goes to stdout. When `logging.log_dir` is configured, a
//! second copy is written to a daily rolling file through a non-blocking
//! writer. `RUST_LOG` takes precedence over the configured filter.

use crate::config::LoggingSettings;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Prefix of rolling log file names (`flowvis-rs.log.YYYY-MM-DD`).
pub const LOG_FILE_PREFIX: &str = "flowvis-rs.log";

/// Install the global subscriber.
///
/// The returned guard flushes the file writer when dropped, so keep it alive
/// for as long as the program runs. Calling this twice leaves the first
/// subscriber in place.
pub fn init(settings: &LoggingSettings) -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.filter));

    let (file_layer, guard) = match &settings.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .try_init();

    match installed {
        Ok(()) => {
            if let Some(dir) = &settings.log_dir {
                tracing::debug!("Writing logs to {:?}", dir);
            }
        }
        Err(e) => tracing::debug!("Global subscriber already set: {}", e),
    }
    guard
}
