use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::config::get_data_dir;
use crate::error::AppResult;

pub fn get_log_dir() -> AppResult<PathBuf> {
    let log_dir = get_data_dir()?.join("logs");

    if !log_dir.exists() {
        fs::create_dir_all(&log_dir)?;
    }

    Ok(log_dir)
}

/// Initialize logger system.
///
/// Console output is always on; `file_logging` adds a daily rolling file under the
/// data directory. Keep the returned guard alive until exit so buffered file
/// output is flushed.
pub fn init_logger(file_logging: bool) -> Option<WorkerGuard> {
    // Capture log macro logs
    let _ = tracing_log::LogTracer::init();

    // Console output layer
    let console_layer = fmt::Layer::new()
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true);

    // Default to INFO and above
    let filter_layer = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, guard) = if file_logging {
        match get_log_dir() {
            Ok(log_dir) => {
                let file_appender = tracing_appender::rolling::daily(log_dir, "branch-proxy.log");
                let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
                let layer = fmt::Layer::new()
                    .with_writer(non_blocking)
                    .with_ansi(false)
                    .with_target(true)
                    .with_level(true);
                (Some(layer), Some(guard))
            }
            Err(e) => {
                eprintln!("Failed to initialize log directory: {}", e);
                (None, None)
            }
        }
    } else {
        (None, None)
    };

    // try_init so a second initialization is harmless
    let _ = tracing_subscriber::registry()
        .with(filter_layer)
        .with(console_layer)
        .with(file_layer)
        .try_init();

    if guard.is_some() {
        info!("Logger system initialized (Console + File Persistence)");
    } else {
        info!("Logger system initialized (Console)");
    }

    guard
}
