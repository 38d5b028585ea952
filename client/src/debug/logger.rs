//! File-based logging initialization

use super::config::{LogConfig, DEFAULT_LOG_LEVEL};
use std::fs;
use std::sync::Once;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static INIT: Once = Once::new();

/// Initialize the logging system from [`LogConfig::from_env`].
///
/// Sets up:
/// - Daily log rotation under `BIUAI_LOG_DIR`
/// - Non-blocking writes so request paths never wait on disk
/// - Optional stderr mirror
/// - Panic hook integration for crash logging
///
/// Calling it more than once is a no-op.
pub fn init() {
    init_with(LogConfig::from_env());
}

pub fn init_with(config: LogConfig) {
    INIT.call_once(|| install(config));
}

fn install(config: LogConfig) {
    if let Err(e) = fs::create_dir_all(&config.log_dir) {
        eprintln!("Warning: Failed to create log directory: {}", e);
        return;
    }

    let file_appender = tracing_appender::rolling::daily(&config.log_dir, &config.file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false);

    let stderr_layer = config.stderr.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
            .boxed()
    });

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init();

    if let Err(e) = installed {
        // Another subscriber (e.g. a test harness) owns the global slot
        eprintln!("Warning: Logging already initialized: {}", e);
        return;
    }

    tracing::info!(
        log_file = %config.log_file().display(),
        log_level = %config.log_level,
        stderr = config.stderr,
        "Logging initialized"
    );

    setup_panic_hook();

    // Keep the writer alive for the lifetime of the program
    std::mem::forget(guard);
}

/// Panics go to the log file (where a detached driver's stderr is lost)
/// before the previous hook runs.
fn setup_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let payload = info.payload();
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "<non-string payload>".to_string());
        let at = info
            .location()
            .map_or_else(|| "?".to_string(), |l| format!("{}:{}", l.file(), l.line()));

        tracing::error!(
            at = %at,
            message = %message,
            backtrace = %std::backtrace::Backtrace::force_capture(),
            "Panic"
        );
        previous(info);
    }));
}
