//! `tracing` subscriber setup for programs embedding the Kismet client.
//!
//! The library crates only emit events. A host program calls one of the
//! `init_*` functions once at startup to route them to stderr and, optionally,
//! a daily-rotated log file.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::KismetConfig;
use crate::constants;
use crate::error::{KisError, KisResult};

/// Directives appended to every filter so HTTP internals stay quiet unless
/// asked for explicitly.
const QUIET_DEPS: &[&str] = &["hyper=warn", "hyper_util=warn", "reqwest=info", "rustls=warn"];

/// Build an `EnvFilter` from a level or directive string, falling back to
/// `info` when it does not parse.
fn build_filter(level: &str) -> EnvFilter {
    let mut filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    for directive in QUIET_DEPS {
        if level.contains(directive.split('=').next().unwrap_or_default()) {
            continue;
        }
        if let Ok(d) = directive.parse() {
            filter = filter.add_directive(d);
        }
    }
    filter
}

/// Install the global subscriber: compact stderr output plus a daily rolling
/// file named `kismet-rest.log` under `log_dir`.
///
/// * `level` - a level ("debug") or filter directives ("kismet_api=trace")
/// * `json_output` - write the file layer as JSON lines
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(level: &str, log_dir: &Path, json_output: bool) -> KisResult<LogGuard> {
    std::fs::create_dir_all(log_dir)?;

    let appender = rolling::daily(log_dir, format!("{}.log", constants::APP_NAME));
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let console = fmt::layer().with_target(true).compact();

    let file = if json_output {
        fmt::layer()
            .json()
            .with_writer(writer)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    } else {
        fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(build_filter(level))
        .with(console)
        .with(file)
        .try_init()
        .map_err(|e| KisError::Internal(format!("logging already initialized: {e}")))?;

    tracing::info!(level, dir = %log_dir.display(), "logging initialized");

    Ok(LogGuard { _guard: guard })
}

/// Initialize logging from the `[logging]` section of a client config.
pub fn init_logging_from_config(config: &KismetConfig) -> KisResult<LogGuard> {
    let log_dir = config.effective_log_dir()?;
    init_logging(&config.logging.level, &log_dir, config.logging.json_output)
}

/// Keeps the background log writer running. Dropping it flushes the file.
pub struct LogGuard {
    _guard: WorkerGuard,
}

/// Console-only logging for tests and small tools. Repeated calls are no-ops.
pub fn init_console_logging(level: &str) {
    let _ = tracing_subscriber::registry()
        .with(build_filter(level))
        .with(fmt::layer().with_target(true).compact())
        .try_init();
}
