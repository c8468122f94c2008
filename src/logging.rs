use crate::config::{DiagnosticsConfig, LogLevel};
use anyhow::{Context, Result, anyhow};
use std::path::PathBuf;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Configuration for the logging system
pub struct LogConfig {
    /// Minimum level when `RUST_LOG` is not set
    pub level: LogLevel,
    /// Directory for the JSON log file, `None` disables file output
    pub log_dir: Option<PathBuf>,
    /// Prefix for log file names
    pub file_prefix: String,
    /// Maximum number of log files to keep (rotation)
    pub max_files: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Trace,
            log_dir: None,
            file_prefix: "sublime-explorer-commands".to_string(),
            max_files: 5,
        }
    }
}

impl From<&DiagnosticsConfig> for LogConfig {
    fn from(diagnostics: &DiagnosticsConfig) -> Self {
        Self {
            level: diagnostics.log_level,
            log_dir: diagnostics.log_to_file.then(default_log_dir),
            max_files: diagnostics.log_max_files,
            ..Self::default()
        }
    }
}

/// `%LOCALAPPDATA%\Sublime Text\ExplorerCommands\logs`
pub fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Sublime Text")
        .join("ExplorerCommands")
        .join("logs")
}

/// Initialize diagnostic logging to stdout and, optionally, a rotating file.
///
/// Stdout is the console allocated by `DllMain` in debug builds. `RUST_LOG`
/// overrides the configured level, e.g. `RUST_LOG=shellext=debug`.
///
/// # Log Targets
/// - `shellext::context_menu` - explorer command calls
/// - `shellext::boundary` - failures converted at the COM boundary
/// - `command` - location resolution and launching
/// - `dll` - module entry points
pub fn init_logging(config: LogConfig) -> Result<LogGuard> {
    let level = config.level.as_str();
    let env_filter =
        || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let mut worker_guard = None;
    let file_layer = match &config.log_dir {
        Some(log_dir) => {
            std::fs::create_dir_all(log_dir).context("Failed to create log directory")?;

            let file_appender = tracing_appender::rolling::RollingFileAppender::builder()
                .rotation(tracing_appender::rolling::Rotation::DAILY)
                .filename_prefix(&config.file_prefix)
                .filename_suffix("log")
                .max_log_files(config.max_files)
                .build(log_dir)
                .context("Failed to create file appender")?;

            // The guard must outlive every log call or buffered lines are lost
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
            worker_guard = Some(guard);

            Some(
                fmt::layer()
                    .json()
                    .with_writer(non_blocking_file)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
                    .with_filter(env_filter()),
            )
        }
        None => None,
    };

    let stdout_layer = fmt::layer()
        .compact()
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_filter(env_filter());

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stdout_layer)
        .try_init()
        .map_err(|e| anyhow!("Failed to install log subscriber: {e}"))?;

    tracing::info!(
        target: "dll",
        level = config.level.as_str(),
        log_dir = ?config.log_dir,
        "Logging system initialized"
    );

    Ok(LogGuard {
        _worker_guard: worker_guard,
    })
}

/// Keeps the non-blocking file writer alive so pending lines get flushed
pub struct LogGuard {
    _worker_guard: Option<tracing_appender::non_blocking::WorkerGuard>,
}
