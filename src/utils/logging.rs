use std::sync::{Once, OnceLock};

use tracing::{Level, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan, MakeWriter},
    prelude::*,
    registry,
    registry::LookupSpan,
    EnvFilter, Layer,
};

use crate::config::LoggingConfig;

static INIT: Once = Once::new();

/// Keeps the file writer thread alive for the life of the process
static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// LogConfig provides options for configuring the logging system
#[derive(Clone, Debug)]
pub struct LogConfig {
    /// The name of the application, also the file name prefix
    pub app_name: String,
    /// The log level (trace, debug, info, warn, error)
    pub log_level: Level,
    /// Whether to enable JSON log format
    pub json_format: bool,
    /// Directory where log files should be stored, None for console only
    pub log_dir: Option<String>,
    /// Whether to log to stdout in addition to files
    pub log_to_stdout: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig::from(&LoggingConfig::default())
    }
}

impl From<&LoggingConfig> for LogConfig {
    fn from(config: &LoggingConfig) -> Self {
        Self {
            app_name: config.app_name.clone(),
            log_level: config.log_level,
            json_format: config.json_format,
            log_dir: config.log_dir.clone(),
            log_to_stdout: true,
        }
    }
}

fn output_layer<S, W>(writer: W, json: bool, ansi: bool) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    if json {
        fmt::layer().json().with_writer(writer).with_span_events(FmtSpan::CLOSE).boxed()
    } else {
        fmt::layer()
            .with_writer(writer)
            .with_ansi(ansi)
            .with_span_events(FmtSpan::CLOSE)
            .boxed()
    }
}

/// Initialize the tracing system with the given configuration
///
/// Only the first call has an effect.
///
/// # Example
/// ```
/// use avrcp_codec::utils::logging::{LogConfig, init_logging};
/// use tracing::Level;
///
/// let config = LogConfig {
///     app_name: "avrcp-tool".to_string(),
///     log_level: Level::DEBUG,
///     ..Default::default()
/// };
///
/// init_logging(&config);
/// ```
pub fn init_logging(config: &LogConfig) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{},{crate_name}={level}",
                config.log_level,
                crate_name = env!("CARGO_CRATE_NAME"),
                level = config.log_level
            ))
        });

        let file_layer = config.log_dir.as_ref().map(|log_dir| {
            let file_appender = rolling::daily(log_dir, format!("{}.log", config.app_name));
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let _ = FILE_GUARD.set(guard);
            output_layer(non_blocking, config.json_format, false)
        });

        // With no file configured, stdout is the only place logs can go.
        let to_stdout = config.log_to_stdout || config.log_dir.is_none();
        let stdout_layer =
            to_stdout.then(|| output_layer(std::io::stdout, config.json_format, true));

        registry().with(filter).with(file_layer).with(stdout_layer).init();

        if !config.log_to_stdout && config.log_dir.is_none() {
            tracing::warn!("No log output configured, defaulting to stdout");
        }
        tracing::info!("Logging initialized at {} level", config.log_level);
    });
}

/// Setup logging from the codec configuration
pub fn init_from_config(config: &LoggingConfig) {
    init_logging(&LogConfig::from(config));
}

/// Setup default logging configuration for quick startup
pub fn setup_default_logging() {
    init_logging(&LogConfig::default());
}
