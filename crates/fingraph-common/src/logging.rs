//! Structured logging setup for FinGraph.

use tracing::Subscriber;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan, MakeWriter},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// Error returned when the global subscriber cannot be installed.
pub type LoggingError = Box<dyn std::error::Error + Send + Sync>;

/// Configuration for the logging system.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "fingraph_graphs=debug").
    pub level: String,
    /// Whether to write one JSON object per event.
    pub json_format: bool,
    /// Whether to enable pretty formatting with colors.
    pub pretty_format: bool,
    /// Optional file path for log output.
    pub file_path: Option<String>,
    /// Whether to include span open/close events.
    pub include_spans: bool,
    /// Whether to include target module information.
    pub include_targets: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            pretty_format: true,
            file_path: None,
            include_spans: false,
            include_targets: true,
        }
    }
}

impl LoggingConfig {
    /// Build the filter, falling back to `info` when the level does not parse.
    fn env_filter(&self) -> Result<EnvFilter, LoggingError> {
        Ok(EnvFilter::try_new(&self.level).or_else(|_| EnvFilter::try_new("info"))?)
    }

    fn output_format(&self) -> OutputFormat {
        if self.json_format {
            OutputFormat::Json
        } else if self.pretty_format {
            OutputFormat::Pretty
        } else {
            OutputFormat::Full
        }
    }

    /// Newline-delimited JSON layer writing to `writer`.
    fn json_layer<S, W>(&self, writer: W) -> impl Layer<S> + Send + Sync + 'static
    where
        S: Subscriber + for<'a> LookupSpan<'a> + 'static,
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        fmt::layer()
            .json()
            .with_current_span(self.include_spans)
            .with_span_list(self.include_spans)
            .with_span_events(self.span_events())
            .with_target(self.include_targets)
            .with_writer(writer)
    }

    fn span_events(&self) -> FmtSpan {
        if self.include_spans {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Pretty,
    Full,
}

/// Initialize the tracing subscriber with the given configuration.
///
/// Fails if a global subscriber is already installed or the log file
/// cannot be opened.
pub fn init_logging(config: LoggingConfig) -> Result<(), LoggingError> {
    let registry = tracing_subscriber::registry().with(config.env_filter()?);
    let span_events = config.span_events();

    let file = match &config.file_path {
        Some(path) => Some(
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?,
        ),
        None => None,
    };

    match config.output_format() {
        OutputFormat::Json => match file {
            Some(file) => registry.with(config.json_layer(file)).try_init()?,
            None => registry.with(config.json_layer(std::io::stdout)).try_init()?,
        },
        OutputFormat::Pretty => {
            let layer = fmt::layer()
                .pretty()
                .with_span_events(span_events)
                .with_target(config.include_targets);
            match file {
                Some(file) => registry.with(layer.with_ansi(false).with_writer(file)).try_init()?,
                None => registry.with(layer).try_init()?,
            }
        }
        OutputFormat::Full => {
            let layer = fmt::layer()
                .with_span_events(span_events)
                .with_target(config.include_targets);
            match file {
                Some(file) => registry.with(layer.with_ansi(false).with_writer(file)).try_init()?,
                None => registry.with(layer).try_init()?,
            }
        }
    }

    Ok(())
}

/// Initialize logging with default configuration.
pub fn init_default_logging() -> Result<(), LoggingError> {
    init_logging(LoggingConfig::default())
}

/// Initialize logging for development (pretty, debug level, spans on).
pub fn init_dev_logging() -> Result<(), LoggingError> {
    init_logging(LoggingConfig {
        level: "debug".to_string(),
        include_spans: true,
        ..LoggingConfig::default()
    })
}
