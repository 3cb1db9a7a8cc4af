//! Logging and tracing configuration
//!
//! Centralized tracing setup for the simulator: console output by default,
//! with optional JSON formatting and daily-rolling file output.

use std::io;
use tracing::{info, Level};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry,
};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level for the application
    pub level: Level,
    /// Whether to emit JSON instead of human-readable lines
    pub json_format: bool,
    /// Log file directory; file logging is enabled when set
    pub log_directory: Option<String>,
    /// Log file prefix for the daily-rolling appender
    pub log_file_prefix: String,
    /// Whether to use ANSI colors in console output
    pub enable_ansi: bool,
    /// Custom environment filter overriding the level
    pub env_filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            json_format: false,
            log_directory: None,
            log_file_prefix: "fullness-simulator".to_string(),
            enable_ansi: true,
            env_filter: None,
        }
    }
}

impl LoggingConfig {
    /// Create a new logging configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the log level
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Enable JSON formatting
    pub fn with_json_format(mut self) -> Self {
        self.json_format = true;
        self
    }

    /// Enable daily-rolling file logging into the given directory
    pub fn with_file_logging(mut self, directory: impl Into<String>) -> Self {
        self.log_directory = Some(directory.into());
        self
    }

    /// Disable ANSI colors
    pub fn without_ansi(mut self) -> Self {
        self.enable_ansi = false;
        self
    }

    /// Set a custom environment filter
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Initialize the global tracing subscriber
    pub fn init(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let env_filter = if let Some(filter) = &self.env_filter {
            EnvFilter::try_new(filter)?
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new(format!(
                    "{}={}",
                    env!("CARGO_PKG_NAME").replace('-', "_"),
                    self.level
                ))
            })
        };

        let registry = Registry::default().with(env_filter);

        match &self.log_directory {
            Some(directory) => {
                let file_appender = rolling::daily(directory, &self.log_file_prefix);
                let (file_writer, file_guard) = non_blocking(file_appender);

                // File output is always JSON; console follows the config
                let file_layer = fmt::layer().json().with_writer(file_writer);
                if self.json_format {
                    let console_layer = fmt::layer().json().with_writer(io::stderr);
                    registry.with(file_layer).with(console_layer).init();
                } else {
                    let console_layer =
                        fmt::layer().with_writer(io::stderr).with_ansi(self.enable_ansi);
                    registry.with(file_layer).with(console_layer).init();
                }

                // The guard must outlive the process for the writer to flush
                std::mem::forget(file_guard);
            }
            None => {
                if self.json_format {
                    registry.with(fmt::layer().json().with_writer(io::stderr)).init();
                } else {
                    registry
                        .with(fmt::layer().with_writer(io::stderr).with_ansi(self.enable_ansi))
                        .init();
                }
            }
        }

        info!("Logging initialized");
        Ok(())
    }

    /// Initialize verbose logging (INFO level)
    pub fn init_verbose() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Self::new().with_level(Level::INFO).init()
    }

    /// Initialize debug logging (DEBUG level)
    pub fn init_debug() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Self::new().with_level(Level::DEBUG).init()
    }
}
