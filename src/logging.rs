//! # Structured Logging Module
//!
//! Two concerns live here:
//!
//! - [`HandlerLogger`], the single-method logger collaborator handed to the
//!   classifier and the tag reconciler by the host. Call sites take
//!   `Option<&dyn HandlerLogger>`; `None` is a silent no-op.
//! - [`init_structured_logging`], environment-aware `tracing` setup for hosts
//!   and tests that want this crate's own structured events on the console.

use parking_lot::Mutex;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Line-oriented logger supplied by the host runtime
pub trait HandlerLogger: Send + Sync {
    fn log(&self, line: &str);
}

/// Write one line to an optional logger
pub(crate) fn log_line(logger: Option<&dyn HandlerLogger>, line: &str) {
    if let Some(logger) = logger {
        logger.log(line);
    }
}

/// Forwards handler log lines to `tracing` as `warn` events tagged with a
/// component name.
///
/// ```rust
/// use resource_handler_core::classification::{handle_exception, default_rule_set};
/// use resource_handler_core::{CallbackState, Failure, ProgressResult, TracingLogger};
///
/// let logger = TracingLogger::new("bucket_handler");
/// let progress = ProgressResult::progress("bucket-1", CallbackState::new());
/// let result = handle_exception(progress, &Failure::runtime("boom"), &default_rule_set(), Some(&logger));
/// assert!(result.is_failed());
/// ```
#[derive(Debug, Clone)]
pub struct TracingLogger {
    component: String,
}

impl TracingLogger {
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
        }
    }

    pub fn component(&self) -> &str {
        &self.component
    }
}

impl Default for TracingLogger {
    fn default() -> Self {
        Self::new("resource_handler")
    }
}

impl HandlerLogger for TracingLogger {
    fn log(&self, line: &str) {
        tracing::warn!(component = %self.component, "{line}");
    }
}

/// Keeps every line in memory
#[derive(Debug, Default)]
pub struct RecordingLogger {
    lines: Mutex<Vec<String>>,
}

impl RecordingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }
}

impl HandlerLogger for RecordingLogger {
    fn log(&self, line: &str) {
        self.lines.lock().push(line.to_string());
    }
}

/// Initialize structured logging with environment-specific configuration
pub fn init_structured_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(get_log_level(&environment)));

        let json = std::env::var("HANDLER_LOG_FORMAT")
            .map(|format| format.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let layer = if json {
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .json()
                .with_filter(filter)
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_ansi(true)
                .with_filter(filter)
                .boxed()
        };

        // A host may already own the global subscriber
        if tracing_subscriber::registry().with(layer).try_init().is_err() {
            tracing::debug!("Global tracing subscriber already initialized - continuing with existing subscriber");
        }

        tracing::info!(environment = %environment, json, "Structured logging initialized");
    });
}

/// Get current environment from environment variables
fn get_environment() -> String {
    std::env::var("HANDLER_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Get log level based on environment
fn get_log_level(environment: &str) -> String {
    match environment {
        "test" => "debug".to_string(),
        "development" => "debug".to_string(),
        "production" => "info".to_string(),
        _ => "debug".to_string(),
    }
}
