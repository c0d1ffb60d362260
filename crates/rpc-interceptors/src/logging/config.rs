//! Logging configuration
//!
//! [`LogConfig`] is built once per interceptor with the builder methods below
//! and never changes afterwards. Each `with_*` call consumes the config and
//! returns a new one, so later calls of the same kind win.
//!
//! [`LogSettings`] is the serializable subset, for configs loaded from files.

use super::constants::RFC3339;
use super::fields::Fields;
use super::policy::{
    default_code_to_level, default_error_to_code, duration_to_duration_field,
    duration_to_time_millis_fields,
};
use super::types::{Level, LoggableEvent};
use crate::callmeta::Role;
use crate::context::Context;
use crate::error::{Code, RpcError};
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Maps a status code to a severity.
pub type CodeToLevel = Arc<dyn Fn(Code) -> Level + Send + Sync>;

/// Maps a handler error to a status code.
pub type ErrorToCode = Arc<dyn Fn(&RpcError) -> Code + Send + Sync>;

/// Renders an elapsed duration as log fields.
pub type DurationToFields = Arc<dyn Fn(Duration) -> Fields + Send + Sync>;

/// Derives extra log fields from the call context.
pub type FieldsFromContext = Arc<dyn Fn(&Context) -> Fields + Send + Sync>;

/// Validation errors for [`LogConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigValidationError {
    /// timestamp_format must not be empty
    EmptyTimestampFormat,
    /// timestamp_format contains a specifier chrono does not understand
    InvalidTimestampFormat(String),
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTimestampFormat => {
                write!(f, "timestamp_format must not be empty")
            }
            Self::InvalidTimestampFormat(format) => {
                write!(f, "invalid timestamp_format: {:?}", format)
            }
        }
    }
}

impl std::error::Error for ConfigValidationError {}

/// Configuration for call logging.
///
/// # Example
/// ```rust,ignore
/// use rpc_interceptors::logging::{LogConfig, LoggableEvent, Level};
///
/// let config = LogConfig::new()
///     .with_log_on_events([LoggableEvent::StartCall, LoggableEvent::FinishCall, LoggableEvent::PayloadSent])
///     .with_levels(|code| if code == Code::NotFound { Level::Debug } else { Level::Info })
///     .with_timestamp_format("%H:%M:%S");
/// ```
#[derive(Clone)]
pub struct LogConfig {
    /// Lifecycle events that produce a log line.
    pub events: HashSet<LoggableEvent>,
    /// Severity override. `None` uses the role's default table.
    pub code_to_level: Option<CodeToLevel>,
    /// Error classification.
    pub error_to_code: ErrorToCode,
    /// Duration rendering for `started call` and `finished call`.
    pub duration_to_fields: DurationToFields,
    /// chrono strftime format for timestamp fields.
    pub timestamp_format: String,
    /// Optional extractor for extra per-call fields.
    pub fields_from_context: Option<FieldsFromContext>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            events: [LoggableEvent::StartCall, LoggableEvent::FinishCall]
                .into_iter()
                .collect(),
            code_to_level: None,
            error_to_code: Arc::new(default_error_to_code),
            duration_to_fields: Arc::new(duration_to_time_millis_fields),
            timestamp_format: RFC3339.to_string(),
            fields_from_context: None,
        }
    }
}

impl LogConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the set of lifecycle events that produce log lines.
    pub fn with_log_on_events(mut self, events: impl IntoIterator<Item = LoggableEvent>) -> Self {
        self.events = events.into_iter().collect();
        self
    }

    /// Sets the code to severity mapping for both roles.
    pub fn with_levels<F>(mut self, f: F) -> Self
    where
        F: Fn(Code) -> Level + Send + Sync + 'static,
    {
        self.code_to_level = Some(Arc::new(f));
        self
    }

    /// Sets the error to code mapping.
    pub fn with_codes<F>(mut self, f: F) -> Self
    where
        F: Fn(&RpcError) -> Code + Send + Sync + 'static,
    {
        self.error_to_code = Arc::new(f);
        self
    }

    /// Sets the duration rendering.
    ///
    /// [`duration_to_time_millis_fields`] is the default;
    /// [`duration_to_duration_field`] is the common alternative.
    pub fn with_duration_field<F>(mut self, f: F) -> Self
    where
        F: Fn(Duration) -> Fields + Send + Sync + 'static,
    {
        self.duration_to_fields = Arc::new(f);
        self
    }

    /// Sets the chrono strftime format used for timestamp fields.
    pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }

    /// Sets a function that derives extra fields from the call context.
    pub fn with_fields_from_context<F>(mut self, f: F) -> Self
    where
        F: Fn(&Context) -> Fields + Send + Sync + 'static,
    {
        self.fields_from_context = Some(Arc::new(f));
        self
    }

    /// Returns true when `event` produces a log line.
    pub fn should_log(&self, event: LoggableEvent) -> bool {
        self.events.contains(&event)
    }

    /// Severity for `code` as seen from `role`.
    pub fn level_for(&self, code: Code, role: Role) -> Level {
        match &self.code_to_level {
            Some(f) => f(code),
            None => default_code_to_level(code, role),
        }
    }

    /// Status code for a handler error.
    pub fn code_for(&self, err: &RpcError) -> Code {
        (self.error_to_code)(err)
    }

    /// Duration fields for an elapsed time.
    pub fn duration_fields(&self, duration: Duration) -> Fields {
        (self.duration_to_fields)(duration)
    }

    /// Extra fields from the context, empty without an extractor.
    pub fn context_fields(&self, ctx: &Context) -> Fields {
        match &self.fields_from_context {
            Some(f) => f(ctx),
            None => Fields::new(),
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.timestamp_format.is_empty() {
            return Err(ConfigValidationError::EmptyTimestampFormat);
        }
        if StrftimeItems::new(&self.timestamp_format).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigValidationError::InvalidTimestampFormat(
                self.timestamp_format.clone(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for LogConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogConfig")
            .field("events", &self.events)
            .field("custom_levels", &self.code_to_level.is_some())
            .field("timestamp_format", &self.timestamp_format)
            .field("fields_from_context", &self.fields_from_context.is_some())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Serializable Settings
// =============================================================================

/// How elapsed time is written to log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationFieldStyle {
    /// `grpc.time_ms` as a number
    #[default]
    TimeMillis,
    /// `grpc.duration` as text
    Duration,
}

/// File-friendly subset of [`LogConfig`].
///
/// ```rust,ignore
/// let settings: LogSettings = serde_json::from_str(r#"{
///     "events": ["start_call", "finish_call", "payload_received"],
///     "timestamp_format": "%Y-%m-%d %H:%M:%S",
///     "duration_field": "duration"
/// }"#)?;
/// let config = LogConfig::from(settings);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Lifecycle events that produce a log line.
    pub events: Vec<LoggableEvent>,
    /// chrono strftime format for timestamp fields.
    pub timestamp_format: String,
    /// Duration rendering.
    pub duration_field: DurationFieldStyle,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            events: vec![LoggableEvent::StartCall, LoggableEvent::FinishCall],
            timestamp_format: RFC3339.to_string(),
            duration_field: DurationFieldStyle::default(),
        }
    }
}

impl From<LogSettings> for LogConfig {
    fn from(settings: LogSettings) -> Self {
        let config = LogConfig::new()
            .with_log_on_events(settings.events)
            .with_timestamp_format(settings.timestamp_format);

        match settings.duration_field {
            DurationFieldStyle::TimeMillis => config,
            DurationFieldStyle::Duration => config.with_duration_field(duration_to_duration_field),
        }
    }
}
