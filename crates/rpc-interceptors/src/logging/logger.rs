use super::constants::{JSON_TARGET, TRACING_TARGET};
use super::fields::Fields;
use super::types::Level;
use crate::context::Context;
use async_trait::async_trait;
use std::sync::Arc;

// =============================================================================
// Logger Trait
// =============================================================================

/// Sink for the log lines a reporter emits.
///
/// Implementations are shared across concurrent calls and must be safe for
/// concurrent use. A panic inside `log` is caught by the reporter and never
/// reaches the instrumented call.
#[async_trait]
pub trait Logger: Send + Sync {
    /// Emits one log line.
    async fn log(&self, ctx: &Context, level: Level, msg: &str, fields: &Fields);
}

#[async_trait]
impl<L: Logger + ?Sized> Logger for Arc<L> {
    async fn log(&self, ctx: &Context, level: Level, msg: &str, fields: &Fields) {
        (**self).log(ctx, level, msg, fields).await
    }
}

// =============================================================================
// LoggerFn
// =============================================================================

/// Adapts a plain closure into a [`Logger`].
///
/// Created with [`logger_fn`].
#[derive(Clone)]
pub struct LoggerFn<F> {
    f: F,
}

/// Wraps a closure as a [`Logger`].
///
/// ```rust,ignore
/// let logger = logger_fn(|_ctx, level, msg, fields| {
///     println!("[{level}] {msg} {fields}");
/// });
/// ```
pub fn logger_fn<F>(f: F) -> LoggerFn<F>
where
    F: Fn(&Context, Level, &str, &Fields) + Send + Sync,
{
    LoggerFn { f }
}

#[async_trait]
impl<F> Logger for LoggerFn<F>
where
    F: Fn(&Context, Level, &str, &Fields) + Send + Sync,
{
    async fn log(&self, ctx: &Context, level: Level, msg: &str, fields: &Fields) {
        (self.f)(ctx, level, msg, fields)
    }
}

// =============================================================================
// TracingLogger
// =============================================================================

/// Default logger backed by the tracing crate.
///
/// Each line becomes a tracing event under the `rpc` target at the matching
/// level, with the fields rendered as `key=value` pairs.
#[derive(Debug, Clone, Default)]
pub struct TracingLogger;

#[async_trait]
impl Logger for TracingLogger {
    async fn log(&self, _ctx: &Context, level: Level, msg: &str, fields: &Fields) {
        match level {
            Level::Debug => {
                tracing::debug!(target: TRACING_TARGET, fields = %fields, "{}", msg);
            }
            Level::Info => {
                tracing::info!(target: TRACING_TARGET, fields = %fields, "{}", msg);
            }
            Level::Warn => {
                tracing::warn!(target: TRACING_TARGET, fields = %fields, "{}", msg);
            }
            Level::Error => {
                tracing::error!(target: TRACING_TARGET, fields = %fields, "{}", msg);
            }
        }
    }
}

// =============================================================================
// JsonLogger
// =============================================================================

/// A logger that outputs one JSON object per line.
///
/// The object carries `level`, `msg` and the fields in insertion order,
/// emitted under the `rpc_json` target. Useful for log aggregation systems
/// that expect JSON.
///
/// A field whose key collides with `level` or `msg` is written as
/// `fields.level` / `fields.msg`.
#[derive(Debug, Clone, Default)]
pub struct JsonLogger;

impl JsonLogger {
    /// Renders a line as a JSON string.
    pub fn render(level: Level, msg: &str, fields: &Fields) -> serde_json::Result<String> {
        let mut line = Fields::new()
            .field("level", level.as_str())
            .field("msg", msg);
        for (key, value) in fields {
            match key {
                "level" | "msg" => line.insert(format!("fields.{key}"), value.clone()),
                _ => line.insert(key, value.clone()),
            }
        }
        serde_json::to_string(&line)
    }
}

#[async_trait]
impl Logger for JsonLogger {
    async fn log(&self, _ctx: &Context, level: Level, msg: &str, fields: &Fields) {
        let json = match Self::render(level, msg, fields) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, msg = %msg, "failed to render log line as JSON");
                return;
            }
        };

        match level {
            Level::Debug => tracing::debug!(target: JSON_TARGET, "{}", json),
            Level::Info => tracing::info!(target: JSON_TARGET, "{}", json),
            Level::Warn => tracing::warn!(target: JSON_TARGET, "{}", json),
            Level::Error => tracing::error!(target: JSON_TARGET, "{}", json),
        }
    }
}

// =============================================================================
// MockLogger (for testing)
// =============================================================================

#[cfg(test)]
use std::sync::Mutex;

/// A mock logger that captures lines for testing.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MockLogger {
    entries: Arc<Mutex<Vec<(Level, String, Fields)>>>,
}

#[cfg(test)]
impl MockLogger {
    /// Creates a new mock logger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all captured lines.
    pub fn entries(&self) -> Vec<(Level, String, Fields)> {
        self.entries.lock().unwrap().clone()
    }

    /// Returns the captured messages in order.
    pub fn messages(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .map(|(_, msg, _)| msg.clone())
            .collect()
    }

    /// Returns the first line with the given message.
    pub fn find(&self, msg: &str) -> Option<(Level, String, Fields)> {
        self.entries().into_iter().find(|(_, m, _)| m == msg)
    }

    /// Returns the number of captured lines.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Returns true if nothing has been captured.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }
}

#[cfg(test)]
#[async_trait]
impl Logger for MockLogger {
    async fn log(&self, _ctx: &Context, level: Level, msg: &str, fields: &Fields) {
        self.entries
            .lock()
            .unwrap()
            .push((level, msg.to_string(), fields.clone()));
    }
}
