//! Reporter that turns call lifecycle hooks into log lines

use super::config::LogConfig;
use super::constants::*;
use super::fields::{extract_fields, inject_fields, Fields};
use super::logger::Logger;
use super::policy::format_timestamp;
use super::types::{Level, LoggableEvent};
use crate::callmeta::{CallMeta, Role};
use crate::context::Context;
use crate::error::{Code, RpcError};
use crate::reporter::{Reportable, Reporter};
use async_trait::async_trait;
use futures::FutureExt;
use serde_json::Value;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// Fields every line of a call carries.
pub fn common_fields(meta: &CallMeta) -> Fields {
    Fields::with_capacity(5)
        .field(PROTOCOL_KEY, PROTOCOL)
        .field(COMPONENT_KEY, meta.role.as_str())
        .field(SERVICE_KEY, meta.service.as_str())
        .field(METHOD_KEY, meta.method.as_str())
        .field(METHOD_TYPE_KEY, meta.stream_type.as_str())
}

// =============================================================================
// LoggingReporter
// =============================================================================

/// Per-call reporter that writes to a [`Logger`].
///
/// Created by [`LoggingReportable`]; owned by the task driving the call.
pub struct LoggingReporter {
    call_meta: CallMeta,
    ctx: Context,
    started_call_logged: bool,
    fields: Fields,
    config: Arc<LogConfig>,
    logger: Arc<dyn Logger>,
}

impl LoggingReporter {
    fn level_for(&self, err: Option<&RpcError>) -> Level {
        match err {
            Some(err) => self
                .config
                .level_for(self.config.code_for(err), self.call_meta.role),
            None => Level::Info,
        }
    }

    /// Accumulated fields plus whatever the context carries now.
    fn current_fields(&self, err: Option<&RpcError>) -> Fields {
        let mut fields = self.fields.with(&extract_fields(&self.ctx));
        if let Some(err) = err {
            fields.insert(ERROR_KEY, err.to_string());
        }
        fields
    }

    async fn log_started_call(&mut self, level: Level, fields: &Fields, duration: Duration) {
        if self.started_call_logged || !self.config.should_log(LoggableEvent::StartCall) {
            return;
        }
        self.started_call_logged = true;
        let fields = fields.with(&self.config.duration_fields(duration));
        self.emit(level, STARTED_CALL, &fields).await;
    }

    /// Hands one line to the logger. A panicking logger is reported and
    /// otherwise ignored.
    async fn emit(&self, level: Level, msg: &str, fields: &Fields) {
        let logged = AssertUnwindSafe(self.logger.log(&self.ctx, level, msg, fields))
            .catch_unwind()
            .await;

        if logged.is_err() {
            tracing::error!(
                service = %self.call_meta.service,
                method = %self.call_meta.method,
                msg = %msg,
                "logger panicked while emitting a call log line"
            );
        }
    }
}

#[async_trait]
impl Reporter for LoggingReporter {
    async fn post_call(&mut self, err: Option<&RpcError>, duration: Duration) {
        if !self.config.should_log(LoggableEvent::FinishCall) {
            return;
        }
        let err = err.filter(|err| !err.is_end_of_stream());

        let (code, level) = match err {
            Some(err) => {
                let code = self.config.code_for(err);
                (code, self.config.level_for(code, self.call_meta.role))
            }
            None => (Code::Ok, Level::Info),
        };

        let mut fields = self.fields.with(&extract_fields(&self.ctx));
        fields.insert(CODE_KEY, code.as_str());
        if let Some(err) = err {
            fields.insert(ERROR_KEY, err.to_string());
        }
        let fields = fields.with(&self.config.duration_fields(duration));

        self.emit(level, FINISHED_CALL, &fields).await;
    }

    async fn post_msg_send(
        &mut self,
        payload: Option<&Value>,
        err: Option<&RpcError>,
        duration: Duration,
    ) {
        let level = self.level_for(err);
        let fields = self.current_fields(err);
        self.log_started_call(level, &fields, duration).await;

        if err.is_some() || !self.config.should_log(LoggableEvent::PayloadSent) {
            return;
        }

        let (msg, content_key) = match self.call_meta.role {
            Role::Client => (REQUEST_SENT, REQUEST_CONTENT_KEY),
            Role::Server => (RESPONSE_SENT, RESPONSE_CONTENT_KEY),
        };
        let fields = fields.append([
            (SEND_DURATION_KEY, Value::from(format!("{:?}", duration))),
            (content_key, payload.cloned().unwrap_or(Value::Null)),
        ]);
        self.emit(level, msg, &fields).await;
    }

    async fn post_msg_receive(
        &mut self,
        payload: Option<&Value>,
        err: Option<&RpcError>,
        duration: Duration,
    ) {
        let level = self.level_for(err);
        let fields = self.current_fields(err);
        self.log_started_call(level, &fields, duration).await;

        if err.is_some() || !self.config.should_log(LoggableEvent::PayloadReceived) {
            return;
        }

        let (msg, content_key) = match self.call_meta.role {
            Role::Server => (REQUEST_RECEIVED, REQUEST_CONTENT_KEY),
            Role::Client => (RESPONSE_RECEIVED, RESPONSE_CONTENT_KEY),
        };
        let fields = fields.append([
            (RECV_DURATION_KEY, Value::from(format!("{:?}", duration))),
            (content_key, payload.cloned().unwrap_or(Value::Null)),
        ]);
        self.emit(level, msg, &fields).await;
    }
}

// =============================================================================
// LoggingReportable
// =============================================================================

/// Builds a [`LoggingReporter`] for each call.
///
/// The context handed to the handler carries the call's fields, so code
/// further down can read them with [`extract_fields`] or add its own with
/// [`inject_fields`]. The start time and deadline fields stay on the
/// reporter.
#[derive(Clone)]
pub struct LoggingReportable {
    logger: Arc<dyn Logger>,
    config: Arc<LogConfig>,
}

impl LoggingReportable {
    /// Creates a factory writing to `logger`.
    pub fn new(logger: impl Logger + 'static, config: LogConfig) -> Self {
        Self {
            logger: Arc::new(logger),
            config: Arc::new(config),
        }
    }

    /// The configuration shared by every reporter.
    pub fn config(&self) -> &LogConfig {
        &self.config
    }
}

impl Reportable for LoggingReportable {
    fn reporter(&self, ctx: &Context, meta: CallMeta) -> (Box<dyn Reporter>, Context) {
        let mut fields = extract_fields(ctx).with(&common_fields(&meta));
        if meta.role == Role::Server {
            if let Some(peer) = ctx.peer() {
                fields.insert(PEER_ADDRESS_KEY, peer.to_string());
            }
        }
        let fields = fields.with(&self.config.context_fields(ctx));

        let format = &self.config.timestamp_format;
        let mut single_use =
            Fields::new().field(START_TIME_KEY, format_timestamp(SystemTime::now(), format));
        if let Some(deadline) = ctx.deadline() {
            single_use.insert(REQUEST_DEADLINE_KEY, format_timestamp(deadline, format));
        }

        let ctx = inject_fields(ctx, &fields);
        let reporter = LoggingReporter {
            call_meta: meta,
            ctx: ctx.clone(),
            started_call_logged: false,
            fields: fields.with(&single_use),
            config: self.config.clone(),
            logger: self.logger.clone(),
        };
        (Box::new(reporter), ctx)
    }
}

impl std::fmt::Debug for LoggingReportable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggingReportable")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
