//! Reporter tests - lifecycle hooks of the logging reporter

use async_trait::async_trait;
use serde_json::json;
use std::net::SocketAddr;
use std::time::Duration;

use crate::callmeta::{CallMeta, Role};
use crate::context::Context;
use crate::error::RpcError;
use crate::logging::{
    Fields, Level, LogConfig, LoggableEvent, Logger, LoggingReportable, MockLogger,
    extract_fields, inject_field,
};
use crate::reporter::{Reportable, Reporter};
use crate::request::Descriptor;

const ALL_EVENTS: [LoggableEvent; 4] = [
    LoggableEvent::StartCall,
    LoggableEvent::FinishCall,
    LoggableEvent::PayloadReceived,
    LoggableEvent::PayloadSent,
];

fn meta(role: Role) -> CallMeta {
    CallMeta::new(&Descriptor::new("/billing.v1.Invoices/Create", role), None)
}

fn reporter_for(
    logger: &MockLogger,
    config: LogConfig,
    ctx: &Context,
    role: Role,
) -> (Box<dyn Reporter>, Context) {
    LoggingReportable::new(logger.clone(), config).reporter(ctx, meta(role))
}

// =============================================================================
// Started Call
// =============================================================================

#[tokio::test]
async fn test_started_call_logged_once_across_hooks() {
    let logger = MockLogger::new();
    let (mut reporter, _) = reporter_for(&logger, LogConfig::new(), &Context::new(), Role::Server);

    reporter
        .post_msg_receive(Some(&json!({"n": 1})), None, Duration::from_millis(1))
        .await;
    reporter
        .post_msg_send(Some(&json!({"ok": true})), None, Duration::from_millis(2))
        .await;
    reporter
        .post_msg_receive(Some(&json!({"n": 2})), None, Duration::from_millis(3))
        .await;

    assert_eq!(logger.messages(), vec!["started call"]);
    let (level, _, fields) = logger.find("started call").unwrap();
    assert_eq!(level, Level::Info);
    assert_eq!(fields.get("grpc.time_ms"), Some(&json!(1.0)));
}

#[tokio::test]
async fn test_started_call_attaches_to_first_hook_whichever_it_is() {
    let logger = MockLogger::new();
    let config = LogConfig::new().with_log_on_events(ALL_EVENTS);
    let (mut reporter, _) = reporter_for(&logger, config, &Context::new(), Role::Client);

    reporter
        .post_msg_send(Some(&json!("req")), None, Duration::from_millis(1))
        .await;
    reporter
        .post_msg_receive(Some(&json!("resp")), None, Duration::from_millis(2))
        .await;

    assert_eq!(
        logger.messages(),
        vec!["started call", "request sent", "response received"]
    );
}

#[tokio::test]
async fn test_started_call_disabled() {
    let logger = MockLogger::new();
    let config = LogConfig::new().with_log_on_events([LoggableEvent::FinishCall]);
    let (mut reporter, _) = reporter_for(&logger, config, &Context::new(), Role::Server);

    reporter.post_msg_receive(Some(&json!(1)), None, Duration::ZERO).await;
    reporter.post_call(None, Duration::ZERO).await;

    assert_eq!(logger.messages(), vec!["finished call"]);
}

// =============================================================================
// Payload Lines
// =============================================================================

#[tokio::test]
async fn test_server_payload_lines() {
    let logger = MockLogger::new();
    let config = LogConfig::new().with_log_on_events(ALL_EVENTS);
    let (mut reporter, _) = reporter_for(&logger, config, &Context::new(), Role::Server);

    reporter
        .post_msg_receive(Some(&json!({"amount": 10})), None, Duration::from_micros(5))
        .await;
    reporter
        .post_msg_send(Some(&json!({"id": "inv_1"})), None, Duration::from_micros(9))
        .await;

    let (_, _, received) = logger.find("request received").unwrap();
    assert_eq!(received.get("grpc.request.content"), Some(&json!({"amount": 10})));
    assert_eq!(received.get("grpc.recv.duration"), Some(&json!("5µs")));
    assert!(!received.contains_key("grpc.time_ms"));

    let (_, _, sent) = logger.find("response sent").unwrap();
    assert_eq!(sent.get("grpc.response.content"), Some(&json!({"id": "inv_1"})));
    assert_eq!(sent.get("grpc.send.duration"), Some(&json!("9µs")));
}

#[tokio::test]
async fn test_payload_line_suppressed_on_error() {
    let logger = MockLogger::new();
    let config = LogConfig::new().with_log_on_events(ALL_EVENTS);
    let (mut reporter, _) = reporter_for(&logger, config, &Context::new(), Role::Server);

    let err = RpcError::internal("boom");
    reporter
        .post_msg_send(None, Some(&err), Duration::from_millis(1))
        .await;

    // Only the start line, carrying the error and its level.
    let entries = logger.entries();
    assert_eq!(entries.len(), 1);
    let (level, msg, fields) = &entries[0];
    assert_eq!(msg, "started call");
    assert_eq!(*level, Level::Error);
    assert_eq!(fields.get("grpc.error"), Some(&json!("internal: boom")));
}

// =============================================================================
// Finished Call
// =============================================================================

#[tokio::test]
async fn test_finished_call_ok() {
    let logger = MockLogger::new();
    let (mut reporter, _) = reporter_for(&logger, LogConfig::new(), &Context::new(), Role::Server);

    reporter.post_call(None, Duration::from_micros(2500)).await;

    let (level, _, fields) = logger.find("finished call").unwrap();
    assert_eq!(level, Level::Info);
    assert_eq!(fields.get("grpc.code"), Some(&json!("ok")));
    assert_eq!(fields.get("grpc.time_ms"), Some(&json!(2.5)));
    assert!(!fields.contains_key("grpc.error"));
}

#[tokio::test]
async fn test_end_of_stream_is_treated_as_success() {
    for role in [Role::Server, Role::Client] {
        let logger = MockLogger::new();
        let (mut reporter, _) = reporter_for(&logger, LogConfig::new(), &Context::new(), role);

        reporter
            .post_call(Some(&RpcError::end_of_stream()), Duration::ZERO)
            .await;

        let (level, _, fields) = logger.find("finished call").unwrap();
        assert_eq!(level, Level::Info);
        assert_eq!(fields.get("grpc.code"), Some(&json!("ok")));
        assert!(!fields.contains_key("grpc.error"));
    }
}

#[tokio::test]
async fn test_finished_call_levels_differ_by_role() {
    let err = RpcError::internal("db down");

    let server_logger = MockLogger::new();
    let (mut server, _) =
        reporter_for(&server_logger, LogConfig::new(), &Context::new(), Role::Server);
    server.post_call(Some(&err), Duration::ZERO).await;

    let client_logger = MockLogger::new();
    let (mut client, _) =
        reporter_for(&client_logger, LogConfig::new(), &Context::new(), Role::Client);
    client.post_call(Some(&err), Duration::ZERO).await;

    let (server_level, _, server_fields) = server_logger.find("finished call").unwrap();
    let (client_level, _, _) = client_logger.find("finished call").unwrap();
    assert_eq!(server_level, Level::Error);
    assert_eq!(client_level, Level::Warn);
    assert_eq!(server_fields.get("grpc.code"), Some(&json!("internal")));
    assert_eq!(server_fields.get("grpc.error"), Some(&json!("internal: db down")));
}

#[tokio::test]
async fn test_finished_call_disabled_is_noop() {
    let logger = MockLogger::new();
    let config = LogConfig::new().with_log_on_events([LoggableEvent::StartCall]);
    let (mut reporter, _) = reporter_for(&logger, config, &Context::new(), Role::Server);

    reporter
        .post_call(Some(&RpcError::internal("x")), Duration::ZERO)
        .await;
    assert!(logger.is_empty());
}

// =============================================================================
// Fields
// =============================================================================

#[tokio::test]
async fn test_common_and_single_use_fields() {
    let logger = MockLogger::new();
    let ctx = inject_field(&Context::new(), "tenant", "acme").with_timeout(Duration::from_secs(30));
    let (mut reporter, derived) = reporter_for(&logger, LogConfig::new(), &ctx, Role::Server);

    reporter.post_call(None, Duration::ZERO).await;
    let (_, _, fields) = logger.find("finished call").unwrap();

    assert_eq!(fields.get("protocol"), Some(&json!("connect")));
    assert_eq!(fields.get("grpc.component"), Some(&json!("server")));
    assert_eq!(fields.get("grpc.service"), Some(&json!("billing.v1.Invoices")));
    assert_eq!(fields.get("grpc.method"), Some(&json!("Create")));
    assert_eq!(fields.get("grpc.method_type"), Some(&json!("unary")));
    assert_eq!(fields.get("tenant"), Some(&json!("acme")));
    assert!(fields.contains_key("grpc.start_time"));
    assert!(fields.contains_key("grpc.request.deadline"));

    // The derived context carries the call fields but not the single-use ones.
    let ambient = extract_fields(&derived);
    assert_eq!(ambient.get("grpc.method"), Some(&json!("Create")));
    assert_eq!(ambient.get("tenant"), Some(&json!("acme")));
    assert!(!ambient.contains_key("grpc.start_time"));
    assert!(!ambient.contains_key("grpc.request.deadline"));
}

#[tokio::test]
async fn test_peer_address_server_only() {
    let peer: SocketAddr = "192.0.2.10:50051".parse().unwrap();
    let ctx = Context::new().with_peer(peer);

    let server_logger = MockLogger::new();
    let (mut server, _) = reporter_for(&server_logger, LogConfig::new(), &ctx, Role::Server);
    server.post_call(None, Duration::ZERO).await;

    let client_logger = MockLogger::new();
    let (mut client, _) = reporter_for(&client_logger, LogConfig::new(), &ctx, Role::Client);
    client.post_call(None, Duration::ZERO).await;

    let (_, _, server_fields) = server_logger.find("finished call").unwrap();
    let (_, _, client_fields) = client_logger.find("finished call").unwrap();
    assert_eq!(server_fields.get("peer.address"), Some(&json!("192.0.2.10:50051")));
    assert!(!client_fields.contains_key("peer.address"));
    assert_eq!(client_fields.get("grpc.component"), Some(&json!("client")));
}

#[tokio::test]
async fn test_fields_from_context_extractor() {
    let logger = MockLogger::new();
    let config = LogConfig::new().with_fields_from_context(|ctx: &Context| {
        Fields::new().field("caller.known", ctx.peer().is_some())
    });
    let (mut reporter, derived) = reporter_for(&logger, config, &Context::new(), Role::Server);

    reporter.post_call(None, Duration::ZERO).await;

    let (_, _, fields) = logger.find("finished call").unwrap();
    assert_eq!(fields.get("caller.known"), Some(&json!(false)));
    assert_eq!(extract_fields(&derived).get("caller.known"), Some(&json!(false)));
}

#[tokio::test]
async fn test_custom_timestamp_format() {
    let logger = MockLogger::new();
    let config = LogConfig::new().with_timestamp_format("%Y");
    let (mut reporter, _) = reporter_for(&logger, config, &Context::new(), Role::Server);

    reporter.post_call(None, Duration::ZERO).await;

    let (_, _, fields) = logger.find("finished call").unwrap();
    let start = fields.get("grpc.start_time").and_then(|v| v.as_str()).unwrap();
    assert_eq!(start.len(), 4);
    assert!(start.chars().all(|c| c.is_ascii_digit()));
}

// =============================================================================
// Logger Isolation
// =============================================================================

struct PanickingLogger;

#[async_trait]
impl Logger for PanickingLogger {
    async fn log(&self, _ctx: &Context, _level: Level, msg: &str, _fields: &Fields) {
        panic!("sink exploded on {msg}");
    }
}

#[tokio::test]
async fn test_logger_panic_does_not_escape() {
    let (mut reporter, _) =
        LoggingReportable::new(PanickingLogger, LogConfig::new().with_log_on_events(ALL_EVENTS))
            .reporter(&Context::new(), meta(Role::Server));

    reporter.post_msg_receive(Some(&json!(1)), None, Duration::ZERO).await;
    reporter.post_msg_send(Some(&json!(2)), None, Duration::ZERO).await;
    reporter.post_call(None, Duration::ZERO).await;
}
