//! Policy tests - default severity tables, duration fields and timestamps

use proptest::prelude::*;
use serde_json::json;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::callmeta::Role;
use crate::error::{ALL_CODES, Code, RpcError};
use crate::logging::{
    Level, default_client_code_to_level, default_code_to_level, default_error_to_code,
    default_server_code_to_level, duration_to_duration_field, duration_to_time_millis_fields,
    format_timestamp,
};

const SERVER_TABLE: &[(Code, Level)] = &[
    (Code::NotFound, Level::Info),
    (Code::Canceled, Level::Info),
    (Code::AlreadyExists, Level::Info),
    (Code::InvalidArgument, Level::Info),
    (Code::Unauthenticated, Level::Info),
    (Code::DeadlineExceeded, Level::Warn),
    (Code::PermissionDenied, Level::Warn),
    (Code::ResourceExhausted, Level::Warn),
    (Code::FailedPrecondition, Level::Warn),
    (Code::Aborted, Level::Warn),
    (Code::OutOfRange, Level::Warn),
    (Code::Unavailable, Level::Warn),
    (Code::Unknown, Level::Error),
    (Code::Unimplemented, Level::Error),
    (Code::Internal, Level::Error),
    (Code::DataLoss, Level::Error),
];

const CLIENT_TABLE: &[(Code, Level)] = &[
    (Code::Canceled, Level::Debug),
    (Code::InvalidArgument, Level::Debug),
    (Code::NotFound, Level::Debug),
    (Code::AlreadyExists, Level::Debug),
    (Code::ResourceExhausted, Level::Debug),
    (Code::FailedPrecondition, Level::Debug),
    (Code::Aborted, Level::Debug),
    (Code::OutOfRange, Level::Debug),
    (Code::Unknown, Level::Info),
    (Code::DeadlineExceeded, Level::Info),
    (Code::PermissionDenied, Level::Info),
    (Code::Unauthenticated, Level::Info),
    (Code::Unimplemented, Level::Warn),
    (Code::Internal, Level::Warn),
    (Code::Unavailable, Level::Warn),
    (Code::DataLoss, Level::Warn),
];

// =============================================================================
// Property-Based Tests
// =============================================================================

proptest! {
    /// Every error code has a documented level on both sides.
    #[test]
    fn prop_tables_cover_every_code(index in 0usize..ALL_CODES.len()) {
        let code = ALL_CODES[index];
        let server = SERVER_TABLE.iter().find(|(c, _)| *c == code).map(|(_, l)| *l);
        let client = CLIENT_TABLE.iter().find(|(c, _)| *c == code).map(|(_, l)| *l);

        prop_assert_eq!(Some(default_server_code_to_level(code)), server);
        prop_assert_eq!(Some(default_client_code_to_level(code)), client);
        prop_assert_eq!(default_code_to_level(code, Role::Server), default_server_code_to_level(code));
        prop_assert_eq!(default_code_to_level(code, Role::Client), default_client_code_to_level(code));
    }

    /// The client side never logs a call outcome at Error by default.
    #[test]
    fn prop_client_never_errors(index in 0usize..ALL_CODES.len()) {
        prop_assert!(default_client_code_to_level(ALL_CODES[index]) < Level::Error);
    }

    /// `grpc.time_ms` is the duration in milliseconds, to the microsecond.
    #[test]
    fn prop_time_ms_has_microsecond_precision(micros in 0u64..10_000_000_000) {
        let fields = duration_to_time_millis_fields(Duration::from_micros(micros) + Duration::from_nanos(999));
        let millis = fields.get("grpc.time_ms").and_then(|v| v.as_f64()).unwrap();
        prop_assert!((millis - micros as f64 / 1000.0).abs() < 1e-6 * (1.0 + millis));
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[test]
fn test_asymmetric_fallbacks() {
    // Unknown is an error for a server but only informational for a client.
    assert_eq!(default_server_code_to_level(Code::Unknown), Level::Error);
    assert_eq!(default_client_code_to_level(Code::Unknown), Level::Info);

    // The far end's failure is only a warning for the caller.
    assert_eq!(default_server_code_to_level(Code::Internal), Level::Error);
    assert_eq!(default_client_code_to_level(Code::Internal), Level::Warn);

    // A client's own cancellation is noise.
    assert_eq!(default_client_code_to_level(Code::Canceled), Level::Debug);
}

#[test]
fn test_unlisted_code_falls_back_by_role() {
    // Ok is in neither table.
    assert!(SERVER_TABLE.iter().all(|(c, _)| *c != Code::Ok));
    assert!(CLIENT_TABLE.iter().all(|(c, _)| *c != Code::Ok));

    assert_eq!(default_server_code_to_level(Code::Ok), Level::Error);
    assert_eq!(default_client_code_to_level(Code::Ok), Level::Info);
}

#[test]
fn test_default_error_to_code() {
    assert_eq!(default_error_to_code(&RpcError::data_loss("gone")), Code::DataLoss);
    let io = RpcError::from(std::io::Error::other("broken pipe"));
    assert_eq!(default_error_to_code(&io), Code::Unknown);
}

#[test]
fn test_time_ms_value() {
    let fields = duration_to_time_millis_fields(Duration::from_micros(1500));
    assert_eq!(fields.get("grpc.time_ms"), Some(&json!(1.5)));
    assert_eq!(fields.len(), 1);
}

#[test]
fn test_duration_field_value() {
    let fields = duration_to_duration_field(Duration::from_millis(250));
    assert_eq!(fields.get("grpc.duration"), Some(&json!("250ms")));
}

#[test]
fn test_format_timestamp_rfc3339() {
    let t = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
    assert_eq!(
        format_timestamp(t, crate::logging::constants::RFC3339),
        "2023-11-14T22:13:20+00:00"
    );
    assert_eq!(format_timestamp(t, "%Y/%m/%d"), "2023/11/14");
}

#[test]
fn test_format_timestamp_invalid_format_falls_back() {
    let formatted = format_timestamp(UNIX_EPOCH, "%Q");
    assert_eq!(formatted, "1970-01-01T00:00:00+00:00");
}

#[test]
fn test_format_timestamp_now_is_parseable() {
    let formatted = format_timestamp(SystemTime::now(), crate::logging::constants::RFC3339);
    assert!(chrono::DateTime::parse_from_rfc3339(&formatted).is_ok());
}
