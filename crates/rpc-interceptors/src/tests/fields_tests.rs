//! Fields tests - ordering, deduplication and literal validation

use proptest::prelude::*;
use serde_json::{Value, json};
use std::collections::HashMap;

use crate::error::FieldsError;
use crate::logging::Fields;

fn key_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["a", "b", "c", "grpc.code", "grpc.time_ms"]).prop_map(String::from)
}

// =============================================================================
// Property-Based Tests
// =============================================================================

proptest! {
    /// Appending pairs with repeated keys keeps each key once, holding the
    /// last value supplied for it, at the position it was first seen.
    #[test]
    fn prop_append_last_write_wins(pairs in prop::collection::vec((key_strategy(), any::<i64>()), 0..32)) {
        let fields = Fields::new().append(pairs.iter().map(|(k, v)| (k.clone(), *v)));

        let mut last: HashMap<&str, i64> = HashMap::new();
        let mut first_seen: Vec<&str> = Vec::new();
        for (k, v) in &pairs {
            if !last.contains_key(k.as_str()) {
                first_seen.push(k.as_str());
            }
            last.insert(k.as_str(), *v);
        }

        prop_assert_eq!(fields.len(), last.len());
        prop_assert_eq!(fields.keys().collect::<Vec<_>>(), first_seen);
        for (k, v) in &last {
            prop_assert_eq!(fields.get(k), Some(&json!(*v)));
        }
    }

    /// Merging keeps one copy of each key and the right-hand side wins.
    #[test]
    fn prop_with_other_wins(
        left in prop::collection::vec((key_strategy(), any::<i32>()), 0..16),
        right in prop::collection::vec((key_strategy(), any::<i32>()), 0..16),
    ) {
        let left: Fields = left.into_iter().collect();
        let right: Fields = right.into_iter().collect();
        let merged = left.with(&right);

        let mut keys: Vec<&str> = merged.keys().collect();
        let total = keys.len();
        keys.sort_unstable();
        keys.dedup();
        prop_assert_eq!(keys.len(), total, "merged fields contain a duplicate key");

        for (k, v) in &merged {
            match right.get(k) {
                Some(expected) => prop_assert_eq!(v, expected),
                None => prop_assert_eq!(Some(v), left.get(k)),
            }
        }
    }

    /// Odd-length flattened literals are rejected rather than truncated.
    #[test]
    fn prop_odd_flat_literal_rejected(len in (0usize..20).prop_map(|n| n * 2 + 1)) {
        let flat: Vec<Value> = (0..len).map(|i| json!(format!("k{}", i))).collect();
        prop_assert_eq!(Fields::try_from_flat(flat), Err(FieldsError::OddLength(len)));
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[test]
fn test_fields_macro_preserves_order() {
    let fields = crate::fields! {
        "protocol" => "connect",
        "grpc.service" => "svc",
        "grpc.method" => "Do",
    };
    assert_eq!(
        fields.keys().collect::<Vec<_>>(),
        vec!["protocol", "grpc.service", "grpc.method"]
    );
    assert!(crate::fields! {}.is_empty());
}

#[test]
fn test_overwrite_keeps_position() {
    let fields = Fields::new()
        .field("a", 1)
        .field("b", 2)
        .field("a", 3);
    assert_eq!(fields.flatten(), vec![json!("a"), json!(3), json!("b"), json!(2)]);
}

#[test]
fn test_snapshot_is_unaffected_by_later_appends() {
    let base = crate::fields! { "a" => 1 };
    let snapshot = base.clone();
    let grown = base.append([("b", 2)]).with(&crate::fields! { "a" => 9 });

    assert_eq!(snapshot, crate::fields! { "a" => 1 });
    assert_eq!(base.len(), 1);
    assert_eq!(grown.get("a"), Some(&json!(9)));
}

#[test]
fn test_try_from_flat() {
    let fields = Fields::try_from(vec![json!("k1"), json!(1), json!("k2"), json!("v")]).unwrap();
    assert_eq!(fields, crate::fields! { "k1" => 1, "k2" => "v" });

    let err = Fields::try_from_flat(vec![json!("k1"), json!(1), json!(2), json!(3)]).unwrap_err();
    assert_eq!(err, FieldsError::NonStringKey { index: 2 });
    assert_eq!(err.to_string(), "field key at position 2 is not a string");
}

#[test]
fn test_flatten_round_trip() {
    let fields = crate::fields! { "x" => [1, 2], "y" => Value::Null };
    assert_eq!(Fields::try_from_flat(fields.flatten()).unwrap(), fields);
}

#[test]
fn test_iteration_is_restartable() {
    let fields = crate::fields! { "a" => 1, "b" => 2 };
    let first: Vec<_> = fields.iter().map(|(k, _)| k).collect();
    let second: Vec<_> = fields.iter().map(|(k, _)| k).collect();
    assert_eq!(first, second);
    assert_eq!(fields.iter().len(), 2);
}

#[test]
fn test_serialize_as_ordered_object() {
    let fields = crate::fields! { "z" => 1, "a" => "two" };
    assert_eq!(serde_json::to_string(&fields).unwrap(), r#"{"z":1,"a":"two"}"#);
}

#[test]
fn test_display() {
    let fields = crate::fields! { "grpc.code" => "ok", "grpc.time_ms" => 1.5 };
    assert_eq!(fields.to_string(), "grpc.code=ok grpc.time_ms=1.5");
}
