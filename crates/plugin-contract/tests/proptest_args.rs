//! Property-based tests: accessors are total and envelopes round-trip.

use plugin_contract::*;
use proptest::prelude::*;
use serde_json::{json, Value};

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        any::<u64>().prop_map(Value::from),
        any::<f64>()
            .prop_filter("JSON has no NaN or infinity", |f| f.is_finite())
            .prop_map(Value::from),
        ".*".prop_map(Value::from),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            proptest::collection::btree_map(".*", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

fn arb_args() -> impl Strategy<Value = Args> {
    proptest::collection::btree_map("[a-z]{0,4}", arb_json(), 0..6)
        .prop_map(|m| m.into_iter().collect())
}

proptest! {
    #[test]
    fn accessors_never_panic(args in arb_args(), key in "[a-z]{0,4}") {
        let _ = args.string(&key);
        let _ = args.string_or(&key, "d");
        let _ = args.int(&key);
        let _ = args.int_or(&key, 0);
        let _ = args.float(&key);
        let _ = args.float_or(&key, 0.0);
        let _ = args.bool(&key);
        let _ = args.bool_or(&key, false);
        let _ = args.string_slice(&key);
        let _ = args.object(&key);
        let _ = args.has(&key);
    }

    #[test]
    fn int_truncates_floats_toward_zero(f in -1.0e15f64..1.0e15) {
        let args = Args::new().with("n", f);
        prop_assert_eq!(args.int("n"), Some(f.trunc() as i64));
    }

    #[test]
    fn int_is_exact_for_integers(i in any::<i64>()) {
        let args = Args::new().with("n", i);
        prop_assert_eq!(args.int("n"), Some(i));
        prop_assert_eq!(args.float("n"), Some(i as f64));
    }

    #[test]
    fn string_slice_is_all_or_nothing(
        strings in proptest::collection::vec(".*", 0..5),
        intruder in arb_json().prop_filter("non-string", |v| !v.is_string()),
        position in 0usize..6,
    ) {
        let clean = Args::new().with("k", strings.clone());
        prop_assert_eq!(clean.string_slice("k"), Some(strings.clone()));

        let mut mixed: Vec<Value> = strings.into_iter().map(Value::from).collect();
        let at = position.min(mixed.len());
        mixed.insert(at, intruder);
        let dirty = Args::new().with("k", mixed);
        prop_assert_eq!(dirty.string_slice("k"), None);
    }

    #[test]
    fn decoding_arbitrary_json_never_panics(value in arb_json()) {
        let text = value.to_string();
        let _ = serde_json::from_str::<Args>(&text);
        let _ = serde_json::from_str::<PluginInvocationRequest>(&text);
        let _ = serde_json::from_str::<PluginInvocationResponse>(&text);
        let _ = serde_json::from_str::<EventPayload>(&text);
    }

    #[test]
    fn request_round_trips(
        request_id in ".*",
        call_index in any::<u32>(),
        account_id in ".*",
        method in ".*",
        client_id in ".*",
        args in arb_args(),
    ) {
        let request = PluginInvocationRequest::new(
            request_id, call_index, account_id, method, args, client_id,
        )
        .with_urls("https://cdn.example.com", "https://api.example.com");
        let json = serde_json::to_string(&request).expect("serialise");
        let back: PluginInvocationRequest = serde_json::from_str(&json).expect("deserialise");
        prop_assert_eq!(back, request);
    }

    #[test]
    fn event_round_trips_with_empty_data_absent(args in arb_args()) {
        let event = EventPayload::new(ACCOUNT_UPDATED, Timestamp::now(), "acc").with_data(args.clone());
        let value = serde_json::to_value(&event).expect("serialise");
        prop_assert_eq!(value.get("data").is_some(), !args.is_empty());
        let back: EventPayload = serde_json::from_value(value).expect("deserialise");
        prop_assert_eq!(back, event);
    }
}

#[test]
fn float_round_trip_of_integral_value_reads_as_int() {
    let args: Args = serde_json::from_value(json!({"count": 42.0})).expect("deserialise");
    assert_eq!(args.int("count"), Some(42));
}
