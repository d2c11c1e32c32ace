//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of ZiChain.
//! The ZiChain project belongs to the Dunimd project team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

use std::sync::{Arc, Mutex};

use proptest::prelude::*;
use serde_json::json;
use zichain::{ZcEngine, ZcError, ZcSyncAction, ZcValue};

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}

fn eval(engine: &ZcEngine, script: &str, input: ZcValue) -> Result<ZcValue, ZcError> {
    block_on(engine.eval(script, input))
}

/// Engine with `tap.record()`, which appends each blob it sees, and
/// `tap.seen()`, which returns how many blobs were recorded.
fn tap_engine() -> (ZcEngine, Arc<Mutex<Vec<ZcValue>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut engine = ZcEngine::new();
    let sink = seen.clone();
    engine.register(
        "tap",
        "record",
        ZcSyncAction::new(move |blob, _| {
            sink.lock().unwrap().push(blob.clone());
            Ok(blob)
        }),
    );
    let sink = seen.clone();
    engine.register(
        "tap",
        "seen",
        ZcSyncAction::new(move |_, _| Ok(ZcValue::from(sink.lock().unwrap().len()))),
    );
    (engine, seen)
}

fn json_value() -> impl Strategy<Value = serde_json::Value> {
    let leaf = prop_oneof![
        Just(serde_json::Value::Null),
        any::<bool>().prop_map(serde_json::Value::from),
        (-1000i64..1000).prop_map(serde_json::Value::from),
        "[a-z]{0,8}".prop_map(serde_json::Value::from),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(serde_json::Value::Array),
            prop::collection::btree_map("[a-z]{1,4}", inner, 0..4)
                .prop_map(|m| serde_json::Value::Object(m.into_iter().collect())),
        ]
    })
}

proptest! {
    #[test]
    fn test_noop_is_identity(input in json_value()) {
        let engine = ZcEngine::new();
        let out = eval(&engine, "debug.noop()", ZcValue::from(input.clone())).unwrap();
        prop_assert_eq!(out, ZcValue::from(input));
    }

    #[test]
    fn test_filter_then_sort_matches_std(items in prop::collection::vec(-50i64..50, 0..20), floor in -50i64..50) {
        let engine = ZcEngine::new();
        let script = format!("array.filter(math.gt({})).sort()", floor);
        let out = eval(&engine, &script, ZcValue::from(json!(items))).unwrap();

        let mut expected: Vec<i64> = items.into_iter().filter(|n| *n > floor).collect();
        expected.sort();
        prop_assert_eq!(out.to_json(), json!(expected));
    }

    #[test]
    fn test_flow_actions_never_start_a_chain(
        flow in prop::sample::select(vec!["then", "elif", "else", "catch"]),
        arg in 0i64..10,
    ) {
        let engine = ZcEngine::new();
        let script = format!("{}({}).math.add(1)", flow, arg);
        let is_compile_error = matches!(engine.compile(&script), Err(ZcError::Compile { .. }));
        prop_assert!(is_compile_error);
    }

    #[test]
    fn test_thrown_error_reaches_the_handler(input in -1000i64..1000, message in "[a-z ]{1,12}") {
        let engine = ZcEngine::new();
        let script = format!(
            "error.throw('{}').error.catch((b, e) => [b, e.record.get('message')])",
            message
        );
        let out = eval(&engine, &script, ZcValue::from(input)).unwrap();
        prop_assert_eq!(out.to_json(), json!([input, message]));
    }

    #[test]
    fn test_range_visits_each_index_in_order(start in -5i64..5, len in 0i64..12) {
        let (engine, seen) = tap_engine();
        let script = format!("loop.range({}, {}, tap.record())", start, start + len);
        eval(&engine, &script, ZcValue::Null).unwrap();

        let expected: Vec<ZcValue> = (start..start + len).map(ZcValue::from).collect();
        prop_assert_eq!(seen.lock().unwrap().clone(), expected);
    }

    #[test]
    fn test_forever_stops_after_the_failing_pass(n in 1usize..20) {
        let (engine, seen) = tap_engine();
        let script = format!(
            "loop.forever(tap.record().tap.seen().math.lt({}).error.assert())",
            n
        );
        let err = eval(&engine, &script, ZcValue::Null).unwrap_err();
        prop_assert_eq!(err.code(), Some("ASSERT"));
        prop_assert_eq!(seen.lock().unwrap().len(), n);
    }

    #[test]
    fn test_assert_type_lists_every_expected_kind(
        kinds in prop::sample::subsequence(vec!["Boolean", "String", "Array", "Record"], 1..=4),
        input in -1000i64..1000,
    ) {
        let engine = ZcEngine::new();
        let quoted: Vec<String> = kinds.iter().map(|k| format!("'{}'", k)).collect();
        let script = format!("error.assert.type({})", quoted.join(", "));
        let err = eval(&engine, &script, ZcValue::from(input)).unwrap_err();

        let list = match kinds.split_last() {
            Some((last, [])) => last.to_string(),
            Some((last, rest)) => format!("{} or {}", rest.join(", "), last),
            None => String::new(),
        };
        prop_assert_eq!(err.message(), format!("expecting {} but found Number", list));
    }

    #[test]
    fn test_map_sub_chain_runs_per_element(items in prop::collection::vec(any::<bool>(), 0..16)) {
        let (engine, seen) = tap_engine();
        let out = eval(&engine, "array.map(tap.record())", ZcValue::from(json!(items))).unwrap();
        prop_assert_eq!(seen.lock().unwrap().len(), items.len());
        prop_assert_eq!(out.to_json(), json!(items));
    }
}
