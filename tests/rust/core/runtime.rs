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

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::json;
use zichain::{ZcEngine, ZcEngineConfig, ZcError, ZcSyncAction, ZcValue};

/// Engine with a `counter` domain: `next()` increments and returns the
/// count, `peek()` returns it.
fn counter_engine(config: ZcEngineConfig) -> (ZcEngine, Arc<AtomicUsize>) {
    let count = Arc::new(AtomicUsize::new(0));
    let mut engine = ZcEngine::with_config(config).unwrap();
    let c = count.clone();
    engine.register(
        "counter",
        "next",
        ZcSyncAction::new(move |_, _| Ok(ZcValue::from(c.fetch_add(1, Ordering::SeqCst) + 1))),
    );
    let c = count.clone();
    engine.register(
        "counter",
        "peek",
        ZcSyncAction::new(move |_, _| Ok(ZcValue::from(c.load(Ordering::SeqCst)))),
    );
    (engine, count)
}

async fn eval(script: &str, input: serde_json::Value) -> Result<ZcValue, ZcError> {
    ZcEngine::new().eval(script, ZcValue::from(input)).await
}

fn value(json: serde_json::Value) -> ZcValue {
    ZcValue::from(json)
}

#[tokio::test]
async fn test_noop_returns_input_unchanged() {
    let input = json!({"a": [1, "two", null], "b": {"c": true}});
    assert_eq!(eval("debug.noop()", input.clone()).await.unwrap(), value(input));
}

#[tokio::test]
async fn test_spine_runs_in_order() {
    assert_eq!(eval("math.add(1).mul(2)", json!(3)).await.unwrap(), value(json!(8)));
}

#[tokio::test]
async fn test_compiled_graph_is_reusable() {
    let engine = ZcEngine::new();
    let graph = engine.compile("array.map(math.mul(2)).array.length()").unwrap();
    let first = engine.run(&graph, value(json!([1, 2, 3]))).await.unwrap();
    let second = engine.run(&graph, value(json!([4]))).await.unwrap();
    assert_eq!(first, value(json!(3)));
    assert_eq!(second, value(json!(1)));
}

#[tokio::test]
async fn test_step_cascade_picks_one_branch() {
    let script = "step.if(math.gt(5)).then('big').elif(math.gt(2)).then('mid').else('small')";
    assert_eq!(eval(script, json!(7)).await.unwrap(), value(json!("big")));
    assert_eq!(eval(script, json!(3)).await.unwrap(), value(json!("mid")));
    assert_eq!(eval(script, json!(1)).await.unwrap(), value(json!("small")));
}

#[tokio::test]
async fn test_untaken_branch_without_else_passes_blob() {
    let out = eval("step.if(math.gt(5)).then('big').math.add(1)", json!(1)).await.unwrap();
    assert_eq!(out, value(json!(2)));
}

#[tokio::test]
async fn test_conditional_without_test_uses_blob_truthiness() {
    assert_eq!(eval("step.if().then('yes').else('no')", json!("x")).await.unwrap(), value(json!("yes")));
    assert_eq!(eval("step.if().then('yes').else('no')", json!(null)).await.unwrap(), value(json!("no")));
}

#[tokio::test]
async fn test_loop_retests_against_original_input() {
    let (engine, count) = counter_engine(ZcEngineConfig::default());
    let out = engine
        .eval(
            "loop.if(counter.peek().math.lt(3)).then(counter.next())",
            ZcValue::Null,
        )
        .await
        .unwrap();
    assert_eq!(out, ZcValue::from(3));
    assert_eq!(count.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_feedback_loop_threads_output() {
    let out = eval("iterate.if(math.lt(100)).then(math.mul(2))", json!(3)).await.unwrap();
    assert_eq!(out, value(json!(192)));
}

#[tokio::test]
async fn test_loop_else_runs_when_first_test_fails() {
    let out = eval("iterate.if(math.lt(0)).then(math.mul(2)).else('none')", json!(5))
        .await
        .unwrap();
    assert_eq!(out, value(json!("none")));
}

#[tokio::test]
async fn test_conditional_loop_respects_limit() {
    let engine = ZcEngine::with_config(ZcEngineConfig::default().with_loop_limit(Some(10))).unwrap();
    let err = engine
        .eval("loop.if(true).then(math.add(1))", ZcValue::from(0))
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some("LOOP_LIMIT"));
    assert_eq!(err.domain(), Some("loop"));
}

#[tokio::test]
async fn test_catch_receives_blob_and_error() {
    let out = eval("error.throw('boom').error.catch((b, e) => [b, e])", json!(1))
        .await
        .unwrap();
    let items = out.as_array().unwrap();
    assert_eq!(items[0], ZcValue::from(1));
    match &items[1] {
        ZcValue::Error(err) => {
            assert_eq!(err.message, "boom");
            assert_eq!(err.domain.as_deref(), Some("error"));
            assert_eq!(err.action.as_deref(), Some("throw"));
        }
        other => panic!("expected an error value, got {other:?}"),
    }
}

#[tokio::test]
async fn test_catch_handler_reads_error_fields() {
    let out = eval(
        "error.throw('boom', 'E1').error.catch((b, e) => e.record.get('code'))",
        json!(null),
    )
    .await
    .unwrap();
    assert_eq!(out, value(json!("E1")));
}

#[tokio::test]
async fn test_catch_without_handler_resumes_with_failed_input() {
    let out = eval("math.add(1).error.throw('x').error.catch().math.mul(10)", json!(1))
        .await
        .unwrap();
    assert_eq!(out, value(json!(20)));
}

#[tokio::test]
async fn test_abort_bypasses_catch() {
    let err = eval("error.abort('stop').error.catch(0)", json!(null)).await.unwrap_err();
    assert!(err.is_abort());
    assert_eq!(err.message(), "stop");
}

#[tokio::test]
async fn test_uncaught_error_stops_the_run() {
    let (engine, count) = counter_engine(ZcEngineConfig::default());
    let err = engine
        .eval("error.throw('x').counter.next()", ZcValue::Null)
        .await
        .unwrap_err();
    assert_eq!(err.domain(), Some("error"));
    assert_eq!(err.action_name(), Some("throw"));
    assert_eq!(count.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_nested_failure_keeps_its_origin() {
    let err = eval("array.map(math.div(0))", json!([1])).await.unwrap_err();
    assert_eq!(err.domain(), Some("math"));
    assert_eq!(err.action_name(), Some("div"));

    let err = eval("error.throw('x').error.catch(math.div(0))", json!(1)).await.unwrap_err();
    assert_eq!(err.action_name(), Some("div"));
}

#[tokio::test]
async fn test_type_errors_use_the_uniform_message() {
    let err = eval("string.upper()", json!(5)).await.unwrap_err();
    assert_eq!(err.message(), "expecting String but found Number");
    assert_eq!(err.domain(), Some("string"));
}

#[tokio::test]
async fn test_lambdas_capture_enclosing_parameters() {
    let out = eval("loop.range(1, 3, (i, b) => b.array.map(x => math.mul(i)))", json!([1, 2]))
        .await
        .unwrap();
    assert_eq!(out, value(json!([[1, 2], [2, 4]])));
}

#[tokio::test]
async fn test_sub_chain_runs_once_per_element() {
    let (engine, count) = counter_engine(ZcEngineConfig::default());
    let out = engine
        .eval("array.map(counter.next())", value(json!(["a", "b", "c"])))
        .await
        .unwrap();
    assert_eq!(out, value(json!([1, 2, 3])));
    assert_eq!(count.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_forever_fails_after_exactly_n_calls() {
    let (engine, count) = counter_engine(ZcEngineConfig::default());
    let err = engine
        .eval(
            "loop.forever(counter.next().math.lt(4).error.assert())",
            ZcValue::Null,
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some("ASSERT"));
    assert_eq!(err.action_name(), Some("assert"));
    assert_eq!(count.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn test_trace_does_not_change_results() {
    let engine = ZcEngine::with_config(ZcEngineConfig::default().with_trace(true)).unwrap();
    let out = engine.eval("math.add(2)", ZcValue::from(1)).await.unwrap();
    assert_eq!(out, ZcValue::from(3));
}

#[tokio::test]
async fn test_free_functions_use_default_library() {
    let graph = zichain::compile("string.upper()").unwrap();
    let out = zichain::run(&graph, ZcValue::from("abc")).await.unwrap();
    assert_eq!(out, ZcValue::from("ABC"));
}
