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

use serde_json::json;
use zichain::{ZcEngine, ZcError, ZcValue};

async fn eval(script: &str, input: serde_json::Value) -> Result<ZcValue, ZcError> {
    ZcEngine::new().eval(script, ZcValue::from(input)).await
}

async fn eval_json(script: &str, input: serde_json::Value) -> serde_json::Value {
    match eval(script, input).await {
        Ok(value) => value.to_json(),
        Err(err) => panic!("{script} failed: {err}"),
    }
}

#[tokio::test]
async fn test_array_filter_sort_join() {
    let out = eval_json(
        "array.filter(math.gt(1)).sort().map(cast.string()).join('|')",
        json!([3, 1, 5, 2]),
    )
    .await;
    assert_eq!(out, json!("2|3|5"));
}

#[tokio::test]
async fn test_array_sort_by_key_and_descending() {
    let people = json!([
        {"name": "ann", "age": 41},
        {"name": "bob", "age": 23},
        {"name": "cid", "age": 35}
    ]);
    let out = eval_json("array.sort(record.get('age')).map(record.get('name'))", people.clone()).await;
    assert_eq!(out, json!(["bob", "cid", "ann"]));

    let out = eval_json("array.sort.desc(record.get('age')).first().record.get('name')", people).await;
    assert_eq!(out, json!("ann"));
}

#[tokio::test]
async fn test_array_reduce_with_lambda() {
    let out = eval_json("array.reduce((acc, x) => acc.math.add(x), 10)", json!([1, 2, 3])).await;
    assert_eq!(out, json!(16));
}

#[tokio::test]
async fn test_array_map_receives_index() {
    let out = eval_json("array.map((x, i) => [i, x])", json!(["a", "b"])).await;
    assert_eq!(out, json!([[0, "a"], [1, "b"]]));
}

#[tokio::test]
async fn test_array_shape_helpers() {
    assert_eq!(eval_json("array.flatten().unique().length()", json!([[1, 2], [2, 3], 4])).await, json!(4));
    assert_eq!(eval_json("array.slice(1, -1)", json!([1, 2, 3, 4])).await, json!([2, 3]));
    assert_eq!(eval_json("array.push(9).last()", json!([1])).await, json!(9));
    assert_eq!(eval_json("array.reverse().includes(2)", json!([1, 2])).await, json!(true));
}

#[tokio::test]
async fn test_array_filter_with_pattern() {
    let out = eval_json("array.filter(/^a/)", json!(["apple", "banana", "avocado"])).await;
    assert_eq!(out, json!(["apple", "avocado"]));
}

#[tokio::test]
async fn test_string_pipeline() {
    let out = eval_json(
        "string.split(',').array.map(string.trim().upper()).array.join('-')",
        json!(" a, b ,c"),
    )
    .await;
    assert_eq!(out, json!("A-B-C"));
}

#[tokio::test]
async fn test_string_patterns() {
    assert_eq!(eval_json("string.replace(/o/g, '0')", json!("foo boo")).await, json!("f00 b00"));
    assert_eq!(eval_json("string.replace(/o/, '0')", json!("foo")).await, json!("f0o"));
    assert_eq!(eval_json("string.match(/(\\d+)-(\\d+)/)", json!("v 12-34")).await, json!(["12-34", "12", "34"]));
    assert_eq!(eval_json("string.starts_with('ab')", json!("abc")).await, json!(true));
}

#[tokio::test]
async fn test_math_operands_may_be_chains() {
    let out = eval_json("math.add(math.mul(2))", json!(5)).await;
    assert_eq!(out, json!(15));
    assert_eq!(eval_json("math.div(4).round(1)", json!(10)).await, json!(2.5));
    assert_eq!(eval_json("math.sub(10).abs()", json!(3)).await, json!(7));
}

#[tokio::test]
async fn test_math_division_by_zero_is_an_action_error() {
    let err = eval("math.div(0)", json!(1)).await.unwrap_err();
    assert_eq!(err.message(), "division by zero");
}

#[tokio::test]
async fn test_record_set_get_merge() {
    let out = eval_json(
        "record.set('a.b', 1).set('n', record.get('a.b').math.add(1)).merge({c: true})",
        json!({}),
    )
    .await;
    assert_eq!(out, json!({"a": {"b": 1}, "n": 2, "c": true}));
    assert_eq!(eval_json("record.get('missing', 'dflt')", json!({})).await, json!("dflt"));
    assert_eq!(eval_json("record.keys()", json!({"b": 1, "a": 2})).await, json!(["a", "b"]));
}

#[tokio::test]
async fn test_codecs() {
    let out = eval_json("yaml.parse().record.get('list')", json!("list: [x, y]\nn: 1\n")).await;
    assert_eq!(out, json!(["x", "y"]));
    let out = eval_json("json.stringify()", json!({"k": [1, null]})).await;
    assert_eq!(out, json!(r#"{"k":[1,null]}"#));
    let out = eval_json("json.parse().record.get('k')", json!(r#"{"k": "v"}"#)).await;
    assert_eq!(out, json!("v"));
}

#[tokio::test]
async fn test_casts() {
    assert_eq!(eval_json("cast.number().math.add(1)", json!(" 41 ")).await, json!(42));
    assert_eq!(eval_json("cast.string.hex()", json!("hi")).await, json!("6869"));
    assert_eq!(eval_json("cast.binary.base64().cast.string.hex()", json!("aGk=")).await, json!("6869"));
    assert_eq!(eval_json("cast.boolean()", json!("")).await, json!(false));
}

#[tokio::test]
async fn test_env_roundtrip() {
    let out = eval_json(
        "env.set('ZICHAIN_LIBRARY_TEST', 'on').env.get('ZICHAIN_LIBRARY_TEST')",
        json!(null),
    )
    .await;
    assert_eq!(out, json!("on"));
    assert_eq!(eval_json("env.get('ZICHAIN_SURELY_UNSET', 0)", json!(null)).await, json!(0));
}

#[tokio::test]
async fn test_debug_and_time_pass_the_blob() {
    let out = eval_json("debug.log('seen').level('info').time.sleep(1).debug.noop()", json!([1])).await;
    assert_eq!(out, json!([1]));
}

#[tokio::test]
async fn test_loop_drivers() {
    assert_eq!(eval_json("loop.times(3, i => math.mul(2))", json!(null)).await, json!([0, 2, 4]));
    assert_eq!(
        eval_json("loop.range(2, 4, (i, b) => b.array.push(i))", json!(["x"])).await,
        json!([["x", 2], ["x", 3]])
    );
}

#[tokio::test]
async fn test_iterate_forever_until_caught() {
    let out = eval_json(
        "iterate.forever(math.add(1).step.if(math.gt(3)).then(error.throw('done')))\
         .error.catch((b, e) => [b, e.record.get('message')])",
        json!(0),
    )
    .await;
    assert_eq!(out, json!([0, "done"]));
}

#[tokio::test]
async fn test_assert_type_and_assert() {
    let err = eval("error.assert.type('String', 'Array')", json!(1)).await.unwrap_err();
    assert_eq!(err.message(), "expecting String or Array but found Number");
    assert_eq!(eval_json("error.assert(math.gt(0), 'positive')", json!(2)).await, json!(2));
    let err = eval("error.assert(math.gt(0), 'positive')", json!(-2)).await.unwrap_err();
    assert_eq!(err.message(), "positive");
    assert_eq!(err.code(), Some("ASSERT"));
}

#[cfg(all(feature = "os", unix))]
#[tokio::test]
async fn test_os_commands_pipe_the_blob() {
    assert_eq!(eval_json("os.echo('a', 1)", json!(null)).await, json!("a 1"));
    assert_eq!(eval_json("os.tr('a-z', 'A-Z')", json!("shout")).await, json!("SHOUT"));
    assert_eq!(
        eval_json("os.echo('a b').string.split(' ').os.cat()", json!(null)).await,
        json!(r#"["a","b"]"#)
    );
    let err = eval("os.sh('-c', 'echo nope >&2; exit 4')", json!(null)).await.unwrap_err();
    assert_eq!(err.code(), Some("EXIT_4"));
    assert_eq!(err.message(), "nope");
    assert_eq!(err.domain(), Some("os"));
}
