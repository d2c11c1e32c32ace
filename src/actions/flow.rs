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

//! Flow domains and loop drivers.
//!
//! `step`, `loop` and `iterate` provide `if`/`elif`/`else`/`then` in single
//! shot, re-test-against-input and re-test-against-output modes. The leaf
//! drivers below iterate with plain loops, one callable resolution at a time.

use crate::action::{ZcArgs, ZcCallable, ZcFnAction};
use crate::errors::{Result, ZcError};
use crate::registry::{ZcCondMode, ZcRegistry};
use crate::value::ZcValue;

pub fn register(registry: &mut ZcRegistry) {
    registry.register_flow_domain("step", ZcCondMode::Step);
    registry.register_flow_domain("loop", ZcCondMode::Loop);
    registry.register_flow_domain("iterate", ZcCondMode::Feedback);

    registry.register_action("loop", "range", ZcFnAction(range));
    registry.register_action("loop", "times", ZcFnAction(times));
    registry.register_action("loop", "forever", ZcFnAction(forever));
    registry.register_action("iterate", "forever", ZcFnAction(iterate_forever));
}

fn check_limit(args: &ZcArgs, iterations: u64) -> Result<()> {
    match args.loop_limit() {
        Some(limit) if iterations > limit => Err(ZcError::loop_limit(limit)),
        _ => Ok(()),
    }
}

/// Calls `body(i, blob)` for each `i` in `start..end`, collecting the results.
async fn drive(
    blob: ZcValue,
    args: &ZcArgs,
    start: i64,
    end: i64,
    body: ZcCallable,
) -> Result<ZcValue> {
    let mut results = Vec::new();
    let mut iterations = 0u64;
    for i in start..end {
        iterations += 1;
        check_limit(args, iterations)?;
        results.push(body.call(ZcValue::from(i), vec![blob.clone()]).await?);
    }
    Ok(ZcValue::Array(results))
}

fn integer(args: &ZcArgs, index: usize) -> Result<i64> {
    let n = args.number(index)?;
    if n.fract() != 0.0 || !n.is_finite() {
        return Err(ZcError::action(format!(
            "{}.{} argument #{} must be an integer, got {}",
            args.domain(),
            args.action(),
            index + 1,
            n
        )));
    }
    Ok(n as i64)
}

/// `loop.range(start, end, P)`.
async fn range(blob: ZcValue, args: ZcArgs) -> Result<ZcValue> {
    let start = integer(&args, 0)?;
    let end = integer(&args, 1)?;
    let body = args.callable(2)?;
    drive(blob, &args, start, end, body).await
}

/// `loop.times(n, P)`, same as `loop.range(0, n, P)`.
async fn times(blob: ZcValue, args: ZcArgs) -> Result<ZcValue> {
    let count = integer(&args, 0)?;
    let body = args.callable(1)?;
    drive(blob, &args, 0, count, body).await
}

/// Re-runs `P` against the original blob until it fails.
async fn forever(blob: ZcValue, args: ZcArgs) -> Result<ZcValue> {
    let body = args.callable(0)?;
    let mut iterations = 0u64;
    loop {
        iterations += 1;
        check_limit(&args, iterations)?;
        body.call(blob.clone(), Vec::new()).await?;
    }
}

/// Threads each output of `P` into the next call until it fails.
async fn iterate_forever(blob: ZcValue, args: ZcArgs) -> Result<ZcValue> {
    let body = args.callable(0)?;
    let mut state = blob;
    let mut iterations = 0u64;
    loop {
        iterations += 1;
        check_limit(&args, iterations)?;
        state = body.call(state, Vec::new()).await?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ZcArg;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn range_passes_index_and_blob() {
        let body = ZcCallable::from_sync(|i, extra| {
            Ok(ZcValue::Array(vec![i, extra.into_iter().next().unwrap_or_default()]))
        });
        let args = ZcArgs::new(
            "loop",
            "range",
            None,
            vec![
                ZcArg::Value(ZcValue::from(1)),
                ZcArg::Value(ZcValue::from(3)),
                ZcArg::Callable(body),
            ],
        );
        let out = range(ZcValue::from("b"), args).await.unwrap();
        let expected = ZcValue::Array(vec![
            ZcValue::Array(vec![ZcValue::from(1), ZcValue::from("b")]),
            ZcValue::Array(vec![ZcValue::from(2), ZcValue::from("b")]),
        ]);
        assert_eq!(out, expected);
    }

    #[tokio::test]
    async fn forever_stops_at_the_limit() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let body = ZcCallable::from_sync(move |blob, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(blob)
        });
        let args = ZcArgs::new("loop", "forever", None, vec![ZcArg::Callable(body)])
            .with_loop_limit(Some(4));
        let err = forever(ZcValue::Null, args).await.unwrap_err();
        assert_eq!(err.code(), Some("LOOP_LIMIT"));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn iterate_threads_state() {
        let body = ZcCallable::from_sync(|blob, _| {
            let n = blob.as_f64().unwrap_or(0.0);
            if n >= 3.0 {
                Err(ZcError::action("done"))
            } else {
                Ok(ZcValue::from(n + 1.0))
            }
        });
        let args = ZcArgs::new("iterate", "forever", None, vec![ZcArg::Callable(body)]);
        let err = iterate_forever(ZcValue::from(0), args).await.unwrap_err();
        assert_eq!(err.message(), "done");
    }

    #[test]
    fn fractional_bounds_are_rejected() {
        let args = ZcArgs::new("loop", "times", None, vec![ZcArg::Value(ZcValue::from(1.5))]);
        assert!(integer(&args, 0).is_err());
    }
}
