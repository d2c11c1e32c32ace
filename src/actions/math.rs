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

//! Arithmetic and comparisons with the blob as left operand.
//!
//! The right operand may be a literal or any callable; callables are resolved
//! against the blob first, so `math.add(x => x)` doubles a number.

use std::cmp::Ordering;

use crate::action::{ZcArgs, ZcFnAction, ZcSyncAction};
use crate::errors::{Result, ZcError};
use crate::registry::ZcRegistry;
use crate::value::{expect_number, ZcValue};

type ZcArith = fn(f64, f64) -> Result<f64>;
type ZcCompare = fn(Ordering) -> bool;

pub fn register(registry: &mut ZcRegistry) {
    let arithmetic: [(&str, ZcArith); 5] = [
        ("add", |a, b| Ok(a + b)),
        ("sub", |a, b| Ok(a - b)),
        ("mul", |a, b| Ok(a * b)),
        ("div", |a, b| {
            if b == 0.0 {
                Err(ZcError::action("division by zero"))
            } else {
                Ok(a / b)
            }
        }),
        ("mod", |a, b| {
            if b == 0.0 {
                Err(ZcError::action("modulo by zero"))
            } else {
                Ok(a % b)
            }
        }),
    ];
    for (name, op) in arithmetic {
        registry.register_action(
            "math",
            name,
            ZcFnAction(move |blob, args| arith(blob, args, op)),
        );
    }

    let comparisons: [(&str, ZcCompare); 4] = [
        ("gt", |o| o == Ordering::Greater),
        ("gte", |o| o != Ordering::Less),
        ("lt", |o| o == Ordering::Less),
        ("lte", |o| o != Ordering::Greater),
    ];
    for (name, test) in comparisons {
        registry.register_action(
            "math",
            name,
            ZcFnAction(move |blob, args| compare(blob, args, test)),
        );
    }

    registry.register_action("math", "eq", ZcFnAction(|blob, args| equals(blob, args, true)));
    registry.register_action("math", "neq", ZcFnAction(|blob, args| equals(blob, args, false)));
    registry.register_action("math", "not", ZcSyncAction(not));
    registry.register_action("math", "abs", ZcSyncAction(abs));
    registry.register_action("math", "round", ZcSyncAction(round));
}

async fn operand(blob: &ZcValue, args: &ZcArgs) -> Result<ZcValue> {
    args.call(0, blob.clone(), Vec::new()).await
}

async fn arith(blob: ZcValue, args: ZcArgs, op: ZcArith) -> Result<ZcValue> {
    let left = expect_number(&blob)?;
    let right = expect_number(&operand(&blob, &args).await?)?;
    Ok(ZcValue::from(op(left, right)?))
}

async fn compare(blob: ZcValue, args: ZcArgs, test: ZcCompare) -> Result<ZcValue> {
    let left = expect_number(&blob)?;
    let right = expect_number(&operand(&blob, &args).await?)?;
    let ordering = left.partial_cmp(&right);
    Ok(ZcValue::Bool(ordering.map(test).unwrap_or(false)))
}

async fn equals(blob: ZcValue, args: ZcArgs, expected: bool) -> Result<ZcValue> {
    let right = operand(&blob, &args).await?;
    Ok(ZcValue::Bool((blob.compare(&right) == Ordering::Equal) == expected))
}

fn not(blob: ZcValue, _args: &ZcArgs) -> Result<ZcValue> {
    Ok(ZcValue::Bool(!blob.is_truthy()))
}

fn abs(blob: ZcValue, _args: &ZcArgs) -> Result<ZcValue> {
    Ok(ZcValue::from(expect_number(&blob)?.abs()))
}

/// Rounds half away from zero to `digits` decimals (default 0).
fn round(blob: ZcValue, args: &ZcArgs) -> Result<ZcValue> {
    let value = expect_number(&blob)?;
    let digits = args.opt_number(0)?.unwrap_or(0.0).clamp(0.0, 15.0) as i32;
    let scale = 10f64.powi(digits);
    Ok(ZcValue::from((value * scale).round() / scale))
}
