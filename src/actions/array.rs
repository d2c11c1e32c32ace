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

//! Collection transforms over array blobs.
//!
//! Every callable argument is awaited element by element, in order; nothing
//! is evaluated concurrently. Callables receive the element as blob and the
//! index as their second argument.

use std::cmp::Ordering;

use crate::action::{ZcArgs, ZcFnAction, ZcSyncAction};
use crate::errors::Result;
use crate::registry::ZcRegistry;
use crate::value::{expect_array, ZcValue};

pub fn register(registry: &mut ZcRegistry) {
    registry.register_action("array", "map", ZcFnAction(map));
    registry.register_action("array", "filter", ZcFnAction(filter));
    registry.register_action("array", "each", ZcFnAction(each));
    registry.register_action("array", "reduce", ZcFnAction(reduce));
    registry.register_action("array", "sort", ZcFnAction(sort));
    registry.register_method("array", "sort", "desc", ZcFnAction(sort_desc));
    registry.register_action("array", "length", ZcSyncAction(length));
    registry.register_action("array", "first", ZcSyncAction(first));
    registry.register_action("array", "last", ZcSyncAction(last));
    registry.register_action("array", "reverse", ZcSyncAction(reverse));
    registry.register_action("array", "join", ZcSyncAction(join));
    registry.register_action("array", "flatten", ZcSyncAction(flatten));
    registry.register_action("array", "includes", ZcSyncAction(includes));
    registry.register_action("array", "slice", ZcSyncAction(slice));
    registry.register_action("array", "push", ZcSyncAction(push));
    registry.register_action("array", "unique", ZcSyncAction(unique));
}

fn index(i: usize) -> Vec<ZcValue> {
    vec![ZcValue::from(i)]
}

async fn map(blob: ZcValue, args: ZcArgs) -> Result<ZcValue> {
    let items = expect_array(blob)?;
    let f = args.callable(0)?;
    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        out.push(f.call(item, index(i)).await?);
    }
    Ok(ZcValue::Array(out))
}

async fn filter(blob: ZcValue, args: ZcArgs) -> Result<ZcValue> {
    let items = expect_array(blob)?;
    let f = args.callable(0)?;
    let mut out = Vec::new();
    for (i, item) in items.into_iter().enumerate() {
        if f.call(item.clone(), index(i)).await?.is_truthy() {
            out.push(item);
        }
    }
    Ok(ZcValue::Array(out))
}

async fn each(blob: ZcValue, args: ZcArgs) -> Result<ZcValue> {
    let items = expect_array(blob)?;
    let f = args.callable(0)?;
    for (i, item) in items.iter().enumerate() {
        f.call(item.clone(), index(i)).await?;
    }
    Ok(ZcValue::Array(items))
}

/// `reduce(f, init)`: `f(acc, item, index)`; without `init` the first
/// element seeds the accumulator.
async fn reduce(blob: ZcValue, args: ZcArgs) -> Result<ZcValue> {
    let mut items = expect_array(blob)?.into_iter().enumerate();
    let f = args.callable(0)?;
    let mut acc = match args.value(1)? {
        Some(init) => init.clone(),
        None => match items.next() {
            Some((_, head)) => head,
            None => return Ok(ZcValue::Null),
        },
    };
    for (i, item) in items {
        acc = f.call(acc, vec![item, ZcValue::from(i)]).await?;
    }
    Ok(acc)
}

/// Stable sort, by the natural order or by keys computed with the argument.
async fn sorted(blob: ZcValue, args: &ZcArgs, descending: bool) -> Result<ZcValue> {
    let order = |a: &ZcValue, b: &ZcValue| {
        if descending {
            b.compare(a)
        } else {
            a.compare(b)
        }
    };
    let mut items = expect_array(blob)?;
    let key = match args.opt_callable(0) {
        Some(key) => key,
        None => {
            items.sort_by(|a, b| order(a, b));
            return Ok(ZcValue::Array(items));
        }
    };
    let mut keyed = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        keyed.push((key.call(item.clone(), index(i)).await?, item));
    }
    keyed.sort_by(|(a, _), (b, _)| order(a, b));
    Ok(ZcValue::Array(keyed.into_iter().map(|(_, item)| item).collect()))
}

async fn sort(blob: ZcValue, args: ZcArgs) -> Result<ZcValue> {
    sorted(blob, &args, false).await
}

async fn sort_desc(blob: ZcValue, args: ZcArgs) -> Result<ZcValue> {
    sorted(blob, &args, true).await
}

fn length(blob: ZcValue, _args: &ZcArgs) -> Result<ZcValue> {
    Ok(ZcValue::from(expect_array(blob)?.len()))
}

fn first(blob: ZcValue, _args: &ZcArgs) -> Result<ZcValue> {
    Ok(expect_array(blob)?.into_iter().next().unwrap_or_default())
}

fn last(blob: ZcValue, _args: &ZcArgs) -> Result<ZcValue> {
    Ok(expect_array(blob)?.pop().unwrap_or_default())
}

fn reverse(blob: ZcValue, _args: &ZcArgs) -> Result<ZcValue> {
    let mut items = expect_array(blob)?;
    items.reverse();
    Ok(ZcValue::Array(items))
}

fn join(blob: ZcValue, args: &ZcArgs) -> Result<ZcValue> {
    let separator = args.opt_string(0)?.unwrap_or_else(|| ",".to_string());
    let parts: Vec<String> = expect_array(blob)?.iter().map(ZcValue::render).collect();
    Ok(ZcValue::from(parts.join(&separator)))
}

fn flatten(blob: ZcValue, _args: &ZcArgs) -> Result<ZcValue> {
    let mut out = Vec::new();
    for item in expect_array(blob)? {
        match item {
            ZcValue::Array(inner) => out.extend(inner),
            other => out.push(other),
        }
    }
    Ok(ZcValue::Array(out))
}

fn includes(blob: ZcValue, args: &ZcArgs) -> Result<ZcValue> {
    let needle = args.require_value(0)?;
    let found = expect_array(blob)?
        .iter()
        .any(|item| item.compare(needle) == Ordering::Equal);
    Ok(ZcValue::Bool(found))
}

/// Resolves a possibly negative index against `len`.
fn clamp_index(index: f64, len: usize) -> usize {
    let index = index.trunc();
    if index < 0.0 {
        len.saturating_sub((-index) as usize)
    } else {
        (index as usize).min(len)
    }
}

fn slice(blob: ZcValue, args: &ZcArgs) -> Result<ZcValue> {
    let items = expect_array(blob)?;
    let len = items.len();
    let start = clamp_index(args.opt_number(0)?.unwrap_or(0.0), len);
    let end = args
        .opt_number(1)?
        .map(|end| clamp_index(end, len))
        .unwrap_or(len);
    if start >= end {
        return Ok(ZcValue::Array(Vec::new()));
    }
    Ok(ZcValue::Array(items[start..end].to_vec()))
}

fn push(blob: ZcValue, args: &ZcArgs) -> Result<ZcValue> {
    let mut items = expect_array(blob)?;
    for i in 0..args.len() {
        items.push(args.require_value(i)?.clone());
    }
    Ok(ZcValue::Array(items))
}

fn unique(blob: ZcValue, _args: &ZcArgs) -> Result<ZcValue> {
    let mut out: Vec<ZcValue> = Vec::new();
    for item in expect_array(blob)? {
        if !out.iter().any(|seen| seen.compare(&item) == Ordering::Equal) {
            out.push(item);
        }
    }
    Ok(ZcValue::Array(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ZcArg, ZcCallable};

    fn nums(values: &[i64]) -> ZcValue {
        ZcValue::Array(values.iter().map(|n| ZcValue::from(*n)).collect())
    }

    fn args(items: Vec<ZcArg>) -> ZcArgs {
        ZcArgs::new("array", "test", None, items)
    }

    #[tokio::test]
    async fn sort_by_key_is_stable() {
        let key = ZcCallable::from_sync(|blob, _| {
            Ok(ZcValue::from(blob.as_f64().unwrap_or(0.0).rem_euclid(2.0)))
        });
        let out = sort(nums(&[3, 2, 1, 4]), args(vec![ZcArg::Callable(key)]))
            .await
            .unwrap();
        assert_eq!(out, nums(&[2, 4, 3, 1]));
    }

    #[tokio::test]
    async fn sort_desc_keeps_ties_in_order() {
        let key = ZcCallable::from_sync(|blob, _| {
            Ok(ZcValue::from(blob.as_f64().unwrap_or(0.0).rem_euclid(2.0)))
        });
        let out = sort_desc(nums(&[1, 2, 3, 4]), args(vec![ZcArg::Callable(key)]))
            .await
            .unwrap();
        assert_eq!(out, nums(&[1, 3, 2, 4]));
    }

    #[tokio::test]
    async fn reduce_without_seed_uses_first_element() {
        let add = ZcCallable::from_sync(|acc, extra| {
            Ok(ZcValue::from(
                acc.as_f64().unwrap_or(0.0) + extra[0].as_f64().unwrap_or(0.0),
            ))
        });
        let out = reduce(nums(&[1, 2, 3]), args(vec![ZcArg::Callable(add)]))
            .await
            .unwrap();
        assert_eq!(out, ZcValue::from(6));
    }

    #[test]
    fn slice_accepts_negative_bounds() {
        let out = slice(
            nums(&[1, 2, 3, 4]),
            &args(vec![ZcArg::Value(ZcValue::from(-3)), ZcArg::Value(ZcValue::from(-1))]),
        )
        .unwrap();
        assert_eq!(out, nums(&[2, 3]));
    }

    #[test]
    fn non_array_blob_reports_kind() {
        let err = length(ZcValue::from("abc"), &args(vec![])).unwrap_err();
        assert_eq!(err.message(), "expecting Array but found String");
    }
}
