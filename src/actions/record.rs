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

//! Field access on record blobs. Keys may be dotted paths (`a.b.c`); error
//! blobs are read as records of their fields.

use crate::action::{ZcArgs, ZcFnAction, ZcSyncAction};
use crate::errors::Result;
use crate::registry::ZcRegistry;
use crate::value::{expect_record, ZcRecord, ZcValue};

pub fn register(registry: &mut ZcRegistry) {
    registry.register_action("record", "get", ZcSyncAction(get));
    registry.register_action("record", "set", ZcFnAction(set));
    registry.register_action("record", "keys", ZcSyncAction(keys));
    registry.register_action("record", "values", ZcSyncAction(values));
    registry.register_action("record", "has", ZcSyncAction(has));
    registry.register_action("record", "merge", ZcSyncAction(merge));
}

fn as_record(blob: ZcValue) -> Result<ZcRecord> {
    match blob {
        ZcValue::Error(err) => expect_record(ZcValue::from(ZcValue::Error(err).to_json())),
        other => expect_record(other),
    }
}

fn lookup<'a>(record: &'a ZcRecord, path: &str) -> Option<&'a ZcValue> {
    let mut segments = path.split('.');
    let mut current = record.get(segments.next()?)?;
    for segment in segments {
        current = match current {
            ZcValue::Record(inner) => inner.get(segment)?,
            ZcValue::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

fn insert(record: &mut ZcRecord, path: &str, value: ZcValue) {
    match path.split_once('.') {
        None => {
            record.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let slot = record
                .entry(head.to_string())
                .or_insert_with(|| ZcValue::Record(ZcRecord::new()));
            if !matches!(slot, ZcValue::Record(_)) {
                *slot = ZcValue::Record(ZcRecord::new());
            }
            if let ZcValue::Record(inner) = slot {
                insert(inner, rest, value);
            }
        }
    }
}

/// `get(path, default?)`
fn get(blob: ZcValue, args: &ZcArgs) -> Result<ZcValue> {
    let record = as_record(blob)?;
    let path = args.string(0)?;
    match lookup(&record, &path) {
        Some(value) => Ok(value.clone()),
        None => Ok(args.value(1)?.cloned().unwrap_or_default()),
    }
}

/// `set(path, value)`; a callable value is computed from the record.
async fn set(blob: ZcValue, args: ZcArgs) -> Result<ZcValue> {
    let mut record = as_record(blob)?;
    let path = args.string(0)?;
    let value = args
        .call(1, ZcValue::Record(record.clone()), Vec::new())
        .await?;
    insert(&mut record, &path, value);
    Ok(ZcValue::Record(record))
}

fn keys(blob: ZcValue, _args: &ZcArgs) -> Result<ZcValue> {
    Ok(ZcValue::Array(
        as_record(blob)?.into_keys().map(ZcValue::from).collect(),
    ))
}

fn values(blob: ZcValue, _args: &ZcArgs) -> Result<ZcValue> {
    Ok(ZcValue::Array(as_record(blob)?.into_values().collect()))
}

fn has(blob: ZcValue, args: &ZcArgs) -> Result<ZcValue> {
    let record = as_record(blob)?;
    Ok(ZcValue::Bool(lookup(&record, &args.string(0)?).is_some()))
}

/// Shallow merge; fields of the argument win.
fn merge(blob: ZcValue, args: &ZcArgs) -> Result<ZcValue> {
    let mut record = as_record(blob)?;
    let other = as_record(args.require_value(0)?.clone())?;
    record.extend(other);
    Ok(ZcValue::Record(record))
}
