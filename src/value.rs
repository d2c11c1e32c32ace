//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of ZiChain.
//! The ZiChain project belongs to the Dunimd Team.
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

//! # ZiChain Value Module
//!
//! This module provides the blob: the single dynamic value that flows from
//! step to step through a ZiChain pipeline.
//!
//! ## Design Principles
//!
//! - **Closed**: a blob is always one of eight kinds ([`ZcKind`]); actions
//!   match on [`ZcValue`] exhaustively instead of probing shapes
//! - **Checked**: actions assert the kinds they accept with [`assert_type`],
//!   which produces the uniform `expecting A or B but found C` message
//! - **JSON-friendly**: blobs convert to and from `serde_json::Value`; binary
//!   payloads travel as base64 strings
//!
//! ## Usage Example
//!
//! ```rust
//! use zichain::value::{ZcKind, ZcValue, assert_type};
//! use serde_json::json;
//!
//! let blob = ZcValue::from(json!({"name": "zi", "tags": ["a", "b"]}));
//! assert_eq!(blob.kind(), ZcKind::Record);
//! assert!(assert_type(&blob, &[ZcKind::Array, ZcKind::String]).is_err());
//! ```

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use base64::Engine as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};

use crate::errors::{Result, ZcError, ZcRuntimeError};

/// Record payload, ordered by key.
pub type ZcRecord = BTreeMap<String, ZcValue>;

/// The closed set of blob kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ZcKind {
    Null,
    Boolean,
    Number,
    String,
    Binary,
    Array,
    Record,
    Error,
}

impl ZcKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ZcKind::Null => "Null",
            ZcKind::Boolean => "Boolean",
            ZcKind::Number => "Number",
            ZcKind::String => "String",
            ZcKind::Binary => "Binary",
            ZcKind::Array => "Array",
            ZcKind::Record => "Record",
            ZcKind::Error => "Error",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Null" => Some(ZcKind::Null),
            "Boolean" => Some(ZcKind::Boolean),
            "Number" => Some(ZcKind::Number),
            "String" => Some(ZcKind::String),
            "Binary" => Some(ZcKind::Binary),
            "Array" => Some(ZcKind::Array),
            "Record" => Some(ZcKind::Record),
            "Error" => Some(ZcKind::Error),
            _ => None,
        }
    }
}

impl fmt::Display for ZcKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dynamic value flowing through a pipeline.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum ZcValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Binary(Vec<u8>),
    Array(Vec<ZcValue>),
    Record(ZcRecord),
    Error(Box<ZcRuntimeError>),
}

impl ZcValue {
    pub fn kind(&self) -> ZcKind {
        match self {
            ZcValue::Null => ZcKind::Null,
            ZcValue::Bool(_) => ZcKind::Boolean,
            ZcValue::Number(_) => ZcKind::Number,
            ZcValue::String(_) => ZcKind::String,
            ZcValue::Binary(_) => ZcKind::Binary,
            ZcValue::Array(_) => ZcKind::Array,
            ZcValue::Record(_) => ZcKind::Record,
            ZcValue::Error(_) => ZcKind::Error,
        }
    }

    /// Truthiness used by conditionals, filters and assertions.
    pub fn is_truthy(&self) -> bool {
        match self {
            ZcValue::Null => false,
            ZcValue::Bool(b) => *b,
            ZcValue::Number(n) => *n != 0.0 && !n.is_nan(),
            ZcValue::String(s) => !s.is_empty(),
            ZcValue::Binary(_) | ZcValue::Array(_) | ZcValue::Record(_) => true,
            ZcValue::Error(_) => false,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ZcValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ZcValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ZcValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ZcValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<ZcValue>> {
        match self {
            ZcValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&ZcRecord> {
        match self {
            ZcValue::Record(map) => Some(map),
            _ => None,
        }
    }

    /// Builds an error blob from a runtime failure.
    pub fn error(err: ZcRuntimeError) -> Self {
        ZcValue::Error(Box::new(err))
    }

    /// Total order used by default sorting.
    ///
    /// Values of different kinds order by kind; numbers order numerically with
    /// `NaN` last; arrays order lexicographically.
    pub fn compare(&self, other: &ZcValue) -> Ordering {
        match (self, other) {
            (ZcValue::Null, ZcValue::Null) => Ordering::Equal,
            (ZcValue::Bool(a), ZcValue::Bool(b)) => a.cmp(b),
            (ZcValue::Number(a), ZcValue::Number(b)) => match a.partial_cmp(b) {
                Some(ord) => ord,
                None => a.is_nan().cmp(&b.is_nan()),
            },
            (ZcValue::String(a), ZcValue::String(b)) => a.cmp(b),
            (ZcValue::Binary(a), ZcValue::Binary(b)) => a.cmp(b),
            (ZcValue::Array(a), ZcValue::Array(b)) => {
                for (x, y) in a.iter().zip(b.iter()) {
                    let ord = x.compare(y);
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                a.len().cmp(&b.len())
            }
            (ZcValue::Record(a), ZcValue::Record(b)) => {
                for ((ka, va), (kb, vb)) in a.iter().zip(b.iter()) {
                    let ord = ka.cmp(kb).then_with(|| va.compare(vb));
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                a.len().cmp(&b.len())
            }
            (ZcValue::Error(a), ZcValue::Error(b)) => a.message.cmp(&b.message),
            (a, b) => a.kind().cmp(&b.kind()),
        }
    }

    /// Converts the blob into JSON. Binary becomes a base64 string and errors
    /// become records.
    pub fn to_json(&self) -> Value {
        match self {
            ZcValue::Null => Value::Null,
            ZcValue::Bool(b) => Value::Bool(*b),
            ZcValue::Number(n) => number_to_json(*n),
            ZcValue::String(s) => Value::String(s.clone()),
            ZcValue::Binary(bytes) => {
                Value::String(base64::engine::general_purpose::STANDARD.encode(bytes))
            }
            ZcValue::Array(items) => Value::Array(items.iter().map(ZcValue::to_json).collect()),
            ZcValue::Record(map) => {
                let mut obj = Map::new();
                for (k, v) in map {
                    obj.insert(k.clone(), v.to_json());
                }
                Value::Object(obj)
            }
            ZcValue::Error(err) => serde_json::to_value(err.as_ref()).unwrap_or(Value::Null),
        }
    }

    /// Text rendering: strings render raw, everything else as compact JSON.
    pub fn render(&self) -> String {
        match self {
            ZcValue::String(s) => s.clone(),
            ZcValue::Number(_) | ZcValue::Bool(_) | ZcValue::Null => self.to_json().to_string(),
            ZcValue::Binary(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            ZcValue::Error(err) => err.message.clone(),
            other => other.to_json().to_string(),
        }
    }
}

fn number_to_json(n: f64) -> Value {
    if n.fract() == 0.0 && n.is_finite() && n.abs() < 9.007_199_254_740_992e15 {
        Value::Number(Number::from(n as i64))
    } else {
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}

impl fmt::Display for ZcValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<Value> for ZcValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => ZcValue::Null,
            Value::Bool(b) => ZcValue::Bool(b),
            Value::Number(n) => ZcValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            Value::String(s) => ZcValue::String(s),
            Value::Array(items) => ZcValue::Array(items.into_iter().map(ZcValue::from).collect()),
            Value::Object(map) => {
                ZcValue::Record(map.into_iter().map(|(k, v)| (k, ZcValue::from(v))).collect())
            }
        }
    }
}

impl From<ZcValue> for Value {
    fn from(value: ZcValue) -> Self {
        value.to_json()
    }
}

impl From<bool> for ZcValue {
    fn from(b: bool) -> Self {
        ZcValue::Bool(b)
    }
}

impl From<f64> for ZcValue {
    fn from(n: f64) -> Self {
        ZcValue::Number(n)
    }
}

impl From<i64> for ZcValue {
    fn from(n: i64) -> Self {
        ZcValue::Number(n as f64)
    }
}

impl From<i32> for ZcValue {
    fn from(n: i32) -> Self {
        ZcValue::Number(n as f64)
    }
}

impl From<usize> for ZcValue {
    fn from(n: usize) -> Self {
        ZcValue::Number(n as f64)
    }
}

impl From<&str> for ZcValue {
    fn from(s: &str) -> Self {
        ZcValue::String(s.to_string())
    }
}

impl From<String> for ZcValue {
    fn from(s: String) -> Self {
        ZcValue::String(s)
    }
}

impl From<Vec<ZcValue>> for ZcValue {
    fn from(items: Vec<ZcValue>) -> Self {
        ZcValue::Array(items)
    }
}

impl From<ZcRecord> for ZcValue {
    fn from(map: ZcRecord) -> Self {
        ZcValue::Record(map)
    }
}

impl Serialize for ZcValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ZcValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Value::deserialize(deserializer).map(ZcValue::from)
    }
}

/// Builds the uniform assertion message, e.g. `expecting A, B or C but found D`.
pub fn expecting_message(expected: &[ZcKind], found: ZcKind) -> String {
    let names: Vec<&str> = expected.iter().map(ZcKind::as_str).collect();
    let list = match names.split_last() {
        None => String::from("nothing"),
        Some((last, [])) => last.to_string(),
        Some((last, rest)) => format!("{} or {}", rest.join(", "), last),
    };
    format!("expecting {} but found {}", list, found)
}

/// Asserts that `value` is one of the `expected` kinds.
pub fn assert_type(value: &ZcValue, expected: &[ZcKind]) -> Result<()> {
    let found = value.kind();
    if expected.contains(&found) {
        Ok(())
    } else {
        Err(ZcError::type_error(expecting_message(expected, found)))
    }
}

pub fn expect_array(value: ZcValue) -> Result<Vec<ZcValue>> {
    match value {
        ZcValue::Array(items) => Ok(items),
        other => Err(ZcError::type_error(expecting_message(&[ZcKind::Array], other.kind()))),
    }
}

pub fn expect_string(value: ZcValue) -> Result<String> {
    match value {
        ZcValue::String(s) => Ok(s),
        other => Err(ZcError::type_error(expecting_message(&[ZcKind::String], other.kind()))),
    }
}

pub fn expect_number(value: &ZcValue) -> Result<f64> {
    match value {
        ZcValue::Number(n) => Ok(*n),
        other => Err(ZcError::type_error(expecting_message(&[ZcKind::Number], other.kind()))),
    }
}

pub fn expect_record(value: ZcValue) -> Result<ZcRecord> {
    match value {
        ZcValue::Record(map) => Ok(map),
        other => Err(ZcError::type_error(expecting_message(&[ZcKind::Record], other.kind()))),
    }
}
