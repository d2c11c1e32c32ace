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

use base64::Engine;

use crate::action::{ZcArgs, ZcSyncAction};
use crate::errors::{Result, ZcError};
use crate::registry::ZcRegistry;
use crate::value::{expecting_message, ZcKind, ZcValue};

pub fn register(registry: &mut ZcRegistry) {
    registry.register_action("cast", "string", ZcSyncAction(to_string));
    registry.register_method("cast", "string", "hex", ZcSyncAction(to_hex));
    registry.register_method("cast", "string", "base64", ZcSyncAction(to_base64));
    registry.register_action("cast", "number", ZcSyncAction(to_number));
    registry.register_action("cast", "boolean", ZcSyncAction(to_boolean));
    registry.register_action("cast", "binary", ZcSyncAction(to_binary));
    registry.register_method("cast", "binary", "hex", ZcSyncAction(from_hex));
    registry.register_method("cast", "binary", "base64", ZcSyncAction(from_base64));
}

fn to_string(blob: ZcValue, _args: &ZcArgs) -> Result<ZcValue> {
    Ok(ZcValue::from(blob.render()))
}

fn bytes_of(blob: ZcValue) -> Result<Vec<u8>> {
    match blob {
        ZcValue::Binary(bytes) => Ok(bytes),
        ZcValue::String(text) => Ok(text.into_bytes()),
        other => Err(ZcError::type_error(expecting_message(
            &[ZcKind::Binary, ZcKind::String],
            other.kind(),
        ))),
    }
}

fn to_hex(blob: ZcValue, _args: &ZcArgs) -> Result<ZcValue> {
    Ok(ZcValue::from(hex::encode(bytes_of(blob)?)))
}

fn to_base64(blob: ZcValue, _args: &ZcArgs) -> Result<ZcValue> {
    Ok(ZcValue::from(
        base64::engine::general_purpose::STANDARD.encode(bytes_of(blob)?),
    ))
}

fn to_number(blob: ZcValue, _args: &ZcArgs) -> Result<ZcValue> {
    let n = match &blob {
        ZcValue::Number(n) => *n,
        ZcValue::Bool(b) => f64::from(u8::from(*b)),
        ZcValue::Null => 0.0,
        ZcValue::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| ZcError::action(format!("cannot read {:?} as a number", s)))?,
        other => {
            return Err(ZcError::type_error(expecting_message(
                &[ZcKind::Number, ZcKind::String, ZcKind::Boolean, ZcKind::Null],
                other.kind(),
            )))
        }
    };
    Ok(ZcValue::Number(n))
}

fn to_boolean(blob: ZcValue, _args: &ZcArgs) -> Result<ZcValue> {
    Ok(ZcValue::Bool(blob.is_truthy()))
}

/// Strings become their UTF-8 bytes; arrays of numbers become raw bytes.
fn to_binary(blob: ZcValue, _args: &ZcArgs) -> Result<ZcValue> {
    match blob {
        ZcValue::Array(items) => {
            let mut bytes = Vec::with_capacity(items.len());
            for item in items {
                match item.as_f64() {
                    Some(n) if (0.0..=255.0).contains(&n) && n.fract() == 0.0 => bytes.push(n as u8),
                    _ => return Err(ZcError::action(format!("{} is not a byte", item.render()))),
                }
            }
            Ok(ZcValue::Binary(bytes))
        }
        other => Ok(ZcValue::Binary(bytes_of(other)?)),
    }
}

fn from_hex(blob: ZcValue, _args: &ZcArgs) -> Result<ZcValue> {
    let text = crate::value::expect_string(blob)?;
    hex::decode(text.trim())
        .map(ZcValue::Binary)
        .map_err(|e| ZcError::action(format!("invalid hex: {}", e)))
}

fn from_base64(blob: ZcValue, _args: &ZcArgs) -> Result<ZcValue> {
    let text = crate::value::expect_string(blob)?;
    base64::engine::general_purpose::STANDARD
        .decode(text.trim())
        .map(ZcValue::Binary)
        .map_err(|e| ZcError::action(format!("invalid base64: {}", e)))
}
