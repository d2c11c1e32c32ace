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

use crate::action::{ZcArg, ZcArgs, ZcSyncAction};
use crate::errors::Result;
use crate::registry::ZcRegistry;
use crate::value::{expect_string, ZcValue};

pub fn register(registry: &mut ZcRegistry) {
    registry.register_action("string", "upper", ZcSyncAction(upper));
    registry.register_action("string", "lower", ZcSyncAction(lower));
    registry.register_action("string", "trim", ZcSyncAction(trim));
    registry.register_action("string", "length", ZcSyncAction(length));
    registry.register_action("string", "split", ZcSyncAction(split));
    registry.register_action("string", "replace", ZcSyncAction(replace));
    registry.register_action("string", "match", ZcSyncAction(matches));
    registry.register_action("string", "concat", ZcSyncAction(concat));
    registry.register_action("string", "starts_with", ZcSyncAction(starts_with));
    registry.register_action("string", "ends_with", ZcSyncAction(ends_with));
}

fn upper(blob: ZcValue, _args: &ZcArgs) -> Result<ZcValue> {
    Ok(ZcValue::from(expect_string(blob)?.to_uppercase()))
}

fn lower(blob: ZcValue, _args: &ZcArgs) -> Result<ZcValue> {
    Ok(ZcValue::from(expect_string(blob)?.to_lowercase()))
}

fn trim(blob: ZcValue, _args: &ZcArgs) -> Result<ZcValue> {
    Ok(ZcValue::from(expect_string(blob)?.trim()))
}

/// Length in characters.
fn length(blob: ZcValue, _args: &ZcArgs) -> Result<ZcValue> {
    Ok(ZcValue::from(expect_string(blob)?.chars().count()))
}

/// Splits on a string or pattern; without an argument, on whitespace.
fn split(blob: ZcValue, args: &ZcArgs) -> Result<ZcValue> {
    let text = expect_string(blob)?;
    let parts: Vec<ZcValue> = match args.get(0) {
        None => text.split_whitespace().map(ZcValue::from).collect(),
        Some(ZcArg::Value(ZcValue::String(sep))) => {
            text.split(sep.as_str()).map(ZcValue::from).collect()
        }
        Some(_) => {
            let pattern = args.pattern(0)?;
            pattern.regex().split(&text).map(ZcValue::from).collect()
        }
    };
    Ok(ZcValue::Array(parts))
}

/// A string needle replaces every occurrence; a pattern replaces the first
/// match unless it carries the `g` flag.
fn replace(blob: ZcValue, args: &ZcArgs) -> Result<ZcValue> {
    let text = expect_string(blob)?;
    let replacement = args.opt_string(1)?.unwrap_or_default();
    let pattern = args.pattern(0)?;
    let out = if pattern.is_global() {
        pattern.regex().replace_all(&text, replacement.as_str())
    } else {
        pattern.regex().replace(&text, replacement.as_str())
    };
    Ok(ZcValue::from(out.into_owned()))
}

/// Global patterns yield every match; otherwise the first match's groups
/// (whole match first), or null without a match.
fn matches(blob: ZcValue, args: &ZcArgs) -> Result<ZcValue> {
    let text = expect_string(blob)?;
    let pattern = args.pattern(0)?;
    if pattern.is_global() {
        return Ok(ZcValue::Array(
            pattern
                .regex()
                .find_iter(&text)
                .map(|m| ZcValue::from(m.as_str()))
                .collect(),
        ));
    }
    Ok(match pattern.regex().captures(&text) {
        Some(caps) => ZcValue::Array(
            caps.iter()
                .map(|group| group.map(|g| ZcValue::from(g.as_str())).unwrap_or_default())
                .collect(),
        ),
        None => ZcValue::Null,
    })
}

fn concat(blob: ZcValue, args: &ZcArgs) -> Result<ZcValue> {
    let mut text = expect_string(blob)?;
    for part in args.rendered()? {
        text.push_str(&part);
    }
    Ok(ZcValue::from(text))
}

fn starts_with(blob: ZcValue, args: &ZcArgs) -> Result<ZcValue> {
    let text = expect_string(blob)?;
    Ok(ZcValue::Bool(text.starts_with(args.string(0)?.as_str())))
}

fn ends_with(blob: ZcValue, args: &ZcArgs) -> Result<ZcValue> {
    let text = expect_string(blob)?;
    Ok(ZcValue::Bool(text.ends_with(args.string(0)?.as_str())))
}
