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

//! `json` and `yaml` domains.

use serde_json::Value;

use crate::action::{ZcArgs, ZcSyncAction};
use crate::errors::Result;
use crate::registry::ZcRegistry;
use crate::value::{expect_string, ZcValue};

pub fn register(registry: &mut ZcRegistry) {
    registry.register_action("json", "parse", ZcSyncAction(json_parse));
    registry.register_action("json", "stringify", ZcSyncAction(json_stringify));
    registry.register_method("json", "stringify", "pretty", ZcSyncAction(json_pretty));
    registry.register_action("yaml", "parse", ZcSyncAction(yaml_parse));
    registry.register_action("yaml", "stringify", ZcSyncAction(yaml_stringify));
}

fn json_parse(blob: ZcValue, _args: &ZcArgs) -> Result<ZcValue> {
    let text = expect_string(blob)?;
    let value: Value = serde_json::from_str(&text)?;
    Ok(ZcValue::from(value))
}

fn json_stringify(blob: ZcValue, _args: &ZcArgs) -> Result<ZcValue> {
    Ok(ZcValue::from(serde_json::to_string(&blob.to_json())?))
}

fn json_pretty(blob: ZcValue, _args: &ZcArgs) -> Result<ZcValue> {
    Ok(ZcValue::from(serde_json::to_string_pretty(&blob.to_json())?))
}

fn yaml_parse(blob: ZcValue, _args: &ZcArgs) -> Result<ZcValue> {
    let text = expect_string(blob)?;
    let value: Value = serde_yaml::from_str(&text)?;
    Ok(ZcValue::from(value))
}

fn yaml_stringify(blob: ZcValue, _args: &ZcArgs) -> Result<ZcValue> {
    Ok(ZcValue::from(serde_yaml::to_string(&blob.to_json())?))
}
