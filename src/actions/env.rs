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

use crate::action::{ZcArgs, ZcFnAction, ZcSyncAction};
use crate::errors::Result;
use crate::registry::ZcRegistry;
use crate::value::ZcValue;

pub fn register(registry: &mut ZcRegistry) {
    registry.register_action("env", "get", ZcSyncAction(get));
    registry.register_action("env", "set", ZcFnAction(set));
}

/// `get(name, default?)`; unset variables yield the default or null.
fn get(_blob: ZcValue, args: &ZcArgs) -> Result<ZcValue> {
    let name = args.string(0)?;
    match std::env::var(&name) {
        Ok(value) => Ok(ZcValue::from(value)),
        Err(_) => Ok(args.value(1)?.cloned().unwrap_or_default()),
    }
}

/// `set(name, value?)` stores the value (or the rendered blob) and passes the
/// blob through.
async fn set(blob: ZcValue, args: ZcArgs) -> Result<ZcValue> {
    let name = args.string(0)?;
    let value = args.call_or_identity(1, blob.clone()).await?;
    std::env::set_var(&name, value.render());
    log::debug!("env {} set", name);
    Ok(blob)
}
