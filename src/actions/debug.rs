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
use crate::errors::{Result, ZcError};
use crate::log::parse_level_filter;
use crate::registry::ZcRegistry;
use crate::value::ZcValue;

pub fn register(registry: &mut ZcRegistry) {
    registry.register_action("debug", "noop", ZcSyncAction(noop));
    registry.register_action("debug", "log", ZcFnAction(log_blob));
    registry.register_action("debug", "level", ZcSyncAction(level));
}

fn noop(blob: ZcValue, _args: &ZcArgs) -> Result<ZcValue> {
    Ok(blob)
}

/// Logs the blob, or the argument resolved against it, and passes the blob
/// through. `debug.log('label', x => ...)` prefixes the label.
async fn log_blob(blob: ZcValue, args: ZcArgs) -> Result<ZcValue> {
    let (label, shown) = match args.len() {
        0 => (None, blob.clone()),
        1 => (None, args.call(0, blob.clone(), Vec::new()).await?),
        _ => (
            Some(args.string(0)?),
            args.call(1, blob.clone(), Vec::new()).await?,
        ),
    };
    match label {
        Some(label) => log::info!("{}: {}", label, shown.render()),
        None => log::info!("{}", shown.render()),
    }
    Ok(blob)
}

/// Sets the global maximum log level.
fn level(blob: ZcValue, args: &ZcArgs) -> Result<ZcValue> {
    let name = args.string(0)?;
    let filter = parse_level_filter(&name)
        .ok_or_else(|| ZcError::action(format!("unknown log level '{}'", name)))?;
    log::set_max_level(filter);
    Ok(blob)
}
