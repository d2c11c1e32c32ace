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

use std::time::Duration;

use chrono::Utc;

use crate::action::{ZcArgs, ZcFnAction, ZcSyncAction};
use crate::errors::{Result, ZcError};
use crate::registry::ZcRegistry;
use crate::value::ZcValue;

pub fn register(registry: &mut ZcRegistry) {
    registry.register_action("time", "sleep", ZcFnAction(sleep));
    registry.register_action("time", "now", ZcSyncAction(now));
    registry.register_method("time", "now", "millis", ZcSyncAction(now_millis));
}

/// Suspends for `ms` milliseconds and passes the blob through.
async fn sleep(blob: ZcValue, args: ZcArgs) -> Result<ZcValue> {
    let ms = args.number(0)?;
    if !ms.is_finite() || ms < 0.0 {
        return Err(ZcError::action(format!("cannot sleep for {} ms", ms)));
    }
    tokio::time::sleep(Duration::from_millis(ms as u64)).await;
    Ok(blob)
}

fn now(_blob: ZcValue, _args: &ZcArgs) -> Result<ZcValue> {
    Ok(ZcValue::from(Utc::now().to_rfc3339()))
}

fn now_millis(_blob: ZcValue, _args: &ZcArgs) -> Result<ZcValue> {
    Ok(ZcValue::from(Utc::now().timestamp_millis()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ZcArg;

    #[tokio::test]
    async fn negative_sleep_is_rejected() {
        let args = ZcArgs::new("time", "sleep", None, vec![ZcArg::Value(ZcValue::from(-1))]);
        assert!(sleep(ZcValue::Null, args).await.is_err());
    }

    #[tokio::test]
    async fn sleep_passes_blob_through() {
        let args = ZcArgs::new("time", "sleep", None, vec![ZcArg::Value(ZcValue::from(1))]);
        assert_eq!(sleep(ZcValue::from("x"), args).await.unwrap(), ZcValue::from("x"));
    }
}
