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

use crate::action::{ZcArgs, ZcFnAction};
use crate::errors::{Result, ZcError, ZcRuntimeError, ZcRuntimeErrorKind};
use crate::registry::ZcRegistry;
use crate::value::{assert_type, ZcKind, ZcValue};

/// Code carried by failed `error.assert` calls.
pub const ZC_ASSERT_CODE: &str = "ASSERT";

pub fn register(registry: &mut ZcRegistry) {
    registry.register_action("error", "throw", ZcFnAction(throw));
    registry.register_action("error", "abort", ZcFnAction(abort));
    registry.register_action("error", "assert", ZcFnAction(assert));
    registry.register_method("error", "assert", "type", ZcFnAction(assert_kind));
    registry.register_catch("error");
}

async fn message_arg(args: &ZcArgs, blob: &ZcValue, default: &str) -> Result<String> {
    match args.get(0) {
        None => Ok(default.to_string()),
        Some(_) => Ok(args.call(0, blob.clone(), Vec::new()).await?.render()),
    }
}

/// `error.throw(msg?, code?)`. Without arguments an Error blob is rethrown
/// as-is, so `catch` handlers can pass a failure along.
async fn throw(blob: ZcValue, args: ZcArgs) -> Result<ZcValue> {
    if args.is_empty() {
        if let ZcValue::Error(err) = blob {
            return Err(ZcError::Runtime(*err));
        }
    }
    let message = message_arg(&args, &blob, "error thrown").await?;
    let mut err = ZcRuntimeError::new(ZcRuntimeErrorKind::Action, message);
    if let Some(code) = args.opt_string(1)? {
        err = err.with_code(code);
    }
    Err(ZcError::Runtime(err))
}

async fn abort(blob: ZcValue, args: ZcArgs) -> Result<ZcValue> {
    Err(ZcError::abort(message_arg(&args, &blob, "aborted").await?))
}

/// `error.assert(test, msg?)` passes the blob through when `test` holds.
async fn assert(blob: ZcValue, args: ZcArgs) -> Result<ZcValue> {
    let verdict = args.call_or_identity(0, blob.clone()).await?;
    if verdict.is_truthy() {
        return Ok(blob);
    }
    let message = match args.get(1) {
        None => format!("assertion failed for {}", blob.render()),
        Some(_) => args.call(1, blob.clone(), Vec::new()).await?.render(),
    };
    Err(ZcError::Runtime(
        ZcRuntimeError::new(ZcRuntimeErrorKind::Action, message).with_code(ZC_ASSERT_CODE),
    ))
}

/// `error.assert.type('String', 'Number')` checks the blob kind.
async fn assert_kind(blob: ZcValue, args: ZcArgs) -> Result<ZcValue> {
    let mut expected = Vec::with_capacity(args.len());
    for index in 0..args.len() {
        let name = args.string(index)?;
        let kind = ZcKind::from_name(&name)
            .ok_or_else(|| ZcError::action(format!("unknown value kind '{}'", name)))?;
        expected.push(kind);
    }
    assert_type(&blob, &expected)?;
    Ok(blob)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ZcArg;

    fn args(action: &str, method: Option<&str>, values: Vec<ZcValue>) -> ZcArgs {
        ZcArgs::new(
            "error",
            action,
            method.map(str::to_string),
            values.into_iter().map(ZcArg::Value).collect(),
        )
    }

    #[tokio::test]
    async fn throw_carries_message_and_code() {
        let err = throw(ZcValue::Null, args("throw", None, vec!["boom".into(), "E42".into()]))
            .await
            .unwrap_err();
        assert_eq!(err.message(), "boom");
        assert_eq!(err.code(), Some("E42"));
        assert!(!err.is_abort());
    }

    #[tokio::test]
    async fn throw_without_args_rethrows_error_blob() {
        let original = ZcRuntimeError::new(ZcRuntimeErrorKind::Action, "disk full")
            .annotate("file", "write");
        let err = throw(ZcValue::error(original.clone()), args("throw", None, vec![]))
            .await
            .unwrap_err();
        assert_eq!(err, ZcError::Runtime(original));
    }

    #[tokio::test]
    async fn abort_is_flagged() {
        let err = abort(ZcValue::Null, args("abort", None, vec![])).await.unwrap_err();
        assert!(err.is_abort());
    }

    #[tokio::test]
    async fn assert_type_lists_expected_kinds() {
        let err = assert_kind(
            ZcValue::from(1),
            args("assert", Some("type"), vec!["String".into(), "Array".into()]),
        )
        .await
        .unwrap_err();
        assert_eq!(err.message(), "expecting String or Array but found Number");
    }

    #[tokio::test]
    async fn assert_without_test_uses_blob_truthiness() {
        assert!(assert(ZcValue::from(1), args("assert", None, vec![])).await.is_ok());
        let err = assert(ZcValue::Null, args("assert", None, vec![])).await.unwrap_err();
        assert_eq!(err.code(), Some(ZC_ASSERT_CODE));
    }
}
