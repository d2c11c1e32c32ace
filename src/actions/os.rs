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

//! Open-ended `os` domain: `os.<cmd>(args...)` runs `cmd` with the rendered
//! arguments and `os.<cmd>.<sub>(args...)` runs `cmd sub args...`.
//!
//! The blob is piped to the child's stdin: strings and binaries as they are,
//! other values in their compact JSON form. A null blob gives the child no
//! input. The result is the child's stdout as a string, without its trailing
//! newline.

use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::action::{ZcArgs, ZcFnAction};
use crate::errors::{Result, ZcError, ZcRuntimeError, ZcRuntimeErrorKind};
use crate::registry::ZcRegistry;
use crate::value::ZcValue;

pub fn register(registry: &mut ZcRegistry) {
    registry.register_open_domain("os", ZcFnAction(run_command));
}

fn stdin_bytes(blob: &ZcValue) -> Option<Vec<u8>> {
    match blob {
        ZcValue::String(s) => Some(s.clone().into_bytes()),
        ZcValue::Binary(bytes) => Some(bytes.clone()),
        ZcValue::Null => None,
        other => Some(other.render().into_bytes()),
    }
}

async fn run_command(blob: ZcValue, args: ZcArgs) -> Result<ZcValue> {
    let program = args.action().to_string();
    let mut argv = Vec::with_capacity(args.len() + 1);
    if let Some(method) = args.method() {
        argv.push(method.to_string());
    }
    argv.extend(args.rendered()?);

    log::debug!("os: {} {:?}", program, argv);

    let input = stdin_bytes(&blob);
    let mut command = Command::new(&program);
    command
        .args(&argv)
        .stdin(if input.is_some() { Stdio::piped() } else { Stdio::null() })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = command
        .spawn()
        .map_err(|e| ZcError::action(format!("failed to start `{}`: {}", program, e)))?;

    let writer = match (input, child.stdin.take()) {
        (Some(bytes), Some(mut stdin)) => Some(tokio::spawn(async move {
            let written = stdin.write_all(&bytes).await;
            drop(stdin);
            written
        })),
        _ => None,
    };

    let output = child.wait_with_output().await?;
    if let Some(writer) = writer {
        match writer.await {
            Ok(Ok(())) => {}
            // The child may exit without reading all of its input.
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
            Ok(Err(e)) => return Err(e.into()),
            Err(e) => return Err(ZcError::action(format!("stdin writer failed: {}", e))),
        }
    }

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let code = output
            .status
            .code()
            .map(|c| format!("EXIT_{}", c))
            .unwrap_or_else(|| "SIGNAL".to_string());
        let message = if stderr.is_empty() {
            format!("`{}` failed with {}", program, output.status)
        } else {
            stderr
        };
        return Err(ZcError::Runtime(
            ZcRuntimeError::new(ZcRuntimeErrorKind::Action, message).with_code(code),
        ));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stdout = stdout.strip_suffix('\n').unwrap_or(&stdout);
    let stdout = stdout.strip_suffix('\r').unwrap_or(stdout);
    Ok(ZcValue::from(stdout))
}
