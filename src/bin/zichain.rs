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

//! Command line runner.
//!
//! ```text
//! zichain [--config FILE] [--input JSON | --input -] [--trace] (--file SCRIPT | SCRIPT)
//! ```
//!
//! The final blob is printed to stdout as JSON. `error.abort()` ends the run
//! with exit status 0.

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgGroup, Parser};
use zichain::{ZcEngine, ZcEngineConfig, ZcError, ZcLogger, ZcValue};

/// Compile a chain script and run it against a JSON input.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "zichain", version)]
#[command(group(ArgGroup::new("source").required(true).args(["script", "file"])))]
struct ZcCliArgs {
    /// Engine configuration file (.json, .yaml or .yml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Input blob as JSON, or `-` to read it from stdin. Defaults to null.
    #[arg(long)]
    input: Option<String>,

    /// Read the script from a file
    #[arg(long)]
    file: Option<PathBuf>,

    /// Log every node dispatch
    #[arg(long)]
    trace: bool,

    /// Chain script, e.g. `array.map(math.mul(2))`
    script: Option<String>,
}

fn read_input(input: Option<&str>) -> anyhow::Result<ZcValue> {
    let text = match input {
        None => return Ok(ZcValue::Null),
        Some("-") => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            buffer
        }
        Some(text) => text.to_string(),
    };
    let json: serde_json::Value =
        serde_json::from_str(&text).context("input is not valid JSON")?;
    Ok(ZcValue::from(json))
}

/// Maps a run result to what the runner prints: `None` for an abort.
fn settle(result: zichain::Result<ZcValue>) -> anyhow::Result<Option<ZcValue>> {
    match result {
        Ok(output) => Ok(Some(output)),
        Err(err) if err.is_abort() => {
            log::info!("aborted: {}", err.message());
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

async fn run(args: ZcCliArgs) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => ZcEngineConfig::from_file(path)?,
        None => ZcEngineConfig::default(),
    };
    let config = if args.trace { config.with_trace(true) } else { config };
    ZcLogger::init(&config.log)?;

    let engine = ZcEngine::with_config(config)?;
    let graph = match (&args.script, &args.file) {
        (Some(script), _) => engine.compile(script)?,
        (None, Some(path)) => engine.compile_file(path)?,
        (None, None) => return Err(ZcError::config("no script given").into()),
    };

    let input = read_input(args.input.as_deref())?;
    if let Some(output) = settle(engine.run(&graph, input).await)? {
        println!("{}", serde_json::to_string_pretty(&output.to_json())?);
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = ZcCliArgs::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
