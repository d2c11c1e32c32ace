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

//! # ZiChain Core Library
//!
//! ZiChain is an embeddable pipeline scripting language. A script is a single
//! dotted chain of `domain.action(args)` calls; the output of each call is
//! the input (the "blob") of the next.
//!
//! ## Module Overview
//!
//! - **value**: The closed set of blob kinds and type assertions
//! - **action**: Leaf action contract, arguments and callables
//! - **registry**: Table of domains, actions and flow providers
//! - **dsl**: Lexer, parser, call descriptors and the chain compiler
//! - **graph**: Compiled executable graphs
//! - **pipeline**: Async runtime walking compiled graphs
//! - **actions**: The bundled domains (`array`, `string`, `math`, `loop`, ...)
//! - **engine**: One-stop compile and run entry points
//! - **config**: Engine configuration loaded from JSON or YAML
//! - **log**: Structured logger behind the `log` facade
//!
//! ## Feature Flags
//!
//! - `os`: Enables the open-ended `os` domain running external commands
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use zichain::{ZcEngine, ZcValue};
//!
//! # async fn demo() -> zichain::Result<()> {
//! let engine = ZcEngine::new();
//! let graph = engine.compile(
//!     "array.filter(x => math.gt(1)).sort().step.if(array.length().math.gt(0)).then(array.first())",
//! )?;
//! let out = engine.run(&graph, ZcValue::from(serde_json::json!([3, 1, 2]))).await?;
//! assert_eq!(out, ZcValue::from(2));
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! 1. **Parse**: identifiers are resolved against the registry into a flat
//!    sequence of call descriptors
//! 2. **Compile**: descriptors are linked back to front into a graph; flow
//!    actions (`if`, `elif`, `else`, `then`, `catch`) become branches and
//!    handlers instead of spine steps
//! 3. **Run**: the runtime walks the spine, dispatching leaf actions and
//!    routing failures to the attached `catch` handler
//!
//! ## Error Handling
//!
//! Every fallible operation returns [`Result`] with a [`ZcError`]. Errors
//! raised while running carry the domain and action of the node they escaped
//! from; [`ZcError::is_abort`] identifies deliberate `error.abort()` exits.

pub mod action;
pub mod actions;
pub mod config;
pub mod dsl;
pub mod engine;
pub mod errors;
pub mod graph;
pub mod log;
pub mod pipeline;
pub mod registry;
pub mod value;

pub use action::{ZcAction, ZcArg, ZcArgs, ZcCallable, ZcFnAction, ZcPattern, ZcSyncAction};
pub use config::ZcEngineConfig;
pub use dsl::{ZcCompiler, ZcDescriptorProgram, ZcParser};
pub use engine::{compile, run, ZcEngine};
pub use errors::{Result, ZcError, ZcRuntimeError, ZcRuntimeErrorKind};
pub use graph::{ZcGraph, ZcNode, ZcNodeId};
pub use log::{ZcLogConfig, ZcLogger};
pub use pipeline::{ZcRuntime, ZcRuntimeOptions};
pub use registry::{ZcCondMode, ZcFlowKind, ZcRegistry};
pub use value::{ZcKind, ZcRecord, ZcValue};
