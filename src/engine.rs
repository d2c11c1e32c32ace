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

//! # Engine Module
//!
//! [`ZcEngine`] ties the registry, parser, compiler and runtime together.
//!
//! ```rust,no_run
//! use zichain::{ZcEngine, ZcValue};
//!
//! # async fn demo() -> zichain::Result<()> {
//! let engine = ZcEngine::new();
//! let graph = engine.compile("array.filter(math.gt(2)).sort()")?;
//! let out = engine.run(&graph, ZcValue::from(vec![ZcValue::from(5), ZcValue::from(1)])).await?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use crate::action::ZcAction;
use crate::config::ZcEngineConfig;
use crate::dsl::{ZcCompiler, ZcDescriptorProgram, ZcParser};
use crate::errors::Result;
use crate::graph::ZcGraph;
use crate::pipeline::ZcRuntime;
use crate::registry::ZcRegistry;
use crate::value::ZcValue;

/// Compiles and runs chain scripts against one registry.
#[derive(Debug)]
pub struct ZcEngine {
    registry: ZcRegistry,
    runtime: ZcRuntime,
    config: ZcEngineConfig,
}

impl Default for ZcEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ZcEngine {
    pub fn new() -> Self {
        Self::from_parts(ZcEngineConfig::default(), None)
    }

    /// Builds an engine from `config`; the `os` domain is only registered
    /// when `os_enabled` is set.
    pub fn with_config(config: ZcEngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(config, None))
    }

    /// Uses a caller-assembled registry instead of the bundled domains.
    pub fn with_registry(registry: ZcRegistry, config: ZcEngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(config, Some(registry)))
    }

    fn from_parts(config: ZcEngineConfig, registry: Option<ZcRegistry>) -> Self {
        let registry = registry.unwrap_or_else(|| {
            let mut registry = ZcRegistry::new();
            if config.os_enabled {
                crate::actions::register_defaults(&mut registry);
            } else {
                crate::actions::register_core(&mut registry);
            }
            registry
        });
        ZcEngine {
            registry,
            runtime: ZcRuntime::new(config.runtime_options()),
            config,
        }
    }

    pub fn config(&self) -> &ZcEngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &ZcRegistry {
        &self.registry
    }

    /// Adds a host action; later compiles can reference it.
    pub fn register(&mut self, domain: &str, action: &str, handler: impl ZcAction + 'static) {
        self.registry.register_action(domain, action, handler);
    }

    pub fn parse(&self, script: &str) -> Result<ZcDescriptorProgram> {
        ZcParser::new(&self.registry).parse(script)
    }

    pub fn compile(&self, script: &str) -> Result<ZcGraph> {
        let program = self.parse(script)?;
        ZcCompiler::new(&self.registry).compile(&program)
    }

    pub fn compile_file(&self, path: impl AsRef<Path>) -> Result<ZcGraph> {
        let program = ZcParser::new(&self.registry).parse_file(path.as_ref())?;
        ZcCompiler::new(&self.registry).compile(&program)
    }

    /// Runs a compiled graph. The graph can be run any number of times.
    pub async fn run(&self, graph: &ZcGraph, input: ZcValue) -> Result<ZcValue> {
        self.runtime.process(graph, input).await
    }

    /// Compiles and runs `script` in one go.
    pub async fn eval(&self, script: &str, input: ZcValue) -> Result<ZcValue> {
        let graph = self.compile(script)?;
        self.run(&graph, input).await
    }
}

/// Compiles `script` against the bundled domains.
pub fn compile(script: &str) -> Result<ZcGraph> {
    ZcEngine::new().compile(script)
}

/// Runs `graph` with default runtime options.
pub async fn run(graph: &ZcGraph, input: ZcValue) -> Result<ZcValue> {
    ZcRuntime::default().process(graph, input).await
}
