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

//! # Engine Configuration
//!
//! [`ZcEngineConfig`] collects the runtime switches and the logging setup.
//! It can be built in code, or loaded from JSON or YAML, where every field is
//! optional:
//!
//! ```yaml
//! trace: true
//! loop_limit: 10000
//! os_enabled: false
//! log:
//!   level: debug
//!   json_format: true
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, ZcError};
use crate::log::ZcLogConfig;
use crate::pipeline::ZcRuntimeOptions;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZcEngineConfig {
    /// Log every node dispatch at info level.
    pub trace: bool,
    /// Fail loops after this many iterations; unbounded when absent.
    pub loop_limit: Option<u64>,
    /// Register the `os` domain (requires the `os` feature).
    pub os_enabled: bool,
    pub log: ZcLogConfig,
}

impl Default for ZcEngineConfig {
    fn default() -> Self {
        ZcEngineConfig {
            trace: false,
            loop_limit: None,
            os_enabled: cfg!(feature = "os"),
            log: ZcLogConfig::default(),
        }
    }
}

impl ZcEngineConfig {
    pub fn from_json(source: &str) -> Result<Self> {
        serde_json::from_str(source)
            .map_err(|e| ZcError::config(format!("invalid JSON config: {}", e)))
    }

    pub fn from_yaml(source: &str) -> Result<Self> {
        serde_yaml::from_str(source)
            .map_err(|e| ZcError::config(format!("invalid YAML config: {}", e)))
    }

    /// Loads a config file, choosing the format by extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)
            .map_err(|e| ZcError::Io(format!("{}: {}", path.display(), e)))?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&source),
            Some("yaml") | Some("yml") => Self::from_yaml(&source),
            other => Err(ZcError::config(format!(
                "unsupported config extension {:?} for {}",
                other.unwrap_or(""),
                path.display()
            ))),
        }
    }

    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn with_loop_limit(mut self, limit: Option<u64>) -> Self {
        self.loop_limit = limit;
        self
    }

    pub fn with_os(mut self, enabled: bool) -> Self {
        self.os_enabled = enabled;
        self
    }

    pub fn with_log(mut self, log: ZcLogConfig) -> Self {
        self.log = log;
        self
    }

    pub fn runtime_options(&self) -> ZcRuntimeOptions {
        ZcRuntimeOptions {
            trace: self.trace,
            loop_limit: self.loop_limit,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.loop_limit == Some(0) {
            return Err(ZcError::config("loop_limit must be at least 1"));
        }
        if self.os_enabled && !cfg!(feature = "os") {
            return Err(ZcError::config(
                "os_enabled requires the `os` feature",
            ));
        }
        self.log.level_filter()?;
        Ok(())
    }
}
