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

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{Result, ZcError};

/// Where console records go.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZcLogStream {
    Stdout,
    Stderr,
}

/// Configuration for the [`ZcLogger`](super::core::ZcLogger).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZcLogConfig {
    /// `off`, `error`, `warn`, `info`, `debug` or `trace`.
    pub level: String,
    pub console_enabled: bool,
    pub console_stream: ZcLogStream,
    /// JSON lines instead of text.
    pub json_format: bool,
    pub file_enabled: bool,
    pub file_path: Option<String>,
    /// Size threshold for rotating the log file.
    pub max_bytes: Option<u64>,
    /// Number of rotated files to keep.
    pub backup_count: Option<u32>,
}

impl Default for ZcLogConfig {
    fn default() -> Self {
        ZcLogConfig {
            level: "info".to_string(),
            console_enabled: true,
            // Stdout carries pipeline results.
            console_stream: ZcLogStream::Stderr,
            json_format: false,
            file_enabled: false,
            file_path: None,
            max_bytes: Some(10 * 1024 * 1024),
            backup_count: Some(7),
        }
    }
}

impl ZcLogConfig {
    pub fn from_json(value: &Value) -> Result<Self> {
        serde_json::from_value(value.clone())
            .map_err(|e| ZcError::config(format!("invalid log config: {}", e)))
    }

    pub fn level_filter(&self) -> Result<::log::LevelFilter> {
        super::parse_level_filter(&self.level)
            .ok_or_else(|| ZcError::config(format!("unknown log level '{}'", self.level)))
    }
}
