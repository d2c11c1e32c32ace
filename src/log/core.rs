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

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};

use crate::errors::Result;
use crate::log::config::{ZcLogConfig, ZcLogStream};
use crate::log::handlers::{ZcFileHandler, ZcLogHandler, ZcStderrHandler, ZcStdoutHandler};

/// One emitted record, detached from the `log` facade.
#[derive(Clone, Debug)]
pub struct ZcLogRecord {
    pub level: ::log::Level,
    pub target: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ZcLogRecord {
    pub fn new(level: ::log::Level, target: &str, message: impl Into<String>) -> Self {
        ZcLogRecord {
            level,
            target: target.to_string(),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn to_json(&self) -> Value {
        let mut data = Map::new();
        data.insert("level".into(), json!(self.level.as_str()));
        data.insert("target".into(), json!(self.target));
        data.insert("message".into(), json!(self.message));
        data.insert("timestamp".into(), json!(self.timestamp.to_rfc3339()));
        Value::Object(data)
    }
}

/// Process-wide logger behind the `log` facade.
pub struct ZcLogger {
    handlers: Vec<Box<dyn ZcLogHandler + Send + Sync>>,
}

static LOGGER: OnceLock<ZcLogger> = OnceLock::new();

impl ZcLogger {
    pub fn new(config: &ZcLogConfig) -> Self {
        let mut handlers: Vec<Box<dyn ZcLogHandler + Send + Sync>> = Vec::new();
        if config.console_enabled {
            match config.console_stream {
                ZcLogStream::Stdout => handlers.push(Box::new(ZcStdoutHandler::new(config.json_format))),
                ZcLogStream::Stderr => handlers.push(Box::new(ZcStderrHandler::new(config.json_format))),
            }
        }
        if config.file_enabled {
            if let Some(path) = &config.file_path {
                handlers.push(Box::new(ZcFileHandler::new(
                    path.clone(),
                    config.json_format,
                    config.max_bytes,
                    config.backup_count,
                )));
            }
        }
        ZcLogger { handlers }
    }

    /// Installs the global logger and sets the maximum level. Safe to call
    /// multiple times; the first call's handlers win, the level always applies.
    pub fn init(config: &ZcLogConfig) -> Result<()> {
        let filter = config.level_filter()?;
        let logger = LOGGER.get_or_init(|| ZcLogger::new(config));
        if ::log::set_logger(logger).is_err() {
            ::log::debug!("a logger is already installed; keeping it");
        }
        ::log::set_max_level(filter);
        Ok(())
    }

    pub fn emit(&self, record: &ZcLogRecord) {
        for handler in &self.handlers {
            handler.handle(record);
        }
    }
}

impl ::log::Log for ZcLogger {
    fn enabled(&self, metadata: &::log::Metadata) -> bool {
        metadata.level() <= ::log::max_level()
    }

    fn log(&self, record: &::log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        self.emit(&ZcLogRecord::new(
            record.level(),
            record.target(),
            record.args().to_string(),
        ));
    }

    fn flush(&self) {
        for handler in &self.handlers {
            handler.flush();
        }
    }
}
