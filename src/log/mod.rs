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

//! # Logging Module
//!
//! Library code logs through the `log` facade. This module provides the
//! process-wide [`ZcLogger`] that the runner (or an embedding host) installs
//! to route records to the console and an optional rotating file, as text or
//! JSON lines.

pub mod config;
pub mod core;
pub mod formatters;
pub mod handlers;

pub use self::config::{ZcLogConfig, ZcLogStream};
pub use self::core::{ZcLogRecord, ZcLogger};

/// Parses a level name, accepting `warning` as an alias of `warn`.
pub fn parse_level_filter(name: &str) -> Option<::log::LevelFilter> {
    match name.trim().to_ascii_lowercase().as_str() {
        "off" => Some(::log::LevelFilter::Off),
        "error" => Some(::log::LevelFilter::Error),
        "warn" | "warning" => Some(::log::LevelFilter::Warn),
        "info" => Some(::log::LevelFilter::Info),
        "debug" => Some(::log::LevelFilter::Debug),
        "trace" => Some(::log::LevelFilter::Trace),
        _ => None,
    }
}
