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

//! # Actions Module
//!
//! This module contains the bundled leaf actions, grouped by domain. Each
//! submodule exposes a `register` function adding its domain to a
//! [`ZcRegistry`].
//!
//! ## Domains
//!
//! - **array**: Sequential collection transforms (map, filter, sort, reduce)
//! - **string**: Case, trimming, splitting and pattern matching
//! - **math**: Arithmetic and comparisons against the blob
//! - **record**: Field access and merging
//! - **codec**: `json` and `yaml` parsing and serialization
//! - **cast**: Conversions between blob kinds
//! - **env**: Process environment variables
//! - **debug**: No-op, logging and log level control
//! - **time**: Sleeping and timestamps
//! - **error**: Throwing, aborting, assertions and `catch`
//! - **flow**: Conditional domains (`step`, `loop`, `iterate`) and loop drivers
//! - **os**: Open-ended command execution (feature `os`)

pub mod array;
pub mod cast;
pub mod codec;
pub mod debug;
pub mod env;
pub mod error;
pub mod flow;
pub mod math;
#[cfg(feature = "os")]
pub mod os;
pub mod record;
pub mod string;
pub mod time;

use crate::registry::ZcRegistry;

/// Registers every bundled domain except `os`.
pub fn register_core(registry: &mut ZcRegistry) {
    array::register(registry);
    string::register(registry);
    math::register(registry);
    record::register(registry);
    codec::register(registry);
    cast::register(registry);
    env::register(registry);
    debug::register(registry);
    time::register(registry);
    error::register(registry);
    flow::register(registry);
}

/// Registers every bundled domain, including `os` when the feature is on.
pub fn register_defaults(registry: &mut ZcRegistry) {
    register_core(registry);
    #[cfg(feature = "os")]
    os::register(registry);
}
