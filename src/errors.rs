//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of ZiChain.
//! The ZiChain project belongs to the Dunimd Team.
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

//! # ZiChain Error Module
//!
//! This module defines the error types used throughout ZiChain for consistent
//! error handling and reporting.
//!
//! ## Error Categories
//!
//! - **Parse**: The script text could not be tokenized or resolved
//! - **Compile**: The descriptor sequence is structurally invalid
//! - **Runtime**: A step failed while the graph was running. Runtime errors
//!   carry a [`ZcRuntimeErrorKind`] separating type assertions, action
//!   failures and deliberate aborts
//! - **Config**: Invalid engine configuration
//! - **Io** / **Serde**: Failures while loading scripts or configuration
//!
//! Parse and compile errors are always raised before any action runs, so no
//! side effect can have happened when they surface.
//!
//! ## Usage
//!
//! ```rust
//! use zichain::errors::{Result, ZcError};
//!
//! fn example(input: &str) -> Result<String> {
//!     if input.is_empty() {
//!         return Err(ZcError::action("input cannot be empty"));
//!     }
//!     Ok(input.to_uppercase())
//! }
//! ```

use std::fmt;
use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reserved code carried by deliberate aborts.
pub const ZC_ABORT_CODE: &str = "ABORT";

/// Code attached to type assertion failures.
pub const ZC_TYPE_CODE: &str = "TYPE_ERROR";

/// Code attached when a loop exceeds the configured iteration limit.
pub const ZC_LOOP_LIMIT_CODE: &str = "LOOP_LIMIT";

/// Convenience result type used throughout ZiChain.
pub type Result<T> = std::result::Result<T, ZcError>;

/// Category of a failure raised while a graph runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZcRuntimeErrorKind {
    /// A blob or parameter failed a type/shape assertion.
    Type,
    /// A leaf action failed on its own terms.
    Action,
    /// Deliberate termination requested by the script.
    Abort,
}

/// Failure raised while a pipeline runs.
///
/// `annotated` is set once the error has been attributed to the node it
/// escaped from; an annotated error crossing a nested sub-pipeline boundary
/// keeps its original `domain`/`action`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZcRuntimeError {
    pub kind: ZcRuntimeErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
    #[serde(default)]
    pub annotated: bool,
}

impl ZcRuntimeError {
    pub fn new(kind: ZcRuntimeErrorKind, message: impl Into<String>) -> Self {
        ZcRuntimeError {
            kind,
            message: message.into(),
            domain: None,
            action: None,
            code: None,
            cause: None,
            annotated: false,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Attributes the error to its owning node, unless that already happened.
    pub fn annotate(mut self, domain: &str, action: &str) -> Self {
        if self.annotated {
            return self;
        }
        self.domain = Some(domain.to_string());
        self.action = Some(action.to_string());
        self.annotated = true;
        self
    }

    pub fn is_abort(&self) -> bool {
        self.kind == ZcRuntimeErrorKind::Abort || self.code.as_deref() == Some(ZC_ABORT_CODE)
    }
}

impl fmt::Display for ZcRuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.domain, &self.action) {
            (Some(domain), Some(action)) => write!(f, "{}.{}: {}", domain, action, self.message)?,
            _ => write!(f, "{}", self.message)?,
        }
        if let Some(code) = &self.code {
            write!(f, " [{}]", code)?;
        }
        Ok(())
    }
}

/// Canonical error enumeration for ZiChain.
#[derive(Clone, Debug, Error, PartialEq, Serialize, Deserialize)]
pub enum ZcError {
    /// Unresolvable identifier, malformed literal or argument list.
    #[error("parse error at offset {position}: {message}")]
    Parse {
        message: String,
        position: usize,
        token: Option<String>,
    },

    /// Structural problem in the descriptor sequence.
    #[error("compile error: {message}")]
    Compile {
        message: String,
        domain: Option<String>,
        action: Option<String>,
    },

    /// Failure raised by a running pipeline.
    #[error("runtime error: {0}")]
    Runtime(ZcRuntimeError),

    /// Invalid engine configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Errors originating from filesystem IO outside of a running pipeline.
    #[error("io error: {0}")]
    Io(String),

    /// Wrapper for serialization issues outside of a running pipeline.
    #[error("serialization error: {0}")]
    Serde(String),
}

impl From<ZcRuntimeError> for ZcError {
    fn from(err: ZcRuntimeError) -> Self {
        ZcError::Runtime(err)
    }
}

// Leaf actions propagate these with `?`; they surface as action failures so a
// script-level `catch` can observe them.
impl From<io::Error> for ZcError {
    fn from(err: io::Error) -> Self {
        ZcError::Runtime(
            ZcRuntimeError::new(ZcRuntimeErrorKind::Action, err.to_string()).with_code("IO"),
        )
    }
}

impl From<serde_json::Error> for ZcError {
    fn from(err: serde_json::Error) -> Self {
        ZcError::Runtime(
            ZcRuntimeError::new(ZcRuntimeErrorKind::Action, err.to_string()).with_code("JSON"),
        )
    }
}

impl From<serde_yaml::Error> for ZcError {
    fn from(err: serde_yaml::Error) -> Self {
        ZcError::Runtime(
            ZcRuntimeError::new(ZcRuntimeErrorKind::Action, err.to_string()).with_code("YAML"),
        )
    }
}

impl ZcError {
    /// Helper to construct parse errors.
    pub fn parse(message: impl Into<String>, position: usize, token: Option<String>) -> Self {
        ZcError::Parse {
            message: message.into(),
            position,
            token,
        }
    }

    /// Helper to construct compile errors without node context.
    pub fn compile<T: Into<String>>(message: T) -> Self {
        ZcError::Compile {
            message: message.into(),
            domain: None,
            action: None,
        }
    }

    /// Helper to construct compile errors naming the offending descriptor.
    pub fn compile_at(
        domain: Option<&str>,
        action: &str,
        message: impl Into<String>,
    ) -> Self {
        ZcError::Compile {
            message: message.into(),
            domain: domain.map(str::to_string),
            action: Some(action.to_string()),
        }
    }

    /// Helper to construct leaf action failures.
    pub fn action<T: Into<String>>(message: T) -> Self {
        ZcError::Runtime(ZcRuntimeError::new(ZcRuntimeErrorKind::Action, message))
    }

    /// Helper to construct type assertion failures.
    pub fn type_error<T: Into<String>>(message: T) -> Self {
        ZcError::Runtime(
            ZcRuntimeError::new(ZcRuntimeErrorKind::Type, message).with_code(ZC_TYPE_CODE),
        )
    }

    /// Helper to construct a deliberate abort.
    pub fn abort<T: Into<String>>(message: T) -> Self {
        ZcError::Runtime(
            ZcRuntimeError::new(ZcRuntimeErrorKind::Abort, message).with_code(ZC_ABORT_CODE),
        )
    }

    /// Helper to construct the iteration-limit failure.
    pub fn loop_limit(limit: u64) -> Self {
        ZcError::Runtime(
            ZcRuntimeError::new(
                ZcRuntimeErrorKind::Action,
                format!("loop exceeded the limit of {} iterations", limit),
            )
            .with_code(ZC_LOOP_LIMIT_CODE),
        )
    }

    /// Helper to construct configuration errors.
    pub fn config<T: Into<String>>(message: T) -> Self {
        ZcError::Config(message.into())
    }

    pub fn message(&self) -> String {
        match self {
            ZcError::Parse { message, .. } => message.clone(),
            ZcError::Compile { message, .. } => message.clone(),
            ZcError::Runtime(err) => err.message.clone(),
            ZcError::Config(message) | ZcError::Io(message) | ZcError::Serde(message) => {
                message.clone()
            }
        }
    }

    pub fn domain(&self) -> Option<&str> {
        match self {
            ZcError::Compile { domain, .. } => domain.as_deref(),
            ZcError::Runtime(err) => err.domain.as_deref(),
            _ => None,
        }
    }

    pub fn action_name(&self) -> Option<&str> {
        match self {
            ZcError::Compile { action, .. } => action.as_deref(),
            ZcError::Runtime(err) => err.action.as_deref(),
            _ => None,
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            ZcError::Runtime(err) => err.code.as_deref(),
            _ => None,
        }
    }

    /// Whether the error is the reserved, non-incident abort signal.
    pub fn is_abort(&self) -> bool {
        matches!(self, ZcError::Runtime(err) if err.is_abort())
    }

    /// Converts any error into the runtime form a `catch` handler receives.
    pub fn into_runtime(self) -> ZcRuntimeError {
        match self {
            ZcError::Runtime(err) => err,
            other => ZcRuntimeError::new(ZcRuntimeErrorKind::Action, other.to_string()),
        }
    }

    /// Wraps the error with its owning node unless it is already annotated.
    pub fn annotate(self, domain: &str, action: &str) -> Self {
        ZcError::Runtime(self.into_runtime().annotate(domain, action))
    }
}
