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

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::ZcValue;

/// An argument as written in the script, before compilation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ZcArgument {
    Literal(ZcValue),
    Pattern { source: String, flags: String },
    /// Reference to an enclosing lambda parameter.
    Param(String),
    /// Array template holding at least one parameter reference.
    List(Vec<ZcArgument>),
    /// Record template holding at least one parameter reference.
    Map(Vec<(String, ZcArgument)>),
    /// Piped chain, compiled into an independent sub-pipeline.
    Chain(ZcChainArgument),
    Lambda(ZcLambda),
}

impl ZcArgument {
    /// Whether the argument is fully known at parse time.
    pub fn is_literal(&self) -> bool {
        matches!(self, ZcArgument::Literal(_))
    }
}

/// A nested chain captured as an argument or lambda body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZcChainArgument {
    /// Lambda parameter feeding the chain (`x.string.upper()`); when absent the
    /// chain consumes the caller's blob.
    pub source: Option<String>,
    pub descriptors: Vec<ZcCallDescriptor>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZcLambda {
    pub params: Vec<String>,
    pub body: Box<ZcArgument>,
}

/// One parsed step: `domain.action.method(params)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZcCallDescriptor {
    /// `None` only for a bare flow continuation (`then`, `else`, ...) whose
    /// domain is inherited from its governing `if`.
    pub domain: Option<String>,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    pub params: Vec<ZcArgument>,
    /// Byte offset of the call in the script.
    pub position: usize,
}

impl ZcCallDescriptor {
    pub fn new(domain: Option<&str>, action: &str, params: Vec<ZcArgument>) -> Self {
        ZcCallDescriptor {
            domain: domain.map(str::to_string),
            action: action.to_string(),
            method: None,
            params,
            position: 0,
        }
    }

    pub fn with_method(mut self, method: &str) -> Self {
        self.method = Some(method.to_string());
        self
    }
}

impl fmt::Display for ZcCallDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(domain) = &self.domain {
            write!(f, "{}.", domain)?;
        }
        f.write_str(&self.action)?;
        if let Some(method) = &self.method {
            write!(f, ".{}", method)?;
        }
        Ok(())
    }
}

/// Ordered descriptor sequence produced by one parse.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ZcDescriptorProgram {
    pub descriptors: Vec<ZcCallDescriptor>,
}

impl ZcDescriptorProgram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, descriptor: ZcCallDescriptor) -> Self {
        self.descriptors.push(descriptor);
        self
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn to_json(&self) -> crate::errors::Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| crate::errors::ZcError::Serde(format!("failed to serialize program: {}", e)))
    }

    pub fn from_json(json: &str) -> crate::errors::Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| crate::errors::ZcError::Serde(format!("invalid program JSON: {}", e)))
    }
}
