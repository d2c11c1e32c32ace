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

//! # Action Registry Module
//!
//! This module provides the leaf action registry: the table of
//! `(domain, action, method) -> entry` facts consulted by the parser (to
//! resolve identifiers) and by the compiler (to bind descriptors to behavior).
//!
//! ## Registry Operations
//!
//! - Register leaf actions under a domain
//! - Register flow domains providing `if`/`elif`/`else`/`then` in a given
//!   conditional mode, and `catch` handlers
//! - Register open-ended domains (such as `os`) that accept any action name
//! - Resolve identifiers and query known domains

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use crate::action::ZcAction;

/// The five actions compiled specially instead of as leaf steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ZcFlowKind {
    If,
    Elif,
    Else,
    Then,
    Catch,
}

impl ZcFlowKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "if" => Some(ZcFlowKind::If),
            "elif" => Some(ZcFlowKind::Elif),
            "else" => Some(ZcFlowKind::Else),
            "then" => Some(ZcFlowKind::Then),
            "catch" => Some(ZcFlowKind::Catch),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ZcFlowKind::If => "if",
            ZcFlowKind::Elif => "elif",
            ZcFlowKind::Else => "else",
            ZcFlowKind::Then => "then",
            ZcFlowKind::Catch => "catch",
        }
    }
}

/// How a conditional re-evaluates its test.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ZcCondMode {
    /// Single shot.
    Step,
    /// Repeats while the test holds against the original input.
    Loop,
    /// Repeats while the test holds against the previous iteration's output.
    Feedback,
}

#[derive(Clone)]
pub enum ZcHandlerKind {
    Leaf(Arc<dyn ZcAction>),
    Flow(ZcFlowKind, ZcCondMode),
}

impl fmt::Debug for ZcHandlerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZcHandlerKind::Leaf(_) => f.write_str("Leaf"),
            ZcHandlerKind::Flow(kind, mode) => write!(f, "Flow({:?}, {:?})", kind, mode),
        }
    }
}

/// A fact from the registry.
#[derive(Clone, Debug)]
pub struct ZcLibraryEntry {
    pub domain: String,
    pub action: String,
    pub method: Option<String>,
    pub kind: ZcHandlerKind,
}

impl ZcLibraryEntry {
    pub fn flow_kind(&self) -> Option<ZcFlowKind> {
        match self.kind {
            ZcHandlerKind::Flow(kind, _) => Some(kind),
            ZcHandlerKind::Leaf(_) => None,
        }
    }
}

type ZcEntryKey = (String, String, Option<String>);

/// Registry mapping identifiers to library entries.
#[derive(Default)]
pub struct ZcRegistry {
    entries: HashMap<ZcEntryKey, ZcLibraryEntry>,
    domains: BTreeSet<String>,
    open_domains: HashMap<String, Arc<dyn ZcAction>>,
}

impl fmt::Debug for ZcRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZcRegistry")
            .field("domains", &self.domains)
            .field("entries", &self.entries.len())
            .field("open_domains", &self.open_domains.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ZcRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry pre-loaded with the bundled domains.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        crate::actions::register_defaults(&mut registry);
        registry
    }

    fn insert(&mut self, domain: &str, action: &str, method: Option<&str>, kind: ZcHandlerKind) {
        self.domains.insert(domain.to_string());
        let key = (
            domain.to_string(),
            action.to_string(),
            method.map(str::to_string),
        );
        if self.entries.contains_key(&key) {
            log::warn!(
                "replacing registered action '{}.{}{}'",
                domain,
                action,
                method.map(|m| format!(".{}", m)).unwrap_or_default()
            );
        }
        self.entries.insert(
            key,
            ZcLibraryEntry {
                domain: domain.to_string(),
                action: action.to_string(),
                method: method.map(str::to_string),
                kind,
            },
        );
    }

    /// Registers a leaf action.
    pub fn register_action(&mut self, domain: &str, action: &str, handler: impl ZcAction + 'static) {
        self.insert(domain, action, None, ZcHandlerKind::Leaf(Arc::new(handler)));
    }

    /// Registers a leaf action reachable as `domain.action.method`.
    pub fn register_method(
        &mut self,
        domain: &str,
        action: &str,
        method: &str,
        handler: impl ZcAction + 'static,
    ) {
        self.insert(domain, action, Some(method), ZcHandlerKind::Leaf(Arc::new(handler)));
    }

    /// Registers `if`, `elif`, `else` and `then` for `domain`.
    pub fn register_flow_domain(&mut self, domain: &str, mode: ZcCondMode) {
        for kind in [
            ZcFlowKind::If,
            ZcFlowKind::Elif,
            ZcFlowKind::Else,
            ZcFlowKind::Then,
        ] {
            self.insert(domain, kind.as_str(), None, ZcHandlerKind::Flow(kind, mode));
        }
    }

    /// Registers `catch` for `domain`.
    pub fn register_catch(&mut self, domain: &str) {
        self.insert(
            domain,
            ZcFlowKind::Catch.as_str(),
            None,
            ZcHandlerKind::Flow(ZcFlowKind::Catch, ZcCondMode::Step),
        );
    }

    /// Registers a domain accepting any action name. Explicit entries of the
    /// same domain still take precedence.
    pub fn register_open_domain(&mut self, domain: &str, handler: impl ZcAction + 'static) {
        self.domains.insert(domain.to_string());
        self.open_domains
            .insert(domain.to_string(), Arc::new(handler));
    }

    pub fn is_domain(&self, name: &str) -> bool {
        self.domains.contains(name)
    }

    pub fn is_open_domain(&self, name: &str) -> bool {
        self.open_domains.contains_key(name)
    }

    pub fn domains(&self) -> impl Iterator<Item = &str> {
        self.domains.iter().map(String::as_str)
    }

    /// Whether `domain.action` is registered with any method.
    pub fn has_action(&self, domain: &str, action: &str) -> bool {
        self.entries
            .keys()
            .any(|(d, a, _)| d == domain && a == action)
    }

    /// Whether `domain.action.method` is registered explicitly.
    pub fn has_method(&self, domain: &str, action: &str, method: &str) -> bool {
        self.entries.contains_key(&(
            domain.to_string(),
            action.to_string(),
            Some(method.to_string()),
        ))
    }

    /// Whether `domain.action[.method]` has an explicit entry.
    pub fn is_registered(&self, domain: &str, action: &str, method: Option<&str>) -> bool {
        self.entries.contains_key(&(
            domain.to_string(),
            action.to_string(),
            method.map(str::to_string),
        ))
    }

    /// Domains providing the flow action `kind`.
    pub fn flow_domains(&self, kind: ZcFlowKind) -> Vec<&str> {
        let mut domains: Vec<&str> = self
            .entries
            .values()
            .filter(|entry| entry.flow_kind() == Some(kind))
            .map(|entry| entry.domain.as_str())
            .collect();
        domains.sort_unstable();
        domains
    }

    /// Looks up the entry bound to `domain.action[.method]`.
    ///
    /// Open-ended domains answer for any action without an explicit entry.
    pub fn resolve(&self, domain: &str, action: &str, method: Option<&str>) -> Option<ZcLibraryEntry> {
        let key = (
            domain.to_string(),
            action.to_string(),
            method.map(str::to_string),
        );
        if let Some(entry) = self.entries.get(&key) {
            return Some(entry.clone());
        }
        self.open_domains.get(domain).map(|handler| ZcLibraryEntry {
            domain: domain.to_string(),
            action: action.to_string(),
            method: method.map(str::to_string),
            kind: ZcHandlerKind::Leaf(handler.clone()),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.open_domains.is_empty()
    }
}
