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

//! # Executable Graph Module
//!
//! Compiled pipelines are stored as an arena of [`ZcNode`]s addressed by
//! [`ZcNodeId`]. The `next` edges form the spine that the runtime walks;
//! `then_branch`, `else_branch` and `catch_handler` are auxiliary edges that
//! are only entered through their owner.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::action::{ZcAction, ZcPattern};
use crate::errors::{Result, ZcError};
use crate::registry::ZcCondMode;
use crate::value::ZcValue;

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ZcNodeId(pub usize);

impl fmt::Display for ZcNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A compiled parameter, resolved against the lambda scope at run time.
#[derive(Clone, Debug)]
pub enum ZcParam {
    Value(ZcValue),
    Pattern(ZcPattern),
    Param(String),
    List(Vec<ZcParam>),
    Map(Vec<(String, ZcParam)>),
    /// Bound sub-pipeline fed with the caller's blob or with `source`.
    Chain {
        source: Option<String>,
        graph: Arc<ZcGraph>,
    },
    Lambda {
        params: Arc<Vec<String>>,
        body: Arc<ZcParam>,
    },
}

impl ZcParam {
    /// Whether resolving the parameter needs no scope.
    pub fn is_static(&self) -> bool {
        matches!(self, ZcParam::Value(_) | ZcParam::Pattern(_))
    }
}

#[derive(Clone)]
pub enum ZcNodeKind {
    Leaf(Arc<dyn ZcAction>),
    /// `if`/`elif` node owning `then_branch` and `else_branch`.
    Conditional(ZcCondMode),
    /// `then`/`else` body.
    Branch,
    Catch,
}

impl fmt::Debug for ZcNodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZcNodeKind::Leaf(_) => f.write_str("Leaf"),
            ZcNodeKind::Conditional(mode) => write!(f, "Conditional({:?})", mode),
            ZcNodeKind::Branch => f.write_str("Branch"),
            ZcNodeKind::Catch => f.write_str("Catch"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ZcNode {
    pub domain: String,
    pub action: String,
    pub method: Option<String>,
    pub params: Vec<ZcParam>,
    pub kind: ZcNodeKind,
    pub next: Option<ZcNodeId>,
    pub catch_handler: Option<ZcNodeId>,
    pub then_branch: Option<ZcNodeId>,
    pub else_branch: Option<ZcNodeId>,
}

impl ZcNode {
    pub fn new(domain: &str, action: &str, kind: ZcNodeKind) -> Self {
        ZcNode {
            domain: domain.to_string(),
            action: action.to_string(),
            method: None,
            params: Vec::new(),
            kind,
            next: None,
            catch_handler: None,
            then_branch: None,
            else_branch: None,
        }
    }

    pub fn name(&self) -> String {
        match &self.method {
            Some(method) => format!("{}.{}.{}", self.domain, self.action, method),
            None => format!("{}.{}", self.domain, self.action),
        }
    }

    fn auxiliary(&self) -> impl Iterator<Item = ZcNodeId> {
        [self.catch_handler, self.then_branch, self.else_branch]
            .into_iter()
            .flatten()
    }
}

/// Arena of compiled nodes with the spine entry point.
#[derive(Clone, Debug, Default)]
pub struct ZcGraph {
    nodes: Vec<ZcNode>,
    head: Option<ZcNodeId>,
}

impl ZcGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: ZcNode) -> ZcNodeId {
        self.nodes.push(node);
        ZcNodeId(self.nodes.len() - 1)
    }

    pub fn set_head(&mut self, head: Option<ZcNodeId>) {
        self.head = head;
    }

    pub fn head(&self) -> Option<ZcNodeId> {
        self.head
    }

    pub fn node(&self, id: ZcNodeId) -> Result<&ZcNode> {
        self.nodes
            .get(id.0)
            .ok_or_else(|| ZcError::compile(format!("dangling node reference {}", id)))
    }

    pub fn nodes(&self) -> &[ZcNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node names along the spine, in execution order.
    pub fn spine(&self) -> Vec<String> {
        let mut names = Vec::new();
        let mut seen = HashSet::new();
        let mut cursor = self.head;
        while let Some(id) = cursor {
            if !seen.insert(id) {
                break;
            }
            match self.nodes.get(id.0) {
                Some(node) => {
                    names.push(node.name());
                    cursor = node.next;
                }
                None => break,
            }
        }
        names
    }

    /// Checks edge targets and the spine/branch separation.
    pub fn validate(&self) -> Result<()> {
        for node in &self.nodes {
            for id in node.next.into_iter().chain(node.auxiliary()) {
                self.node(id)?;
            }
        }

        let mut spine = HashSet::new();
        let mut cursor = self.head;
        while let Some(id) = cursor {
            if !spine.insert(id) {
                return Err(ZcError::compile(format!("cycle on the spine at {}", id)));
            }
            cursor = self.node(id)?.next;
        }

        for node in &self.nodes {
            for target in node.auxiliary() {
                if spine.contains(&target) {
                    return Err(ZcError::compile_at(
                        Some(&node.domain),
                        &node.action,
                        format!("branch target {} is also on the spine", target),
                    ));
                }
            }
        }
        Ok(())
    }
}
