//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of ZiChain.
//! The ZiChain project belongs to the Dunimd project team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! you may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

use std::sync::Arc;

use crate::action::ZcPattern;
use crate::dsl::ir::{ZcArgument, ZcCallDescriptor, ZcDescriptorProgram};
use crate::errors::{Result, ZcError};
use crate::graph::{ZcGraph, ZcNode, ZcNodeId, ZcNodeKind, ZcParam};
use crate::registry::{ZcFlowKind, ZcHandlerKind, ZcLibraryEntry, ZcRegistry};

/// A descriptor bound to its library entry after the forward pass.
struct ZcBoundCall<'d> {
    descriptor: &'d ZcCallDescriptor,
    domain: String,
    entry: ZcLibraryEntry,
}

impl ZcBoundCall<'_> {
    fn error(&self, message: impl Into<String>) -> ZcError {
        ZcError::compile_at(Some(&self.domain), &self.descriptor.action, message)
    }
}

/// Builder state of the back-to-front link pass.
#[derive(Default)]
struct ZcLinkState {
    accumulator: Option<ZcNodeId>,
    pending_then: Option<ZcNodeId>,
    pending_else: Option<ZcNodeId>,
    pending_catch: Option<ZcNodeId>,
}

/// Turns descriptor sequences into executable graphs.
#[derive(Debug)]
pub struct ZcCompiler<'r> {
    registry: &'r ZcRegistry,
}

impl<'r> ZcCompiler<'r> {
    pub fn new(registry: &'r ZcRegistry) -> Self {
        Self { registry }
    }

    pub fn compile(&self, program: &ZcDescriptorProgram) -> Result<ZcGraph> {
        let graph = self.compile_descriptors(&program.descriptors)?;
        log::debug!(
            "compiled {} descriptor(s) into {} node(s)",
            program.len(),
            graph.len()
        );
        Ok(graph)
    }

    fn compile_descriptors(&self, descriptors: &[ZcCallDescriptor]) -> Result<ZcGraph> {
        let bound = self.bind(descriptors)?;
        let graph = self.link(&bound)?;
        graph.validate()?;
        Ok(graph)
    }

    /// Forward pass: head check, governing-`if` ownership and registry binding.
    fn bind<'d>(&self, descriptors: &'d [ZcCallDescriptor]) -> Result<Vec<ZcBoundCall<'d>>> {
        let first = descriptors
            .first()
            .ok_or_else(|| ZcError::compile("cannot compile an empty chain"))?;
        if let Some(kind) = self.flow_name(first) {
            if kind != ZcFlowKind::If {
                return Err(ZcError::compile_at(
                    first.domain.as_deref(),
                    &first.action,
                    format!("`{}` cannot start a chain", first.action),
                ));
            }
        }

        let mut governing_if: Option<String> = None;
        let mut bound = Vec::with_capacity(descriptors.len());

        for descriptor in descriptors {
            let domain = match self.flow_name(descriptor) {
                Some(ZcFlowKind::If) => {
                    let domain = descriptor.domain.clone().ok_or_else(|| {
                        ZcError::compile_at(None, "if", "`if` needs an explicit domain")
                    })?;
                    governing_if = Some(domain.clone());
                    domain
                }
                Some(kind @ (ZcFlowKind::Then | ZcFlowKind::Elif | ZcFlowKind::Else)) => {
                    let owner = governing_if.clone().ok_or_else(|| {
                        ZcError::compile_at(
                            descriptor.domain.as_deref(),
                            kind.as_str(),
                            format!("`{}` is missing a parent if", kind.as_str()),
                        )
                    })?;
                    match &descriptor.domain {
                        Some(explicit) if *explicit != owner => {
                            return Err(ZcError::compile_at(
                                Some(explicit),
                                kind.as_str(),
                                format!(
                                    "domain mismatch: `{}.{}` inside a `{}.if` block",
                                    explicit,
                                    kind.as_str(),
                                    owner
                                ),
                            ))
                        }
                        _ => owner,
                    }
                }
                Some(ZcFlowKind::Catch) => {
                    governing_if = None;
                    descriptor.domain.clone().ok_or_else(|| {
                        ZcError::compile_at(
                            None,
                            "catch",
                            "`catch` needs an explicit domain when several domains provide it",
                        )
                    })?
                }
                None => {
                    governing_if = None;
                    descriptor.domain.clone().ok_or_else(|| {
                        ZcError::compile_at(
                            None,
                            &descriptor.action,
                            format!("unresolved action `{}`", descriptor.action),
                        )
                    })?
                }
            };

            let entry = self
                .registry
                .resolve(&domain, &descriptor.action, descriptor.method.as_deref())
                .ok_or_else(|| {
                    ZcError::compile_at(
                        Some(&domain),
                        &descriptor.action,
                        format!("no library entry for `{}.{}`", domain, descriptor.action),
                    )
                })?;

            bound.push(ZcBoundCall {
                descriptor,
                domain,
                entry,
            });
        }

        Ok(bound)
    }

    /// Flow kind of a descriptor; bare continuations are recognized by name.
    fn flow_name(&self, descriptor: &ZcCallDescriptor) -> Option<ZcFlowKind> {
        match &descriptor.domain {
            None => ZcFlowKind::from_name(&descriptor.action),
            Some(domain) => self
                .registry
                .resolve(domain, &descriptor.action, descriptor.method.as_deref())
                .and_then(|entry| entry.flow_kind()),
        }
    }

    /// Back-to-front pass linking nodes into the spine and branch edges.
    fn link(&self, bound: &[ZcBoundCall<'_>]) -> Result<ZcGraph> {
        let mut graph = ZcGraph::new();
        let mut state = ZcLinkState::default();

        for call in bound.iter().rev() {
            let params = self.compile_params(&call.descriptor.params)?;
            let mut node = ZcNode::new(&call.domain, &call.descriptor.action, ZcNodeKind::Branch);
            node.method = call.descriptor.method.clone();
            node.params = params;

            match &call.entry.kind {
                ZcHandlerKind::Leaf(handler) => {
                    if state.pending_then.is_some() || state.pending_else.is_some() {
                        return Err(call.error("a branch is left without its `if`"));
                    }
                    node.kind = ZcNodeKind::Leaf(handler.clone());
                    node.next = state.accumulator;
                    node.catch_handler = state.pending_catch;
                    state.accumulator = Some(graph.add_node(node));
                }
                ZcHandlerKind::Flow(ZcFlowKind::Catch, _) => {
                    if state.pending_then.is_some() || state.pending_else.is_some() {
                        return Err(call.error("a branch is left without its `if`"));
                    }
                    node.kind = ZcNodeKind::Catch;
                    node.next = state.accumulator;
                    state.pending_catch = Some(graph.add_node(node));
                }
                ZcHandlerKind::Flow(ZcFlowKind::Then, _) => {
                    if state.pending_then.is_some() {
                        return Err(call.error("`then` follows another `then`"));
                    }
                    state.pending_then = Some(graph.add_node(node));
                }
                ZcHandlerKind::Flow(ZcFlowKind::Else, _) => {
                    if state.pending_then.is_some() || state.pending_else.is_some() {
                        return Err(call.error("`else` must close its conditional block"));
                    }
                    state.pending_else = Some(graph.add_node(node));
                }
                ZcHandlerKind::Flow(ZcFlowKind::Elif, mode) => {
                    let then = state
                        .pending_then
                        .take()
                        .ok_or_else(|| call.error("`elif` is missing a then action"))?;
                    node.kind = ZcNodeKind::Conditional(*mode);
                    node.then_branch = Some(then);
                    node.else_branch = state.pending_else.take();
                    state.pending_else = Some(graph.add_node(node));
                }
                ZcHandlerKind::Flow(ZcFlowKind::If, mode) => {
                    let then = state
                        .pending_then
                        .take()
                        .ok_or_else(|| call.error("`if` is missing a then action"))?;
                    node.kind = ZcNodeKind::Conditional(*mode);
                    node.then_branch = Some(then);
                    node.else_branch = state.pending_else.take();
                    node.next = state.accumulator;
                    node.catch_handler = state.pending_catch;
                    state.accumulator = Some(graph.add_node(node));
                }
            }
        }

        if state.pending_then.is_some() || state.pending_else.is_some() {
            return Err(ZcError::compile("a branch is left without its `if`"));
        }
        if state.accumulator.is_none() {
            return Err(ZcError::compile("chain has no executable step"));
        }
        graph.set_head(state.accumulator);
        Ok(graph)
    }

    fn compile_params(&self, params: &[ZcArgument]) -> Result<Vec<ZcParam>> {
        params.iter().map(|p| self.compile_param(p)).collect()
    }

    fn compile_param(&self, argument: &ZcArgument) -> Result<ZcParam> {
        Ok(match argument {
            ZcArgument::Literal(value) => ZcParam::Value(value.clone()),
            ZcArgument::Pattern { source, flags } => ZcParam::Pattern(
                ZcPattern::new(source, flags).map_err(|e| ZcError::compile(e.message()))?,
            ),
            ZcArgument::Param(name) => ZcParam::Param(name.clone()),
            ZcArgument::List(items) => ZcParam::List(self.compile_params(items)?),
            ZcArgument::Map(entries) => ZcParam::Map(
                entries
                    .iter()
                    .map(|(key, value)| Ok((key.clone(), self.compile_param(value)?)))
                    .collect::<Result<Vec<_>>>()?,
            ),
            ZcArgument::Chain(chain) => ZcParam::Chain {
                source: chain.source.clone(),
                graph: Arc::new(self.compile_descriptors(&chain.descriptors)?),
            },
            ZcArgument::Lambda(lambda) => ZcParam::Lambda {
                params: Arc::new(lambda.params.clone()),
                body: Arc::new(self.compile_param(&lambda.body)?),
            },
        })
    }
}
