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

//! # Pipeline Runtime
//!
//! Executes compiled graphs. The spine is walked iteratively; conditionals,
//! loops and catch handlers are entered through their owning node. Nested
//! chains and lambdas become [`ZcCallable`]s that re-enter the runtime through
//! [`ZcRuntime::run_graph`], so every evaluation of a sub-chain is fresh.

use std::sync::Arc;

use futures::future::{self, FutureExt};

use crate::action::{ZcArg, ZcArgs, ZcCallFuture, ZcCallable};
use crate::errors::{Result, ZcError};
use crate::graph::{ZcGraph, ZcNode, ZcNodeId, ZcNodeKind, ZcParam};
use crate::registry::ZcCondMode;
use crate::value::{ZcRecord, ZcValue};

/// Runtime switches taken from the engine configuration.
#[derive(Clone, Debug, Default)]
pub struct ZcRuntimeOptions {
    /// Log every node dispatch.
    pub trace: bool,
    /// Abort loops after this many iterations.
    pub loop_limit: Option<u64>,
}

struct ZcFrame {
    bindings: Vec<(String, ZcValue)>,
    parent: Option<Arc<ZcFrame>>,
}

/// Lexical scope of lambda parameters.
#[derive(Clone, Default)]
pub struct ZcScope {
    frame: Option<Arc<ZcFrame>>,
}

impl ZcScope {
    pub fn root() -> Self {
        Self::default()
    }

    /// Child scope binding `names` positionally; missing values bind to null.
    pub fn bind(&self, names: &[String], values: Vec<ZcValue>) -> Self {
        let mut values = values.into_iter();
        let bindings = names
            .iter()
            .map(|name| (name.clone(), values.next().unwrap_or_default()))
            .collect();
        ZcScope {
            frame: Some(Arc::new(ZcFrame {
                bindings,
                parent: self.frame.clone(),
            })),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<ZcValue> {
        let mut frame = self.frame.as_ref();
        while let Some(current) = frame {
            if let Some((_, value)) = current.bindings.iter().rev().find(|(n, _)| n == name) {
                return Some(value.clone());
            }
            frame = current.parent.as_ref();
        }
        None
    }

    fn require(&self, name: &str) -> Result<ZcValue> {
        self.lookup(name)
            .ok_or_else(|| ZcError::action(format!("unbound parameter `{}`", name)))
    }
}

impl std::fmt::Debug for ZcScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names = Vec::new();
        let mut frame = self.frame.as_ref();
        while let Some(current) = frame {
            names.extend(current.bindings.iter().map(|(n, _)| n.clone()));
            frame = current.parent.as_ref();
        }
        f.debug_struct("ZcScope").field("names", &names).finish()
    }
}

/// Executes compiled graphs against a blob.
#[derive(Clone, Debug, Default)]
pub struct ZcRuntime {
    options: Arc<ZcRuntimeOptions>,
}

impl ZcRuntime {
    pub fn new(options: ZcRuntimeOptions) -> Self {
        Self {
            options: Arc::new(options),
        }
    }

    pub fn options(&self) -> &ZcRuntimeOptions {
        &self.options
    }

    /// Runs `graph` from its head with `blob` as the initial input.
    pub async fn process(&self, graph: &ZcGraph, blob: ZcValue) -> Result<ZcValue> {
        self.run_spine(graph, graph.head(), blob, &ZcScope::root())
            .await
    }

    /// Boxed entry point used by callables wrapping nested chains.
    pub fn run_graph(&self, graph: Arc<ZcGraph>, blob: ZcValue, scope: ZcScope) -> ZcCallFuture {
        let runtime = self.clone();
        async move { runtime.run_spine(&graph, graph.head(), blob, &scope).await }.boxed()
    }

    async fn run_spine(
        &self,
        graph: &ZcGraph,
        start: Option<ZcNodeId>,
        mut blob: ZcValue,
        scope: &ZcScope,
    ) -> Result<ZcValue> {
        let mut cursor = start;
        while let Some(id) = cursor {
            let node = graph.node(id)?;
            if self.options.trace {
                log::info!("{} {} <- {}", id, node.name(), blob.kind());
            }
            match self.run_node(graph, node, blob.clone(), scope).await {
                Ok(output) => {
                    blob = output;
                    cursor = node.next;
                }
                Err(err) => {
                    let err = err.annotate(&node.domain, &node.action);
                    let handler = match node.catch_handler {
                        Some(handler) if !err.is_abort() => graph.node(handler)?,
                        _ => return Err(err),
                    };
                    log::debug!("{} caught by {}: {}", node.name(), handler.name(), err);
                    blob = self
                        .run_catch(handler, blob, err, scope)
                        .await
                        .map_err(|e| e.annotate(&handler.domain, &handler.action))?;
                    cursor = handler.next;
                }
            }
        }
        Ok(blob)
    }

    async fn run_node(
        &self,
        graph: &ZcGraph,
        node: &ZcNode,
        blob: ZcValue,
        scope: &ZcScope,
    ) -> Result<ZcValue> {
        match &node.kind {
            ZcNodeKind::Leaf(handler) => {
                let args = self.resolve_args(node, scope)?;
                handler.invoke(blob, args).await
            }
            ZcNodeKind::Conditional(mode) => {
                self.run_conditional(graph, node, *mode, blob, scope).await
            }
            ZcNodeKind::Branch => self.run_branch(node, blob, scope).await,
            ZcNodeKind::Catch => Ok(blob),
        }
    }

    async fn run_catch(
        &self,
        handler: &ZcNode,
        blob: ZcValue,
        err: ZcError,
        scope: &ZcScope,
    ) -> Result<ZcValue> {
        match handler.params.first() {
            None => Ok(blob),
            Some(param) => {
                let error = ZcValue::error(err.into_runtime());
                self.resolve_param(param, scope)?
                    .to_callable()
                    .call(blob, vec![error])
                    .await
            }
        }
    }

    async fn run_branch(&self, node: &ZcNode, blob: ZcValue, scope: &ZcScope) -> Result<ZcValue> {
        match node.params.first() {
            None => Ok(blob),
            Some(param) => self.apply(param, scope, blob).await,
        }
    }

    async fn test(&self, node: &ZcNode, subject: &ZcValue, scope: &ZcScope) -> Result<bool> {
        let verdict = match node.params.first() {
            None => subject.clone(),
            Some(param) => self.apply(param, scope, subject.clone()).await?,
        };
        Ok(verdict.is_truthy())
    }

    /// Single-shot evaluation of an `if`/`elif` cascade.
    async fn cascade(
        &self,
        graph: &ZcGraph,
        start: &ZcNode,
        subject: ZcValue,
        scope: &ZcScope,
    ) -> Result<ZcValue> {
        let mut current = start;
        loop {
            if self.test(current, &subject, scope).await? {
                return match current.then_branch {
                    Some(id) => self.run_branch(graph.node(id)?, subject, scope).await,
                    None => Ok(subject),
                };
            }
            let otherwise = match current.else_branch {
                Some(id) => graph.node(id)?,
                None => return Ok(subject),
            };
            match otherwise.kind {
                ZcNodeKind::Conditional(_) => current = otherwise,
                _ => return self.run_branch(otherwise, subject, scope).await,
            }
        }
    }

    async fn run_else(
        &self,
        graph: &ZcGraph,
        node: &ZcNode,
        subject: ZcValue,
        scope: &ZcScope,
    ) -> Result<ZcValue> {
        let otherwise = match node.else_branch {
            Some(id) => graph.node(id)?,
            None => return Ok(subject),
        };
        match otherwise.kind {
            ZcNodeKind::Conditional(_) => self.cascade(graph, otherwise, subject, scope).await,
            _ => self.run_branch(otherwise, subject, scope).await,
        }
    }

    fn check_limit(&self, iterations: u64) -> Result<()> {
        match self.options.loop_limit {
            Some(limit) if iterations > limit => Err(ZcError::loop_limit(limit)),
            _ => Ok(()),
        }
    }

    async fn run_conditional(
        &self,
        graph: &ZcGraph,
        node: &ZcNode,
        mode: ZcCondMode,
        blob: ZcValue,
        scope: &ZcScope,
    ) -> Result<ZcValue> {
        let then = match node.then_branch {
            Some(id) => graph.node(id)?,
            None => return Err(ZcError::action("conditional has no then branch")),
        };

        match mode {
            ZcCondMode::Step => self.cascade(graph, node, blob, scope).await,
            ZcCondMode::Loop => {
                if !self.test(node, &blob, scope).await? {
                    return self.run_else(graph, node, blob, scope).await;
                }
                let mut iterations = 0u64;
                let mut output;
                loop {
                    iterations += 1;
                    self.check_limit(iterations)?;
                    output = self.run_branch(then, blob.clone(), scope).await?;
                    if !self.test(node, &blob, scope).await? {
                        break;
                    }
                }
                Ok(output)
            }
            ZcCondMode::Feedback => {
                if !self.test(node, &blob, scope).await? {
                    return self.run_else(graph, node, blob, scope).await;
                }
                let mut iterations = 0u64;
                let mut state = blob;
                loop {
                    iterations += 1;
                    self.check_limit(iterations)?;
                    state = self.run_branch(then, state, scope).await?;
                    if !self.test(node, &state, scope).await? {
                        break;
                    }
                }
                Ok(state)
            }
        }
    }

    fn resolve_args(&self, node: &ZcNode, scope: &ZcScope) -> Result<ZcArgs> {
        let items = node
            .params
            .iter()
            .map(|param| self.resolve_param(param, scope))
            .collect::<Result<Vec<_>>>()?;
        Ok(
            ZcArgs::new(node.domain.clone(), node.action.clone(), node.method.clone(), items)
                .with_loop_limit(self.options.loop_limit),
        )
    }

    /// Resolves a compiled parameter in `scope`. Nothing is executed here;
    /// chains and lambdas only run when the consuming action calls them.
    pub fn resolve_param(&self, param: &ZcParam, scope: &ZcScope) -> Result<ZcArg> {
        Ok(match param {
            ZcParam::Value(value) => ZcArg::Value(value.clone()),
            ZcParam::Pattern(pattern) => ZcArg::Pattern(pattern.clone()),
            ZcParam::Param(_) | ZcParam::List(_) | ZcParam::Map(_) => {
                ZcArg::Value(self.resolve_template(param, scope)?)
            }
            ZcParam::Chain { source, graph } => {
                let runtime = self.clone();
                let graph = graph.clone();
                let source = source.clone();
                let scope = scope.clone();
                ZcArg::Callable(ZcCallable::new(move |blob, _extra| {
                    let input = match &source {
                        Some(name) => match scope.require(name) {
                            Ok(value) => value,
                            Err(err) => return future::ready(Err(err)).boxed(),
                        },
                        None => blob,
                    };
                    runtime.run_graph(graph.clone(), input, scope.clone())
                }))
            }
            ZcParam::Lambda { params, body } => {
                let runtime = self.clone();
                let params = params.clone();
                let body = body.clone();
                let scope = scope.clone();
                ZcArg::Callable(ZcCallable::new(move |blob, extra| {
                    let mut values = Vec::with_capacity(extra.len() + 1);
                    values.push(blob.clone());
                    values.extend(extra);
                    let frame = scope.bind(&params, values);
                    runtime.apply_boxed(body.clone(), frame, blob)
                }))
            }
        })
    }

    fn resolve_template(&self, param: &ZcParam, scope: &ZcScope) -> Result<ZcValue> {
        match param {
            ZcParam::Value(value) => Ok(value.clone()),
            ZcParam::Param(name) => scope.require(name),
            ZcParam::List(items) => Ok(ZcValue::Array(
                items
                    .iter()
                    .map(|item| self.resolve_template(item, scope))
                    .collect::<Result<Vec<_>>>()?,
            )),
            ZcParam::Map(entries) => Ok(ZcValue::Record(
                entries
                    .iter()
                    .map(|(key, value)| Ok((key.clone(), self.resolve_template(value, scope)?)))
                    .collect::<Result<ZcRecord>>()?,
            )),
            _ => Err(ZcError::action(
                "array and record literals may only contain values",
            )),
        }
    }

    /// Evaluates an argument against `blob` under the calling convention.
    fn apply(&self, param: &ZcParam, scope: &ZcScope, blob: ZcValue) -> ZcCallFuture {
        match self.resolve_param(param, scope) {
            Ok(ZcArg::Value(value)) => future::ready(Ok(value)).boxed(),
            Ok(arg) => arg.to_callable().call(blob, Vec::new()),
            Err(err) => future::ready(Err(err)).boxed(),
        }
    }

    fn apply_boxed(&self, body: Arc<ZcParam>, scope: ZcScope, blob: ZcValue) -> ZcCallFuture {
        self.apply(&body, &scope, blob)
    }
}
