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

//! # ZiChain Action Module
//!
//! This module defines the contract between the pipeline runtime and the leaf
//! actions behind the registry.
//!
//! ## Calling Convention
//!
//! Every leaf action receives the current blob and a [`ZcArgs`] list. Each
//! argument has already been resolved to one of three shapes:
//!
//! - a plain value ([`ZcArg::Value`])
//! - a pattern literal ([`ZcArg::Pattern`])
//! - a callable ([`ZcArg::Callable`]) wrapping a host function, a lambda or a
//!   bound sub-chain
//!
//! [`ZcArgs::callable`] and [`ZcArgs::call`] normalize all three into the
//! single `(blob, extra...) -> value` convention, so an action never has to
//! care whether the script passed `5`, `x => math.add(1)` or `math.add(1)`.
//!
//! Callables are resolved lazily: nothing runs until the action consumes the
//! argument.
//!
//! ## Implementing Actions
//!
//! ```rust
//! use zichain::action::{ZcArgs, ZcFnAction};
//! use zichain::errors::Result;
//! use zichain::value::{expect_string, ZcValue};
//!
//! async fn shout(blob: ZcValue, _args: ZcArgs) -> Result<ZcValue> {
//!     Ok(ZcValue::from(expect_string(blob)?.to_uppercase()))
//! }
//!
//! let action = ZcFnAction(shout);
//! ```

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::{self, BoxFuture, FutureExt};
use regex::{Regex, RegexBuilder};

use crate::errors::{Result, ZcError};
use crate::value::{expecting_message, ZcKind, ZcValue};

/// Future returned by every callable.
pub type ZcCallFuture = BoxFuture<'static, Result<ZcValue>>;

type ZcCallFn = dyn Fn(ZcValue, Vec<ZcValue>) -> ZcCallFuture + Send + Sync;

/// Normalized function value: `(blob, extra...) -> value`, possibly suspending.
#[derive(Clone)]
pub struct ZcCallable {
    inner: Arc<ZcCallFn>,
}

impl ZcCallable {
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(ZcValue, Vec<ZcValue>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ZcValue>> + Send + 'static,
    {
        ZcCallable {
            inner: Arc::new(move |blob, extra| f(blob, extra).boxed()),
        }
    }

    pub fn from_sync<F>(f: F) -> Self
    where
        F: Fn(ZcValue, Vec<ZcValue>) -> Result<ZcValue> + Send + Sync + 'static,
    {
        Self::new(move |blob, extra| future::ready(f(blob, extra)))
    }

    /// Callable that ignores its input and yields `value`.
    pub fn constant(value: ZcValue) -> Self {
        Self::from_sync(move |_, _| Ok(value.clone()))
    }

    pub fn identity() -> Self {
        Self::from_sync(|blob, _| Ok(blob))
    }

    pub fn call(&self, blob: ZcValue, extra: Vec<ZcValue>) -> ZcCallFuture {
        (self.inner)(blob, extra)
    }
}

impl fmt::Debug for ZcCallable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ZcCallable(..)")
    }
}

/// Compiled pattern literal, e.g. `/^a+/i`.
///
/// The `g` flag is kept for actions that distinguish first/all matches; the
/// remaining flags map onto the regex builder.
#[derive(Clone, Debug)]
pub struct ZcPattern {
    source: String,
    flags: String,
    regex: Regex,
}

impl ZcPattern {
    pub fn new(source: &str, flags: &str) -> Result<Self> {
        let mut builder = RegexBuilder::new(source);
        for flag in flags.chars() {
            match flag {
                'i' => {
                    builder.case_insensitive(true);
                }
                'm' => {
                    builder.multi_line(true);
                }
                's' => {
                    builder.dot_matches_new_line(true);
                }
                'x' => {
                    builder.ignore_whitespace(true);
                }
                'U' => {
                    builder.swap_greed(true);
                }
                'g' => {}
                other => {
                    return Err(ZcError::action(format!(
                        "unsupported pattern flag '{}'",
                        other
                    )))
                }
            }
        }
        let regex = builder
            .build()
            .map_err(|e| ZcError::action(format!("invalid pattern /{}/: {}", source, e)))?;
        Ok(ZcPattern {
            source: source.to_string(),
            flags: flags.to_string(),
            regex,
        })
    }

    /// Pattern matching `text` literally.
    pub fn literal(text: &str) -> Result<Self> {
        Self::new(&regex::escape(text), "g")
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn flags(&self) -> &str {
        &self.flags
    }

    pub fn is_global(&self) -> bool {
        self.flags.contains('g')
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

impl PartialEq for ZcPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.flags == other.flags
    }
}

/// A resolved argument as seen by a leaf action.
#[derive(Clone, Debug)]
pub enum ZcArg {
    Value(ZcValue),
    Pattern(ZcPattern),
    Callable(ZcCallable),
}

impl ZcArg {
    fn shape(&self) -> &'static str {
        match self {
            ZcArg::Value(_) => "value",
            ZcArg::Pattern(_) => "pattern",
            ZcArg::Callable(_) => "function",
        }
    }

    /// Normalizes the argument into a callable.
    ///
    /// A value becomes a constant function; a pattern becomes a test of the
    /// rendered input.
    pub fn to_callable(&self) -> ZcCallable {
        match self {
            ZcArg::Callable(callable) => callable.clone(),
            ZcArg::Value(value) => ZcCallable::constant(value.clone()),
            ZcArg::Pattern(pattern) => {
                let pattern = pattern.clone();
                ZcCallable::from_sync(move |blob, _| {
                    Ok(ZcValue::Bool(pattern.regex().is_match(&blob.render())))
                })
            }
        }
    }
}

/// Argument list handed to a leaf action together with its call site.
#[derive(Clone, Debug, Default)]
pub struct ZcArgs {
    domain: String,
    action: String,
    method: Option<String>,
    items: Vec<ZcArg>,
    loop_limit: Option<u64>,
}

impl ZcArgs {
    pub fn new(
        domain: impl Into<String>,
        action: impl Into<String>,
        method: Option<String>,
        items: Vec<ZcArg>,
    ) -> Self {
        ZcArgs {
            domain: domain.into(),
            action: action.into(),
            method,
            items,
            loop_limit: None,
        }
    }

    /// Caps the iterations of unbounded loop actions.
    pub fn with_loop_limit(mut self, limit: Option<u64>) -> Self {
        self.loop_limit = limit;
        self
    }

    pub fn loop_limit(&self) -> Option<u64> {
        self.loop_limit
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ZcArg> {
        self.items.get(index)
    }

    pub fn items(&self) -> &[ZcArg] {
        &self.items
    }

    fn missing(&self, index: usize) -> ZcError {
        ZcError::action(format!(
            "{}.{} requires argument #{}",
            self.domain,
            self.action,
            index + 1
        ))
    }

    fn wrong_shape(&self, index: usize, expected: &str, found: &ZcArg) -> ZcError {
        ZcError::type_error(format!(
            "{}.{} argument #{}: expecting {} but found {}",
            self.domain,
            self.action,
            index + 1,
            expected,
            found.shape()
        ))
    }

    pub fn require(&self, index: usize) -> Result<&ZcArg> {
        self.items.get(index).ok_or_else(|| self.missing(index))
    }

    /// Literal value at `index`; `None` when absent.
    pub fn value(&self, index: usize) -> Result<Option<&ZcValue>> {
        match self.items.get(index) {
            None => Ok(None),
            Some(ZcArg::Value(value)) => Ok(Some(value)),
            Some(other) => Err(self.wrong_shape(index, "value", other)),
        }
    }

    pub fn require_value(&self, index: usize) -> Result<&ZcValue> {
        self.value(index)?.ok_or_else(|| self.missing(index))
    }

    pub fn opt_string(&self, index: usize) -> Result<Option<String>> {
        match self.value(index)? {
            None | Some(ZcValue::Null) => Ok(None),
            Some(ZcValue::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(ZcError::type_error(expecting_message(
                &[ZcKind::String],
                other.kind(),
            ))),
        }
    }

    pub fn string(&self, index: usize) -> Result<String> {
        self.opt_string(index)?.ok_or_else(|| self.missing(index))
    }

    pub fn opt_number(&self, index: usize) -> Result<Option<f64>> {
        match self.value(index)? {
            None | Some(ZcValue::Null) => Ok(None),
            Some(ZcValue::Number(n)) => Ok(Some(*n)),
            Some(other) => Err(ZcError::type_error(expecting_message(
                &[ZcKind::Number],
                other.kind(),
            ))),
        }
    }

    pub fn number(&self, index: usize) -> Result<f64> {
        self.opt_number(index)?.ok_or_else(|| self.missing(index))
    }

    /// Pattern at `index`; a string literal is matched literally.
    pub fn pattern(&self, index: usize) -> Result<ZcPattern> {
        match self.require(index)? {
            ZcArg::Pattern(pattern) => Ok(pattern.clone()),
            ZcArg::Value(ZcValue::String(s)) => ZcPattern::literal(s),
            other => Err(self.wrong_shape(index, "pattern or string", other)),
        }
    }

    /// Normalized callable at `index`.
    pub fn callable(&self, index: usize) -> Result<ZcCallable> {
        Ok(self.require(index)?.to_callable())
    }

    pub fn opt_callable(&self, index: usize) -> Option<ZcCallable> {
        self.items.get(index).map(ZcArg::to_callable)
    }

    /// Resolves the argument at `index` against `blob`.
    ///
    /// Values are returned as-is without going through a callable.
    pub async fn call(&self, index: usize, blob: ZcValue, extra: Vec<ZcValue>) -> Result<ZcValue> {
        match self.require(index)? {
            ZcArg::Value(value) => Ok(value.clone()),
            other => other.to_callable().call(blob, extra).await,
        }
    }

    /// Like [`ZcArgs::call`], yielding `blob` unchanged when the argument is absent.
    pub async fn call_or_identity(&self, index: usize, blob: ZcValue) -> Result<ZcValue> {
        if self.items.get(index).is_none() {
            return Ok(blob);
        }
        self.call(index, blob, Vec::new()).await
    }

    /// Every argument rendered as text; used for command lines.
    pub fn rendered(&self) -> Result<Vec<String>> {
        self.items
            .iter()
            .enumerate()
            .map(|(index, arg)| match arg {
                ZcArg::Value(value) => Ok(value.render()),
                ZcArg::Pattern(pattern) => Ok(pattern.source().to_string()),
                other => Err(self.wrong_shape(index, "value", other)),
            })
            .collect()
    }
}

/// Contract every leaf action fulfills.
#[async_trait]
pub trait ZcAction: Send + Sync {
    async fn invoke(&self, blob: ZcValue, args: ZcArgs) -> Result<ZcValue>;
}

/// Adapter turning an async function or closure into a [`ZcAction`].
pub struct ZcFnAction<F>(pub F);

#[async_trait]
impl<F, Fut> ZcAction for ZcFnAction<F>
where
    F: Fn(ZcValue, ZcArgs) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<ZcValue>> + Send + 'static,
{
    async fn invoke(&self, blob: ZcValue, args: ZcArgs) -> Result<ZcValue> {
        (self.0)(blob, args).await
    }
}

/// Adapter for actions that never suspend.
pub struct ZcSyncAction<F>(pub F);

impl<F> ZcSyncAction<F>
where
    F: Fn(ZcValue, &ZcArgs) -> Result<ZcValue> + Send + Sync + 'static,
{
    /// Wraps a closure, pinning its signature for inference.
    pub fn new(f: F) -> Self {
        ZcSyncAction(f)
    }
}

#[async_trait]
impl<F> ZcAction for ZcSyncAction<F>
where
    F: Fn(ZcValue, &ZcArgs) -> Result<ZcValue> + Send + Sync + 'static,
{
    async fn invoke(&self, blob: ZcValue, args: ZcArgs) -> Result<ZcValue> {
        (self.0)(blob, &args)
    }
}
