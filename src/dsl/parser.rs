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

use crate::action::ZcPattern;
use crate::dsl::ir::{
    ZcArgument, ZcCallDescriptor, ZcChainArgument, ZcDescriptorProgram, ZcLambda,
};
use crate::dsl::lexer::{tokenize, ZcSpannedToken, ZcToken};
use crate::errors::{Result, ZcError};
use crate::registry::{ZcFlowKind, ZcRegistry};
use crate::value::{ZcRecord, ZcValue};

#[derive(Clone, Debug)]
pub struct ZcParserConfig {
    /// Maximum nesting of lambdas, piped chains and literal containers.
    pub max_depth: usize,
    /// Whether an open-ended current domain swallows unknown identifiers.
    pub open_fallback: bool,
}

impl Default for ZcParserConfig {
    fn default() -> Self {
        Self {
            max_depth: 64,
            open_fallback: true,
        }
    }
}

/// Turns script text into a descriptor sequence, resolving identifiers
/// against a registry.
#[derive(Debug)]
pub struct ZcParser<'r> {
    registry: &'r ZcRegistry,
    config: ZcParserConfig,
}

struct ZcCursor<'t> {
    tokens: &'t [ZcSpannedToken],
    pos: usize,
    end_offset: usize,
}

impl<'t> ZcCursor<'t> {
    fn peek(&self) -> Option<&'t ZcToken> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    fn peek_nth(&self, n: usize) -> Option<&'t ZcToken> {
        self.tokens.get(self.pos + n).map(|t| &t.token)
    }

    fn offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|t| t.offset)
            .unwrap_or(self.end_offset)
    }

    fn advance(&mut self) -> Option<&'t ZcToken> {
        let token = self.tokens.get(self.pos).map(|t| &t.token);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn check(&self, expected: &ZcToken) -> bool {
        matches!(self.peek(), Some(t) if std::mem::discriminant(t) == std::mem::discriminant(expected))
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn unexpected(&self, expected: &str) -> ZcError {
        match self.peek() {
            Some(token) => ZcError::parse(
                format!("expected {} but found `{}`", expected, token),
                self.offset(),
                Some(token.to_string()),
            ),
            None => ZcError::parse(
                format!("expected {} but the script ended", expected),
                self.end_offset,
                None,
            ),
        }
    }

    fn expect(&mut self, expected: ZcToken, label: &str) -> Result<()> {
        if self.check(&expected) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(label))
        }
    }

    fn expect_ident(&mut self, label: &str) -> Result<(String, usize)> {
        let offset = self.offset();
        match self.peek() {
            Some(ZcToken::Ident(name)) => {
                self.advance();
                Ok((name.clone(), offset))
            }
            _ => Err(self.unexpected(label)),
        }
    }
}

/// Domain resolution state of one chain.
#[derive(Default)]
struct ZcChainContext {
    current_domain: Option<String>,
}

type ZcResolved = (Option<String>, String, Option<String>);

impl<'r> ZcParser<'r> {
    pub fn new(registry: &'r ZcRegistry) -> Self {
        Self {
            registry,
            config: ZcParserConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ZcParserConfig) -> Self {
        self.config = config;
        self
    }

    /// Parses a whole script into its descriptor sequence.
    pub fn parse(&self, source: &str) -> Result<ZcDescriptorProgram> {
        let tokens = tokenize(source)?;
        if tokens.is_empty() {
            return Err(ZcError::parse("script is empty", 0, None));
        }
        let mut cursor = ZcCursor {
            tokens: &tokens,
            pos: 0,
            end_offset: source.len(),
        };
        let chain = self.parse_chain(&mut cursor, &[], 0)?;
        if !cursor.at_end() {
            return Err(cursor.unexpected("`.` or end of script"));
        }
        log::debug!("parsed {} descriptor(s)", chain.descriptors.len());
        Ok(ZcDescriptorProgram {
            descriptors: chain.descriptors,
        })
    }

    pub fn parse_file(&self, path: &std::path::Path) -> Result<ZcDescriptorProgram> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ZcError::Io(format!("{}: {}", path.display(), e)))?;
        self.parse(&content)
    }

    fn enter(&self, cursor: &ZcCursor<'_>, depth: usize) -> Result<usize> {
        if depth >= self.config.max_depth {
            return Err(ZcError::parse(
                format!("nesting deeper than {} levels", self.config.max_depth),
                cursor.offset(),
                None,
            ));
        }
        Ok(depth + 1)
    }

    fn parse_chain(
        &self,
        cursor: &mut ZcCursor<'_>,
        scope: &[String],
        depth: usize,
    ) -> Result<ZcChainArgument> {
        let mut source = None;
        if let (Some(ZcToken::Ident(name)), Some(ZcToken::Dot)) = (cursor.peek(), cursor.peek_nth(1)) {
            if scope.contains(name) {
                source = Some(name.clone());
                cursor.advance();
                cursor.advance();
            }
        }

        let mut context = ZcChainContext::default();
        let mut descriptors = Vec::new();
        loop {
            descriptors.push(self.parse_call(cursor, scope, depth, &mut context)?);
            if cursor.check(&ZcToken::Dot) {
                cursor.advance();
            } else {
                break;
            }
        }

        Ok(ZcChainArgument {
            source,
            descriptors,
        })
    }

    fn parse_call(
        &self,
        cursor: &mut ZcCursor<'_>,
        scope: &[String],
        depth: usize,
        context: &mut ZcChainContext,
    ) -> Result<ZcCallDescriptor> {
        let position = cursor.offset();
        let mut path = vec![cursor.expect_ident("an action name")?];
        while cursor.check(&ZcToken::Dot) {
            cursor.advance();
            path.push(cursor.expect_ident("an identifier after `.`")?);
        }
        if path.len() > 3 {
            let (name, offset) = &path[3];
            return Err(ZcError::parse(
                format!(
                    "too many segments in `{}`",
                    path.iter().map(|(n, _)| n.as_str()).collect::<Vec<_>>().join(".")
                ),
                *offset,
                Some(name.clone()),
            ));
        }
        let (domain, action, method) = self.resolve(&path, context)?;

        cursor.expect(ZcToken::LParen, "`(`")?;
        let params = self.parse_arguments(cursor, scope, depth, ZcToken::RParen, "`,` or `)`")?;

        Ok(ZcCallDescriptor {
            domain,
            action,
            method,
            params,
            position,
        })
    }

    fn resolve(&self, path: &[(String, usize)], context: &mut ZcChainContext) -> Result<ZcResolved> {
        let (first, first_offset) = &path[0];
        let unknown = |name: &str, offset: usize, what: &str| {
            ZcError::parse(format!("unknown {} `{}`", what, name), offset, Some(name.to_string()))
        };

        if path.len() >= 2 && self.registry.is_domain(first) {
            let (action, action_offset) = &path[1];
            let method = path.get(2).map(|(m, _)| m.as_str());
            if self.registry.resolve(first, action, method).is_none() {
                let dotted = path.iter().map(|(n, _)| n.as_str()).collect::<Vec<_>>().join(".");
                return Err(unknown(&dotted, *action_offset, "action"));
            }
            context.current_domain = Some(first.clone());
            return Ok((Some(first.clone()), action.clone(), method.map(str::to_string)));
        }

        let method = path.get(1).map(|(m, _)| m.as_str());
        if path.len() == 3 {
            return Err(unknown(first, *first_offset, "domain"));
        }

        if let Some(current) = context.current_domain.clone() {
            if self.registry.is_registered(&current, first, method) {
                return Ok((Some(current), first.clone(), method.map(str::to_string)));
            }
        }

        if method.is_none() {
            if let Some(kind) = ZcFlowKind::from_name(first) {
                let domain = match kind {
                    ZcFlowKind::Catch => {
                        let providers = self.registry.flow_domains(ZcFlowKind::Catch);
                        match providers.as_slice() {
                            [only] => Some(only.to_string()),
                            _ => None,
                        }
                    }
                    _ => None,
                };
                return Ok((domain, first.clone(), None));
            }
        }

        if let Some(current) = context.current_domain.clone() {
            if self.config.open_fallback && self.registry.is_open_domain(&current) {
                return Ok((Some(current), first.clone(), method.map(str::to_string)));
            }
        }

        if method.is_some() {
            Err(unknown(first, *first_offset, "domain"))
        } else {
            Err(unknown(first, *first_offset, "action"))
        }
    }

    fn parse_arguments(
        &self,
        cursor: &mut ZcCursor<'_>,
        scope: &[String],
        depth: usize,
        close: ZcToken,
        label: &str,
    ) -> Result<Vec<ZcArgument>> {
        let mut params = Vec::new();
        loop {
            if cursor.check(&close) {
                cursor.advance();
                return Ok(params);
            }
            params.push(self.parse_argument(cursor, scope, depth)?);
            if cursor.check(&ZcToken::Comma) {
                cursor.advance();
            } else if cursor.check(&close) {
                cursor.advance();
                return Ok(params);
            } else {
                return Err(cursor.unexpected(label));
            }
        }
    }

    fn parse_argument(
        &self,
        cursor: &mut ZcCursor<'_>,
        scope: &[String],
        depth: usize,
    ) -> Result<ZcArgument> {
        let offset = cursor.offset();
        match cursor.peek() {
            Some(ZcToken::Number(n)) => {
                cursor.advance();
                Ok(ZcArgument::Literal(ZcValue::Number(*n)))
            }
            Some(ZcToken::Str(s)) => {
                cursor.advance();
                Ok(ZcArgument::Literal(ZcValue::String(s.clone())))
            }
            Some(ZcToken::True) => {
                cursor.advance();
                Ok(ZcArgument::Literal(ZcValue::Bool(true)))
            }
            Some(ZcToken::False) => {
                cursor.advance();
                Ok(ZcArgument::Literal(ZcValue::Bool(false)))
            }
            Some(ZcToken::Null) => {
                cursor.advance();
                Ok(ZcArgument::Literal(ZcValue::Null))
            }
            Some(ZcToken::Pattern((source, flags))) => {
                ZcPattern::new(source, flags).map_err(|e| {
                    ZcError::parse(
                        format!("invalid pattern literal: {}", e.message()),
                        offset,
                        Some(format!("/{}/{}", source, flags)),
                    )
                })?;
                cursor.advance();
                Ok(ZcArgument::Pattern {
                    source: source.clone(),
                    flags: flags.clone(),
                })
            }
            Some(ZcToken::LBracket) => {
                let depth = self.enter(cursor, depth)?;
                cursor.advance();
                let items = self.parse_arguments(cursor, scope, depth, ZcToken::RBracket, "`,` or `]`")?;
                self.ensure_template(&items, offset)?;
                if items.iter().all(ZcArgument::is_literal) {
                    let values = items
                        .into_iter()
                        .filter_map(|item| match item {
                            ZcArgument::Literal(value) => Some(value),
                            _ => None,
                        })
                        .collect();
                    Ok(ZcArgument::Literal(ZcValue::Array(values)))
                } else {
                    Ok(ZcArgument::List(items))
                }
            }
            Some(ZcToken::LBrace) => {
                let depth = self.enter(cursor, depth)?;
                cursor.advance();
                self.parse_record(cursor, scope, depth, offset)
            }
            Some(ZcToken::LParen) => {
                let depth = self.enter(cursor, depth)?;
                cursor.advance();
                let mut params = Vec::new();
                if !cursor.check(&ZcToken::RParen) {
                    loop {
                        params.push(cursor.expect_ident("a lambda parameter")?.0);
                        if cursor.check(&ZcToken::Comma) {
                            cursor.advance();
                        } else {
                            break;
                        }
                    }
                }
                cursor.expect(ZcToken::RParen, "`)` closing the parameter list")?;
                cursor.expect(ZcToken::Arrow, "`=>`")?;
                self.parse_lambda_body(cursor, scope, depth, params)
            }
            Some(ZcToken::Ident(name)) => {
                if matches!(cursor.peek_nth(1), Some(ZcToken::Arrow)) {
                    let depth = self.enter(cursor, depth)?;
                    let param = name.clone();
                    cursor.advance();
                    cursor.advance();
                    return self.parse_lambda_body(cursor, scope, depth, vec![param]);
                }
                if scope.contains(name) && !matches!(cursor.peek_nth(1), Some(ZcToken::Dot)) {
                    cursor.advance();
                    return Ok(ZcArgument::Param(name.clone()));
                }
                if !matches!(cursor.peek_nth(1), Some(ZcToken::Dot) | Some(ZcToken::LParen)) {
                    return Err(ZcError::parse(
                        format!("unresolved identifier `{}`", name),
                        offset,
                        Some(name.clone()),
                    ));
                }
                let depth = self.enter(cursor, depth)?;
                Ok(ZcArgument::Chain(self.parse_chain(cursor, scope, depth)?))
            }
            _ => Err(cursor.unexpected("an argument")),
        }
    }

    fn parse_record(
        &self,
        cursor: &mut ZcCursor<'_>,
        scope: &[String],
        depth: usize,
        offset: usize,
    ) -> Result<ZcArgument> {
        let mut entries = Vec::new();
        loop {
            if cursor.check(&ZcToken::RBrace) {
                cursor.advance();
                break;
            }
            let key = match cursor.peek() {
                Some(ZcToken::Ident(k)) | Some(ZcToken::Str(k)) => k.clone(),
                _ => return Err(cursor.unexpected("a record key")),
            };
            cursor.advance();
            cursor.expect(ZcToken::Colon, "`:`")?;
            let value = self.parse_argument(cursor, scope, depth)?;
            entries.push((key, value));
            if cursor.check(&ZcToken::Comma) {
                cursor.advance();
            } else if cursor.check(&ZcToken::RBrace) {
                cursor.advance();
                break;
            } else {
                return Err(cursor.unexpected("`,` or `}`"));
            }
        }

        let values: Vec<ZcArgument> = entries.iter().map(|(_, v)| v.clone()).collect();
        self.ensure_template(&values, offset)?;
        if values.iter().all(ZcArgument::is_literal) {
            let record: ZcRecord = entries
                .into_iter()
                .filter_map(|(k, v)| match v {
                    ZcArgument::Literal(value) => Some((k, value)),
                    _ => None,
                })
                .collect();
            Ok(ZcArgument::Literal(ZcValue::Record(record)))
        } else {
            Ok(ZcArgument::Map(entries))
        }
    }

    /// Containers may only hold literals, parameter references and nested
    /// containers.
    fn ensure_template(&self, items: &[ZcArgument], offset: usize) -> Result<()> {
        for item in items {
            match item {
                ZcArgument::Literal(_) | ZcArgument::Param(_) => {}
                ZcArgument::List(inner) => self.ensure_template(inner, offset)?,
                ZcArgument::Map(inner) => {
                    let values: Vec<ZcArgument> = inner.iter().map(|(_, v)| v.clone()).collect();
                    self.ensure_template(&values, offset)?
                }
                ZcArgument::Pattern { .. } | ZcArgument::Chain(_) | ZcArgument::Lambda(_) => {
                    return Err(ZcError::parse(
                        "array and record literals may only contain values",
                        offset,
                        None,
                    ))
                }
            }
        }
        Ok(())
    }

    fn parse_lambda_body(
        &self,
        cursor: &mut ZcCursor<'_>,
        scope: &[String],
        depth: usize,
        params: Vec<String>,
    ) -> Result<ZcArgument> {
        let mut inner_scope = scope.to_vec();
        inner_scope.extend(params.iter().cloned());
        let body = self.parse_argument(cursor, &inner_scope, depth)?;
        Ok(ZcArgument::Lambda(ZcLambda {
            params,
            body: Box::new(body),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_identifier_continues_current_domain() {
        let registry = ZcRegistry::with_defaults();
        let program = ZcParser::new(&registry)
            .parse("array.filter(x => x).sort()")
            .unwrap();
        let names: Vec<String> = program.descriptors.iter().map(|d| d.to_string()).collect();
        assert_eq!(names, vec!["array.filter", "array.sort"]);
    }

    #[test]
    fn unknown_identifier_is_named() {
        let registry = ZcRegistry::with_defaults();
        let err = ZcParser::new(&registry).parse("array.sort().bogus()").unwrap_err();
        match err {
            ZcError::Parse { token, .. } => assert_eq!(token.as_deref(), Some("bogus")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn lambda_parameters_are_lexically_scoped() {
        let registry = ZcRegistry::with_defaults();
        let program = ZcParser::new(&registry)
            .parse("loop.range(0, 3, i => array.map(x => math.add(i)))")
            .unwrap();
        assert_eq!(program.len(), 1);
        let err = ZcParser::new(&registry).parse("array.map(math.add(i))").unwrap_err();
        assert!(matches!(err, ZcError::Parse { .. }));
    }
}
