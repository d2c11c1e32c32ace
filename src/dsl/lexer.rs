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

//! Lexical analysis for chain scripts.
//!
//! Whitespace and `#` line comments are skipped. Pattern literals (`/a+/i`)
//! are unambiguous because the language has no division operator.

use std::fmt;

use logos::Logos;

use crate::errors::{Result, ZcError};

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r"#[^\n]*")]
pub enum ZcToken {
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,

    #[token(".")]
    Dot,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token("=>")]
    Arrow,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,

    #[regex(r"-?[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok().filter(|n| n.is_finite()))]
    Number(f64),

    #[regex(r#""([^"\\]|\\.)*""#, |lex| unescape(lex.slice()))]
    #[regex(r#"'([^'\\]|\\.)*'"#, |lex| unescape(lex.slice()))]
    Str(String),

    /// `(source, flags)`
    #[regex(r"/([^/\\\n]|\\.)+/[A-Za-z]*", |lex| split_pattern(lex.slice()))]
    Pattern((String, String)),

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),
}

impl fmt::Display for ZcToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZcToken::True => f.write_str("true"),
            ZcToken::False => f.write_str("false"),
            ZcToken::Null => f.write_str("null"),
            ZcToken::Dot => f.write_str("."),
            ZcToken::Comma => f.write_str(","),
            ZcToken::Colon => f.write_str(":"),
            ZcToken::Arrow => f.write_str("=>"),
            ZcToken::LParen => f.write_str("("),
            ZcToken::RParen => f.write_str(")"),
            ZcToken::LBracket => f.write_str("["),
            ZcToken::RBracket => f.write_str("]"),
            ZcToken::LBrace => f.write_str("{"),
            ZcToken::RBrace => f.write_str("}"),
            ZcToken::Number(n) => write!(f, "{}", n),
            ZcToken::Str(s) => write!(f, "{:?}", s),
            ZcToken::Pattern((source, flags)) => write!(f, "/{}/{}", source, flags),
            ZcToken::Ident(name) => f.write_str(name),
        }
    }
}

/// Token paired with its byte offset in the script.
#[derive(Clone, Debug, PartialEq)]
pub struct ZcSpannedToken {
    pub token: ZcToken,
    pub offset: usize,
}

fn unescape(slice: &str) -> Option<String> {
    let inner = &slice[1..slice.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            '0' => out.push('\0'),
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            '/' => out.push('/'),
            'u' => {
                if chars.next()? != '{' {
                    return None;
                }
                let mut hex = String::new();
                loop {
                    match chars.next()? {
                        '}' => break,
                        h => hex.push(h),
                    }
                }
                let code = u32::from_str_radix(&hex, 16).ok()?;
                out.push(char::from_u32(code)?);
            }
            _ => return None,
        }
    }
    Some(out)
}

fn split_pattern(slice: &str) -> Option<(String, String)> {
    let end = slice.rfind('/')?;
    let source = slice[1..end].replace("\\/", "/");
    let flags = slice[end + 1..].to_string();
    Some((source, flags))
}

/// Tokenizes a whole script.
pub fn tokenize(source: &str) -> Result<Vec<ZcSpannedToken>> {
    let mut lexer = ZcToken::lexer(source);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(token) => tokens.push(ZcSpannedToken {
                token,
                offset: span.start,
            }),
            Err(()) => {
                let slice = lexer.slice();
                let message = match slice.chars().next() {
                    Some('"') | Some('\'') => format!("unbalanced or malformed string literal {}", slice),
                    Some('/') => format!("unbalanced pattern literal {}", slice),
                    _ if slice.parse::<f64>().map_or(false, |n| !n.is_finite()) => {
                        format!("number literal {} is out of range", slice)
                    }
                    _ => format!("unexpected character '{}'", slice),
                };
                return Err(ZcError::parse(message, span.start, Some(slice.to_string())));
            }
        }
    }
    Ok(tokens)
}
