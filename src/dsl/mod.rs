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

//! # DSL (Domain Specific Language) Module
//!
//! This module turns chain scripts into executable graphs.
//!
//! ## Architecture
//!
//! The DSL system consists of four components:
//! - **Lexer** ([lexer.rs](lexer/index.html)): Tokenizes script text with `logos`
//! - **Parser** ([parser.rs](parser/index.html)): Resolves identifiers against the
//!   registry and produces the call descriptor sequence
//! - **IR** ([ir.rs](ir/index.html)): Call descriptors and pending arguments
//! - **Compiler** ([compiler.rs](compiler/index.html)): Links descriptors into an
//!   executable graph of spine nodes, branches and catch handlers
//!
//! ## Script Syntax
//!
//! A script is one dotted chain of calls. An identifier without a domain
//! continues the most recent explicit domain:
//!
//! ```text
//! array.filter(x => math.gt(2)).sort()
//!   .step.if(x => array.length().math.gt(0))
//!   .then(array.first())
//!   .else(null)
//! ```
//!
//! Arguments are literals, pattern literals (`/a+/i`), array and record
//! literals, lambdas (`x => body`, `(a, b) => body`) and piped chains.

pub mod compiler;
pub mod ir;
pub mod lexer;
pub mod parser;

pub use compiler::ZcCompiler;
pub use ir::{ZcArgument, ZcCallDescriptor, ZcChainArgument, ZcDescriptorProgram, ZcLambda};
pub use lexer::{tokenize, ZcSpannedToken, ZcToken};
pub use parser::{ZcParser, ZcParserConfig};
