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

use zichain::graph::{ZcNodeKind, ZcParam};
use zichain::{ZcCondMode, ZcEngine, ZcError, ZcGraph, ZcNode};

fn compile(script: &str) -> Result<ZcGraph, ZcError> {
    ZcEngine::new().compile(script)
}

fn compile_error(script: &str) -> String {
    match compile(script) {
        Err(err @ ZcError::Compile { .. }) => err.message(),
        Err(other) => panic!("expected a compile error for {script}, got {other:?}"),
        Ok(graph) => panic!("expected {script} to fail, got spine {:?}", graph.spine()),
    }
}

fn head(graph: &ZcGraph) -> &ZcNode {
    graph.node(graph.head().unwrap()).unwrap()
}

#[test]
fn test_flow_actions_cannot_start_a_chain() {
    for script in ["then(1)", "elif(true)", "else(1)", "catch(1)", "error.catch(1)"] {
        let message = compile_error(script);
        assert!(message.contains("cannot start a chain"), "{script}: {message}");
    }
}

#[test]
fn test_bare_if_needs_a_domain() {
    assert!(compile_error("if(true).then(1)").contains("explicit domain"));
}

#[test]
fn test_if_without_then() {
    assert!(compile_error("step.if(true).else(1)").contains("`if` is missing a then action"));
    assert!(compile_error("step.if(true).elif(false).then(1)").contains("missing a then action"));
}

#[test]
fn test_continuation_without_parent_if() {
    assert!(compile_error("math.add(1).then(2)").contains("missing a parent if"));
    assert!(compile_error("step.if(true).then(1).math.add(1).else(2)").contains("missing a parent if"));
}

#[test]
fn test_branch_domain_must_match_its_if() {
    assert!(compile_error("step.if(true).then(1).loop.else(2)").contains("domain mismatch"));
}

#[test]
fn test_misordered_branches() {
    assert!(compile_error("step.if(true).then(1).then(2)").contains("follows another `then`"));
    assert!(compile_error("step.if(true).then(1).else(2).else(3)").contains("must close"));
}

#[test]
fn test_conditional_cascade_shape() {
    let graph = compile(
        "step.if(math.gt(5)).then('big').elif(math.gt(2)).then('mid').else('small').string.upper()",
    )
    .unwrap();
    assert_eq!(graph.spine(), vec!["step.if", "string.upper"]);

    let cond = head(&graph);
    assert!(matches!(cond.kind, ZcNodeKind::Conditional(ZcCondMode::Step)));
    let then = graph.node(cond.then_branch.unwrap()).unwrap();
    assert!(matches!(then.kind, ZcNodeKind::Branch));
    assert_eq!(then.next, None);

    let elif = graph.node(cond.else_branch.unwrap()).unwrap();
    assert_eq!(elif.action, "elif");
    assert!(matches!(elif.kind, ZcNodeKind::Conditional(ZcCondMode::Step)));
    let otherwise = graph.node(elif.else_branch.unwrap()).unwrap();
    assert_eq!(otherwise.action, "else");
}

#[test]
fn test_loop_domains_keep_their_mode() {
    let graph = compile("iterate.if(math.lt(10)).then(math.mul(2))").unwrap();
    assert!(matches!(head(&graph).kind, ZcNodeKind::Conditional(ZcCondMode::Feedback)));
    let graph = compile("loop.if(math.lt(10)).then(math.mul(2))").unwrap();
    assert!(matches!(head(&graph).kind, ZcNodeKind::Conditional(ZcCondMode::Loop)));
}

#[test]
fn test_catch_covers_every_preceding_step() {
    let graph = compile("math.add(1).mul(2).error.catch(0).math.sub(1)").unwrap();
    assert_eq!(graph.spine(), vec!["math.add", "math.mul", "math.sub"]);

    let add = head(&graph);
    let mul = graph.node(add.next.unwrap()).unwrap();
    let sub = graph.node(mul.next.unwrap()).unwrap();
    assert!(add.catch_handler.is_some());
    assert_eq!(add.catch_handler, mul.catch_handler);
    assert_eq!(sub.catch_handler, None);

    let handler = graph.node(add.catch_handler.unwrap()).unwrap();
    assert!(matches!(handler.kind, ZcNodeKind::Catch));
    assert_eq!(handler.next, mul.next);
}

#[test]
fn test_earlier_catch_replaces_later_one() {
    let graph = compile("math.add(1).error.catch(0).math.mul(2).error.catch(1)").unwrap();
    let add = head(&graph);
    let mul = graph.node(add.next.unwrap()).unwrap();
    assert!(add.catch_handler.is_some());
    assert!(mul.catch_handler.is_some());
    assert_ne!(add.catch_handler, mul.catch_handler);
}

#[test]
fn test_nested_chains_compile_to_their_own_graph() {
    let graph = compile("array.map(math.add(1).mul(2))").unwrap();
    match &head(&graph).params[0] {
        ZcParam::Chain { graph: inner, source } => {
            assert_eq!(source, &None);
            assert_eq!(inner.spine(), vec!["math.add", "math.mul"]);
        }
        other => panic!("expected a chain parameter, got {other:?}"),
    }
}

#[test]
fn test_errors_inside_nested_chains_fail_the_compile() {
    assert!(compile_error("array.map(then(1))").contains("cannot start a chain"));
}

#[test]
fn test_compiled_graph_is_valid() {
    let graph = compile("loop.if(math.lt(3)).then(math.add(1)).else(0).error.catch(1).debug.noop()")
        .unwrap();
    assert!(graph.validate().is_ok());
    assert_eq!(graph.spine(), vec!["loop.if", "debug.noop"]);
}
