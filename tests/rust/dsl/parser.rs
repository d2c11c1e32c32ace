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

use zichain::dsl::{ZcArgument, ZcDescriptorProgram, ZcParser, ZcParserConfig};
use zichain::{ZcError, ZcRegistry, ZcValue};

fn parse(script: &str) -> Result<ZcDescriptorProgram, ZcError> {
    let registry = ZcRegistry::with_defaults();
    let parser = ZcParser::new(&registry);
    parser.parse(script)
}

fn names(program: &ZcDescriptorProgram) -> Vec<String> {
    program.descriptors.iter().map(|d| d.to_string()).collect()
}

#[test]
fn test_explicit_domain_switches_current_domain() {
    let program = parse("array.sort().first().string.upper().trim()").unwrap();
    assert_eq!(
        names(&program),
        vec!["array.sort", "array.first", "string.upper", "string.trim"]
    );
}

#[test]
fn test_method_segment_is_resolved() {
    let program = parse("array.sort.desc().json.stringify.pretty()").unwrap();
    assert_eq!(program.descriptors[0].method.as_deref(), Some("desc"));
    assert_eq!(names(&program), vec!["array.sort.desc", "json.stringify.pretty"]);
}

#[test]
fn test_bare_flow_continuations_take_the_current_domain() {
    let program = parse("loop.if(math.lt(3)).then(math.add(1)).else(0)").unwrap();
    assert_eq!(names(&program), vec!["loop.if", "loop.then", "loop.else"]);
}

#[test]
fn test_bare_catch_resolves_to_its_only_provider() {
    let program = parse("math.div(0).catch(0)").unwrap();
    assert_eq!(names(&program), vec!["math.div", "error.catch"]);
}

#[test]
fn test_unknown_action_reports_token_and_offset() {
    let err = parse("array.sort().explode()").unwrap_err();
    match err {
        ZcError::Parse { token, position, .. } => {
            assert_eq!(token.as_deref(), Some("explode"));
            assert_eq!(position, 13);
        }
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[test]
fn test_unknown_action_in_known_domain() {
    let err = parse("math.pow(2)").unwrap_err();
    assert!(matches!(err, ZcError::Parse { .. }));
    assert!(err.message().contains("math.pow"));
}

#[test]
fn test_empty_script_is_a_parse_error() {
    assert!(matches!(parse("   "), Err(ZcError::Parse { .. })));
}

#[test]
fn test_malformed_argument_list() {
    assert!(matches!(parse("math.add(1 2)"), Err(ZcError::Parse { .. })));
    assert!(matches!(parse("math.add(1,"), Err(ZcError::Parse { .. })));
}

#[test]
fn test_invalid_pattern_literal() {
    let err = parse("string.match(/(a/)").unwrap_err();
    assert!(matches!(err, ZcError::Parse { .. }));
}

#[test]
fn test_number_literal_must_be_finite() {
    let err = parse("math.add(1e400)").unwrap_err();
    assert!(matches!(err, ZcError::Parse { position: 9, .. }));
    assert!(err.message().contains("out of range"));
}

#[test]
fn test_container_literals_fold_to_values() {
    let program = parse("record.merge({a: 1, 'b': [true, null, 'x']})").unwrap();
    let expected = ZcValue::from(serde_json::json!({"a": 1, "b": [true, null, "x"]}));
    assert_eq!(program.descriptors[0].params, vec![ZcArgument::Literal(expected)]);
}

#[test]
fn test_parameter_references_stay_templates() {
    let program = parse("loop.range(0, 2, i => record.merge({n: i}))").unwrap();
    let lambda = match &program.descriptors[0].params[2] {
        ZcArgument::Lambda(lambda) => lambda,
        other => panic!("expected a lambda, got {other:?}"),
    };
    assert_eq!(lambda.params, vec!["i".to_string()]);
    match lambda.body.as_ref() {
        ZcArgument::Chain(chain) => match &chain.descriptors[0].params[0] {
            ZcArgument::Map(entries) => {
                assert_eq!(entries[0], ("n".to_string(), ZcArgument::Param("i".into())))
            }
            other => panic!("expected a record template, got {other:?}"),
        },
        other => panic!("expected a chain body, got {other:?}"),
    }
}

#[test]
fn test_parameter_fed_chain() {
    let program = parse("error.catch((b, e) => e.record.get('message'))").unwrap();
    let lambda = match &program.descriptors[0].params[0] {
        ZcArgument::Lambda(lambda) => lambda,
        other => panic!("expected a lambda, got {other:?}"),
    };
    assert_eq!(lambda.params, vec!["b".to_string(), "e".to_string()]);
    match lambda.body.as_ref() {
        ZcArgument::Chain(chain) => assert_eq!(chain.source.as_deref(), Some("e")),
        other => panic!("expected a chain body, got {other:?}"),
    }
}

#[test]
fn test_unbound_identifier_outside_lambda() {
    let err = parse("array.map(item)").unwrap_err();
    assert!(err.message().contains("unresolved identifier"));
}

#[cfg(feature = "os")]
#[test]
fn test_open_domain_accepts_any_action() {
    let program = parse("os.git.status('--short')").unwrap();
    let call = &program.descriptors[0];
    assert_eq!(call.domain.as_deref(), Some("os"));
    assert_eq!(call.action, "git");
    assert_eq!(call.method.as_deref(), Some("status"));
}

#[test]
fn test_nesting_depth_is_bounded() {
    let registry = ZcRegistry::with_defaults();
    let parser = ZcParser::new(&registry).with_config(ZcParserConfig {
        max_depth: 3,
        ..ZcParserConfig::default()
    });
    assert!(parser.parse("array.map(x => array.map(y => y))").is_ok());
    let err = parser
        .parse("array.map(x => array.map(y => array.map(z => z)))")
        .unwrap_err();
    assert!(err.message().contains("nesting"));
}

#[test]
fn test_program_dumps_as_json() {
    let program = parse("math.add(1).mul(2)").unwrap();
    let json = program.to_json().unwrap();
    assert!(json.contains("\"action\": \"mul\""));
    assert_eq!(ZcDescriptorProgram::from_json(&json).unwrap(), program);
}
