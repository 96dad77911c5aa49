// tests/evaluation_tests.rs

use pointer_filter::ast::{Object, OperatorFamily};
use pointer_filter::{Clause, Filter, Literal, Operator, Pattern, Range, parse};
use serde_json::{Value, json};

fn matches(query: &str, record: Value) -> bool {
    parse(query).unwrap().matches(&record)
}

// ============================================================================
// End-to-end
// ============================================================================

#[test]
fn test_simple_equality() {
    let filter = parse("/foo eq 42").unwrap();
    assert_eq!(filter.len(), 1);
    assert!(filter.matches(&json!({"foo": 42})));
    assert!(!filter.matches(&json!({"foo": 24})));
    assert_eq!(filter.to_query_string(false), "/foo eq 42");
}

#[test]
fn test_range_and_pattern() {
    let filter = parse(r#"/foo between 0,42 and /bar like "ba_*""#).unwrap();
    assert!(filter.matches(&json!({"foo": 10, "bar": "ba2z"})));
    assert!(!filter.matches(&json!({"foo": 100, "bar": "ba2z"})));
    assert!(!filter.matches(&json!({"foo": 10, "bar": "b"})));
}

#[test]
fn test_grouped_disjunction() {
    let filter = parse(r#"(/a eq 1 or /a eq 2) and /b neq "x""#).unwrap();
    assert!(filter.matches(&json!({"a": 1, "b": "y"})));
    assert!(filter.matches(&json!({"a": 2})));
    assert!(!filter.matches(&json!({"a": 3, "b": "y"})));
    assert!(!filter.matches(&json!({"a": 1, "b": "x"})));
}

#[test]
fn test_membership() {
    let filter = parse(r#"/tag in [1,"two",false]"#).unwrap();
    assert!(filter.matches(&json!({"tag": "two"})));
    assert!(filter.matches(&json!({"tag": 1.0})));
    assert!(filter.matches(&json!({"tag": false})));
    assert!(!filter.matches(&json!({"tag": "three"})));
    assert!(!filter.matches(&json!({"tag": "TWO"})));
    assert!(!filter.matches(&json!({})));
}

#[test]
fn test_empty_membership() {
    assert!(!matches("/tag in []", json!({"tag": 1})));
    assert!(matches("/tag nin []", json!({"tag": 1})));
}

// ============================================================================
// Conjunction folding
// ============================================================================

#[test]
fn test_left_to_right_without_precedence() {
    // (false or true) and false
    let query = "/a eq 0 or /a eq 1 and /b eq 1";
    assert!(!matches(query, json!({"a": 1, "b": 0})));
    // (true or ...) and true
    assert!(matches(query, json!({"a": 0, "b": 1})));

    // (true and false) or true
    let query = "/a eq 1 and /b eq 1 or /c eq 1";
    assert!(matches(query, json!({"a": 1, "b": 0, "c": 1})));
}

#[test]
fn test_nested_groups() {
    let query = "/a eq 1 and (/b eq 1 or (/c eq 1 and /d eq 1))";
    assert!(matches(query, json!({"a": 1, "b": 1})));
    assert!(matches(query, json!({"a": 1, "c": 1, "d": 1})));
    assert!(!matches(query, json!({"a": 1, "c": 1})));
    assert!(!matches(query, json!({"a": 0, "b": 1})));
}

// ============================================================================
// Absent values
// ============================================================================

fn object_for(family: OperatorFamily) -> Object {
    match family {
        OperatorFamily::Comparison => Object::Operand(Literal::from(1).into()),
        OperatorFamily::Membership => Object::Array(vec![Literal::from(1), Literal::Nil]),
        OperatorFamily::Range => Object::Range(Range::new(None::<i64>, None::<i64>)),
        OperatorFamily::Pattern => Object::Pattern(Pattern::from("*")),
    }
}

#[test]
fn test_absent_symmetry() {
    let records = [json!({}), json!({"other": 1}), json!({"missing": {"deeper": 1}})];

    for op in Operator::ALL {
        let clause = Clause::from_target("/missing/value")
            .unwrap()
            .with_operator(op)
            .unwrap()
            .bind(object_for(op.family()))
            .unwrap();

        for record in &records {
            assert_eq!(
                clause.evaluate(record).unwrap(),
                op.is_negated(),
                "Failed for operator {} on {}",
                op,
                record
            );
        }
    }
}

#[test]
fn test_absent_is_not_null() {
    assert!(matches("/x eq nil", json!({"x": null})));
    assert!(!matches("/x eq nil", json!({})));
    assert!(matches("/x neq nil", json!({})));
    assert!(!matches("/x neq nil", json!({"x": null})));
}

#[test]
fn test_absent_object_target() {
    assert!(!matches("/a eq /b", json!({"a": 1})));
    assert!(matches("/a neq /b", json!({"a": 1})));
    assert!(!matches("/a eq /b", json!({})));
}

// ============================================================================
// Comparison semantics
// ============================================================================

#[test]
fn test_target_against_target() {
    assert!(matches("/a lt /b", json!({"a": 1, "b": 2})));
    assert!(!matches("/a lt /b", json!({"a": 2, "b": 2})));
    assert!(matches("/a lte /b", json!({"a": 2, "b": 2})));
    assert!(matches("/a eq /b", json!({"a": {"x": [1, 2]}, "b": {"x": [1.0, 2]}})));
}

#[test]
fn test_literal_subject() {
    assert!(matches("42 gt /limit", json!({"limit": 10})));
    assert!(!matches("42 gt /limit", json!({"limit": 50})));
    assert!(matches(r#""abc" eq "abc""#, json!({})));
}

#[test]
fn test_numeric_equality_across_representations() {
    assert!(matches("/n eq 1", json!({"n": 1.0})));
    assert!(matches("/n eq 1e2", json!({"n": 100})));
    assert!(matches("/n gt 0.1", json!({"n": 0.2})));
    assert!(!matches("/n eq 1", json!({"n": "1"})));
}

#[test]
fn test_ordering_within_one_type() {
    assert!(matches(r#"/s gt "apple""#, json!({"s": "banana"})));
    assert!(matches("/b gt false", json!({"b": true})));

    // Values of different types are neither ordered nor equal
    assert!(!matches(r#"/n lt "5""#, json!({"n": 1})));
    assert!(!matches(r#"/n gte "5""#, json!({"n": 1})));
    assert!(matches(r#"/n neq "5""#, json!({"n": 5})));
    assert!(!matches("/n gt 1", json!({"n": [2]})));
}

#[test]
fn test_nested_pointers() {
    let record = json!({"items": [{"name": "a"}, {"name": "b"}], "a/b": {"c~d": 7}});
    assert!(matches(r#"/items/1/name eq "b""#, record.clone()));
    assert!(!matches(r#"/items/2/name eq "b""#, record.clone()));
    assert!(matches("/a~1b/c~0d eq 7", record));
}

// ============================================================================
// Ranges and patterns
// ============================================================================

#[test]
fn test_between_bounds() {
    assert!(matches("/n between 1,3", json!({"n": 1})));
    assert!(matches("/n between 1,3", json!({"n": 3})));
    assert!(!matches("/n between 1,3", json!({"n": 3.5})));
    assert!(matches("/n nbetween 1,3", json!({"n": 4})));

    assert!(matches("/n between 10,nil", json!({"n": 1000})));
    assert!(!matches("/n between nil,10", json!({"n": 11})));

    assert!(matches(r#"/s between "b","d""#, json!({"s": "c"})));
    assert!(!matches(r#"/s between "b","d""#, json!({"s": 2})));
    assert!(matches(r#"/s nbetween "b","d""#, json!({"s": true})));
}

#[test]
fn test_inverted_range_matches_normalized() {
    assert!(matches("/n between 42,-42", json!({"n": 0})));
    assert!(matches("/n between 42,-42", json!({"n": -42})));
}

#[test]
fn test_like_patterns() {
    assert!(matches(r#"/path like "foo*bar""#, json!({"path": "foo/bar"})));
    assert!(!matches(r#"/path like "foo*bar""#, json!({"path": "oof/rab"})));
    assert!(matches(r#"/name like "AL*""#, json!({"name": "alice"})));
    assert!(matches(r#"/name like "a_c""#, json!({"name": "a\nc"})));
    assert!(!matches(r#"/name like "a_c""#, json!({"name": "abbc"})));
    assert!(!matches(r#"/n like "1*""#, json!({"n": 10})));
    assert!(matches(r#"/n nlike "1*""#, json!({"n": 10})));
}

#[test]
fn test_like_escapes() {
    assert!(matches(r#"/s like "100\\%\\_""#, json!({"s": "100%_"})));
    assert!(!matches(r#"/s like "100\\%\\_""#, json!({"s": "100%x"})));
    assert!(matches(r#"/s like "a\\*""#, json!({"s": "a*"})));
    assert!(!matches(r#"/s like "a\\*""#, json!({"s": "ab"})));
    assert!(matches(r#"/s like "(x)+""#, json!({"s": "(x)+"})));
}

// ============================================================================
// Record types
// ============================================================================

#[test]
fn test_map_record() {
    let map = json!({"user": {"age": 30}, "active": true})
        .as_object()
        .cloned()
        .unwrap();
    let filter = parse("/user/age gte 18 and /active eq true").unwrap();
    assert!(filter.matches(&map));
    assert!(!parse("/user/name eq nil").unwrap().matches(&map));
}

#[test]
fn test_built_filter_matches_like_parsed() {
    let built = Filter::from_clause(Clause::from_target("/a").unwrap().eq().unwrap().literal(1).unwrap())
        .unwrap()
        .or(Clause::from_target("/a").unwrap().eq().unwrap().literal(2).unwrap())
        .unwrap();
    let filter = Filter::from_group(built).and(
        Clause::from_target("/b").unwrap().neq().unwrap().literal("x").unwrap(),
    );
    let filter = filter.unwrap();

    let parsed = parse(r#"(/a eq 1 or /a eq 2) and /b neq "x""#).unwrap();
    assert_eq!(filter, parsed);

    for record in [json!({"a": 1, "b": "y"}), json!({"a": 3}), json!({"a": 2, "b": "x"})] {
        assert_eq!(filter.matches(&record), parsed.matches(&record));
    }
}

#[test]
fn test_incomplete_clause_matches_nothing() {
    let clause = Clause::from_target("/a").unwrap().eq().unwrap();
    assert!(matches!(clause.evaluate(&json!({"a": 1})), Ok(false)));
    assert!(!clause.matches(&json!({"a": 1})));
}
