// tests/builder_tests.rs

use pointer_filter::ast::{Object, Operand};
use pointer_filter::{Bound, Clause, ClauseStage, Filter, FilterError, Literal, Operator, Pattern, parse};
use serde_json::json;

// ============================================================================
// Stages
// ============================================================================

#[test]
fn test_stage_progression() {
    let clause = Clause::from_target("/x").unwrap();
    assert_eq!(clause.stage(), ClauseStage::SubjectSet);
    assert!(!clause.is_valid());

    let clause = clause.gte().unwrap();
    assert_eq!(clause.stage(), ClauseStage::OperatorSet);
    assert!(!clause.is_valid());

    let clause = clause.literal(3).unwrap();
    assert_eq!(clause.stage(), ClauseStage::Valid);
    assert!(clause.is_valid());
}

#[test]
fn test_nil_literal_clause() {
    let clause = Clause::from_target("/x")
        .unwrap()
        .eq()
        .unwrap()
        .literal(Literal::Nil)
        .unwrap();
    assert_eq!(clause.to_query_string(false).unwrap(), "/x eq nil");
    assert_eq!(clause.to_string(), "/x eq nil");

    let none: Option<i64> = None;
    let from_option = Clause::from_target("/x").unwrap().eq().unwrap().literal(none).unwrap();
    assert_eq!(from_option, clause);
}

#[test]
fn test_every_operator_selector() {
    let selectors: [(fn(Clause) -> Result<Clause, FilterError>, Operator); 12] = [
        (Clause::eq, Operator::Eq),
        (Clause::neq, Operator::Neq),
        (Clause::gt, Operator::Gt),
        (Clause::gte, Operator::Gte),
        (Clause::lt, Operator::Lt),
        (Clause::lte, Operator::Lte),
        (Clause::is_in, Operator::In),
        (Clause::nin, Operator::Nin),
        (Clause::between, Operator::Between),
        (Clause::nbetween, Operator::Nbetween),
        (Clause::like, Operator::Like),
        (Clause::nlike, Operator::Nlike),
    ];

    for (select, expected) in selectors {
        let clause = select(Clause::from_literal(1)).unwrap();
        assert_eq!(clause.operator(), Some(expected));
    }
}

// ============================================================================
// Sequence errors
// ============================================================================

#[test]
fn test_operator_selected_twice() {
    let err = Clause::from_target("/x").unwrap().eq().unwrap().neq().unwrap_err();
    assert!(matches!(
        err,
        FilterError::InvalidSequence { stage: ClauseStage::OperatorSet, .. }
    ));
}

#[test]
fn test_bind_before_operator() {
    let err = Clause::from_target("/x").unwrap().literal(1).unwrap_err();
    assert!(matches!(
        err,
        FilterError::InvalidSequence { stage: ClauseStage::SubjectSet, .. }
    ));

    let err = Clause::from_target("/x").unwrap().target("not a pointer").unwrap_err();
    assert!(matches!(err, FilterError::InvalidSequence { .. }));
}

#[test]
fn test_no_mutation_once_valid() {
    let valid = Clause::from_target("/x").unwrap().eq().unwrap().literal(1).unwrap();

    let err = valid.clone().literal(2).unwrap_err();
    assert!(matches!(err, FilterError::InvalidSequence { stage: ClauseStage::Valid, .. }));

    let err = valid.gt().unwrap_err();
    assert!(matches!(err, FilterError::InvalidSequence { stage: ClauseStage::Valid, .. }));
}

#[test]
fn test_serializing_incomplete_clause() {
    let clause = Clause::from_target("/x").unwrap().like().unwrap();
    assert!(matches!(
        clause.to_query_string(false),
        Err(FilterError::InvalidSequence { stage: ClauseStage::OperatorSet, .. })
    ));
    assert_eq!(clause.to_string(), "/x like");
}

// ============================================================================
// Binder shape checks
// ============================================================================

#[test]
fn test_wrong_binder_for_family() {
    let err = Clause::from_target("/x").unwrap().is_in().unwrap().literal(1).unwrap_err();
    assert!(matches!(
        err,
        FilterError::TypeMismatch { operator: Operator::In, found: "number", .. }
    ));

    let err = Clause::from_target("/x").unwrap().eq().unwrap().array([1, 2]).unwrap_err();
    assert!(matches!(err, FilterError::TypeMismatch { operator: Operator::Eq, found: "array", .. }));

    let err = Clause::from_target("/x").unwrap().like().unwrap().range(1, 2).unwrap_err();
    assert!(matches!(err, FilterError::TypeMismatch { found: "range", .. }));

    let err = Clause::from_target("/x").unwrap().between().unwrap().pattern("a*").unwrap_err();
    assert!(matches!(err, FilterError::TypeMismatch { found: "pattern", .. }));
}

#[test]
fn test_non_finite_floats() {
    assert_eq!(Literal::from(f64::NAN), Literal::Nil);
    assert_eq!(Literal::from_f64(f64::INFINITY), None);
    assert_eq!(Literal::from_f64(2.5), Some(Literal::from(2.5)));

    let clause = Clause::from_target("/x").unwrap().eq().unwrap().literal(f64::NAN).unwrap();
    assert_eq!(clause.to_string(), "/x eq nil");
}

#[test]
fn test_invalid_target_pointer() {
    assert!(matches!(
        Clause::from_target("x/y"),
        Err(FilterError::InvalidTarget { .. })
    ));
    assert!(matches!(
        Clause::from_target("/x").unwrap().eq().unwrap().target("/y~2"),
        Err(FilterError::InvalidTarget { .. })
    ));
}

// ============================================================================
// Binders
// ============================================================================

#[test]
fn test_target_object() {
    let clause = Clause::from_target("/a").unwrap().lt().unwrap().target("/b").unwrap();
    assert!(matches!(clause.object(), Some(Object::Operand(Operand::Target(_)))));
    assert!(clause.matches(&json!({"a": 1, "b": 2})));
}

#[test]
fn test_array_binder() {
    let clause = Clause::from_target("/tag")
        .unwrap()
        .nin()
        .unwrap()
        .array(vec![Literal::from("a"), Literal::Nil])
        .unwrap();
    assert_eq!(clause.to_query_string(false).unwrap(), r#"/tag nin ["a",nil]"#);
    assert!(clause.matches(&json!({"tag": "b"})));
    assert!(!clause.matches(&json!({"tag": null})));
}

#[test]
fn test_range_binder_normalizes() {
    let clause = Clause::from_target("/n").unwrap().between().unwrap().range(42, -42).unwrap();
    let Some(Object::Range(range)) = clause.object() else {
        panic!("Expected range");
    };
    assert_eq!(range.lower(), &Bound::from(-42));
    assert_eq!(range.upper(), &Bound::from(42));
    assert_eq!(clause.to_query_string(false).unwrap(), "/n between -42,42");
}

#[test]
fn test_open_range_binder() {
    let clause = Clause::from_target("/n")
        .unwrap()
        .between()
        .unwrap()
        .range(None::<i64>, 10)
        .unwrap();
    assert_eq!(clause.to_string(), "/n between nil,10");
    assert!(clause.matches(&json!({"n": -1000})));
}

#[test]
fn test_pattern_binder() {
    let clause = Clause::from_target("/s")
        .unwrap()
        .nlike()
        .unwrap()
        .pattern(Pattern::new("x_*"))
        .unwrap();
    assert!(clause.matches(&json!({"s": "x"})));
    assert!(!clause.matches(&json!({"s": "xyz"})));
}

// ============================================================================
// Filter assembly
// ============================================================================

#[test]
fn test_filter_rejects_incomplete_clause() {
    let partial = Clause::from_target("/x").unwrap().eq().unwrap();
    assert!(matches!(
        Filter::from_clause(partial.clone()),
        Err(FilterError::InvalidSequence { stage: ClauseStage::OperatorSet, .. })
    ));

    let filter = Filter::from_clause(Clause::from_literal(true).eq().unwrap().literal(true).unwrap()).unwrap();
    assert!(matches!(filter.clone().and(partial.clone()), Err(FilterError::InvalidSequence { .. })));
    assert!(matches!(filter.or(partial), Err(FilterError::InvalidSequence { .. })));
}

#[test]
fn test_filter_try_from_clause() {
    let clause = Clause::from_target("/a").unwrap().eq().unwrap().literal(1).unwrap();
    let filter = Filter::try_from(clause).unwrap();
    assert_eq!(filter.to_string(), "/a eq 1");
}

#[test]
fn test_filter_groups() {
    let eq = |value: i64| Clause::from_target("/a").unwrap().eq().unwrap().literal(value).unwrap();

    let group = Filter::from_clause(eq(1)).unwrap().or(eq(2)).unwrap();
    let filter = Filter::from_clause(eq(0))
        .unwrap()
        .or_group(group.clone())
        .and_group(Filter::from_group(group));

    assert_eq!(
        filter.to_string(),
        "/a eq 0 or (/a eq 1 or /a eq 2) and ((/a eq 1 or /a eq 2))"
    );
    assert_eq!(filter.clauses().len(), 5);
    assert_eq!(parse(&filter.to_string()).unwrap(), filter);
    assert!(filter.matches(&json!({"a": 2})));
    assert!(!filter.matches(&json!({"a": 3})));
}
