use super::*;
use crate::error::BoardError;
use crate::mapping::ColumnMap;
use crate::value::{ScalarValue, UpdatePayload};

const JOBS: ColumnMap = ColumnMap::new(&["title", "salary", "equity"], &[]);
const COMPANIES: ColumnMap = ColumnMap::new(
    &["name", "description", "numEmployees", "logoUrl"],
    &[("numEmployees", "num_employees"), ("logoUrl", "logo_url")],
);

// ==================== set_clause ====================

#[test]
fn set_clause_one_term_per_key_in_order() {
    let mut payload = UpdatePayload::new();
    payload
        .set("title", "Baker")
        .set("salary", 52000_i64)
        .set("equity", ScalarValue::Numeric("0.1".parse().unwrap()));

    let clause = set_clause(&payload, &JOBS).unwrap();
    assert_eq!(
        clause.render(1),
        r#""title" = $1, "salary" = $2, "equity" = $3"#
    );
    assert_eq!(clause.param_count(), payload.len());
    assert_eq!(
        clause.params(),
        &[
            ScalarValue::Text("Baker".into()),
            ScalarValue::Int(52000),
            ScalarValue::Numeric("0.1".parse().unwrap()),
        ]
    );
}

#[test]
fn set_clause_respects_start_index() {
    let mut payload = UpdatePayload::new();
    payload.set("title", "x").set("salary", 1_i64);

    let clause = set_clause(&payload, &JOBS).unwrap();
    assert_eq!(clause.render(3), r#""title" = $3, "salary" = $4"#);
}

#[test]
fn set_clause_uses_alias_table() {
    let mut payload = UpdatePayload::new();
    payload.set("numEmployees", 12_i64);

    let clause = set_clause(&payload, &COMPANIES).unwrap();
    assert_eq!(clause.render(1), r#""num_employees" = $1"#);
}

#[test]
fn set_clause_empty_payload_fails() {
    let err = set_clause(&UpdatePayload::new(), &JOBS).unwrap_err();
    assert!(matches!(err, BoardError::EmptyPayload));
}

#[test]
fn set_clause_rejects_disallowed_field_regardless_of_size() {
    // Single disallowed key.
    let mut payload = UpdatePayload::new();
    payload.set("id", 99_i64);
    assert!(matches!(
        set_clause(&payload, &JOBS).unwrap_err(),
        BoardError::ColumnNotAllowed { field } if field == "id"
    ));

    // Same key buried in an otherwise valid payload.
    let mut payload = UpdatePayload::new();
    payload.set("title", "x").set("companyHandle", "c9");
    assert!(matches!(
        set_clause(&payload, &JOBS).unwrap_err(),
        BoardError::ColumnNotAllowed { field } if field == "companyHandle"
    ));
}

#[test]
fn set_clause_never_assigns_a_column_twice() {
    // Postgres rejects multiple assignments to one column (42601), so a
    // payload with a repeated key must come through as a single term.
    let payload: UpdatePayload =
        serde_json::from_str(r#"{"title": "a", "title": "b"}"#).unwrap();
    let clause = set_clause(&payload, &JOBS).unwrap();
    assert_eq!(clause.render(1), r#""title" = $1"#);
    assert_eq!(clause.params(), &[ScalarValue::Text("b".into())]);
}

#[test]
fn set_clause_round_trips_through_column_map() {
    let mut payload = UpdatePayload::new();
    payload.set("numEmployees", 5_i64).set("logoUrl", "https://x.test");

    let clause = set_clause(&payload, &COMPANIES).unwrap();
    let rendered = clause.render(1);

    // Every emitted column re-resolves to the original external field name.
    let mut fields = payload.iter().map(|(f, _)| f);
    for term in rendered.split(", ") {
        let column = term
            .trim_start_matches('"')
            .split('"')
            .next()
            .unwrap();
        assert_eq!(COMPANIES.field_for(column), Some(fields.next().unwrap()));
    }
}

// ==================== FilterBuilder ====================

#[test]
fn filter_contains_is_case_insensitive_substring() {
    let mut f = FilterBuilder::new(&JOBS);
    f.contains("title", Some("JOB")).unwrap();
    let clause = f.finish();
    assert_eq!(clause.render(1), r#""title" ILIKE $1"#);
    assert_eq!(clause.params(), &[ScalarValue::Text("%JOB%".into())]);
}

#[test]
fn filter_at_least_is_inclusive() {
    let mut f = FilterBuilder::new(&JOBS);
    f.at_least("salary", Some(2000)).unwrap();
    let clause = f.finish();
    assert_eq!(clause.render(1), r#""salary" >= $1"#);
    assert_eq!(clause.params(), &[ScalarValue::Int(2000)]);
}

#[test]
fn filter_positive_true_adds_constant_comparison() {
    let mut f = FilterBuilder::new(&JOBS);
    f.positive("equity", Some(true)).unwrap();
    let clause = f.finish();
    assert_eq!(clause.render(1), r#""equity" > 0"#);
    assert_eq!(clause.param_count(), 0);
}

#[test]
fn filter_false_and_absent_flags_are_equivalent() {
    // The ternary-collapses-to-binary policy: false and absent both add no
    // predicate, so the generated queries are identical.
    let mut explicit_false = FilterBuilder::new(&JOBS);
    explicit_false.positive("equity", Some(false)).unwrap();

    let mut absent = FilterBuilder::new(&JOBS);
    absent.positive("equity", None).unwrap();

    let a = explicit_false.finish();
    let b = absent.finish();
    assert!(a.is_empty() && b.is_empty());
    assert_eq!(a.render(1), b.render(1));
}

#[test]
fn filter_absent_criteria_add_nothing() {
    let mut f = FilterBuilder::new(&JOBS);
    f.contains("title", None).unwrap();
    f.at_least("salary", None).unwrap();
    f.positive("equity", None).unwrap();
    assert_eq!(f.term_count(), 0);
    assert!(f.finish().is_empty());
}

#[test]
fn filter_combines_with_and() {
    let mut f = FilterBuilder::new(&JOBS);
    f.contains("title", Some("job")).unwrap();
    f.at_least("salary", Some(1000)).unwrap();
    f.positive("equity", Some(true)).unwrap();

    let clause = f.finish();
    assert_eq!(
        clause.render(1),
        r#""title" ILIKE $1 AND "salary" >= $2 AND "equity" > 0"#
    );
    assert_eq!(
        clause.params(),
        &[
            ScalarValue::Text("%job%".into()),
            ScalarValue::Int(1000),
        ]
    );
}

#[test]
fn filter_numbering_continues_from_start() {
    let mut f = FilterBuilder::new(&JOBS);
    f.contains("title", Some("job")).unwrap();
    f.at_least("salary", Some(1)).unwrap();
    assert_eq!(
        f.finish().render(4),
        r#""title" ILIKE $4 AND "salary" >= $5"#
    );
}

#[test]
fn filter_rejects_unknown_field() {
    let mut f = FilterBuilder::new(&JOBS);
    let err = f.contains("handle", Some("c1")).unwrap_err();
    assert!(matches!(err, BoardError::ColumnNotAllowed { field } if field == "handle"));
}

#[test]
fn filter_builder_is_debuggable() {
    // Builder results show up in unwrap_err/assert messages, so the builder
    // itself must format.
    let f = FilterBuilder::new(&JOBS);
    assert!(format!("{f:?}").contains("FilterBuilder"));
}

#[test]
fn filter_at_most_for_upper_bounds() {
    let mut f = FilterBuilder::new(&COMPANIES);
    f.at_least("numEmployees", Some(10)).unwrap();
    f.at_most("numEmployees", Some(500)).unwrap();
    assert_eq!(
        f.finish().render(1),
        r#""num_employees" >= $1 AND "num_employees" <= $2"#
    );
}

// ==================== QueryAssembler ====================

#[test]
fn assembler_select_with_filter_and_order() {
    let mut f = FilterBuilder::new(&JOBS);
    f.at_least("salary", Some(2000)).unwrap();

    let mut q = QueryAssembler::new("SELECT id, title FROM jobs");
    q.filter(&f.finish());
    q.push(" ORDER BY title");

    let query = q.finish().unwrap();
    assert_eq!(
        query.sql(),
        r#"SELECT id, title FROM jobs WHERE "salary" >= $1 ORDER BY title"#
    );
    assert_eq!(query.params(), &[ScalarValue::Int(2000)]);
}

#[test]
fn assembler_omits_where_for_empty_filter() {
    let f = FilterBuilder::new(&JOBS);
    let mut q = QueryAssembler::new("SELECT id FROM jobs");
    q.filter(&f.finish());
    assert_eq!(q.finish().unwrap().sql(), "SELECT id FROM jobs");
}

#[test]
fn assembler_numbers_across_fragments() {
    let mut payload = UpdatePayload::new();
    payload.set("title", "x").set("salary", 1_i64);

    let mut q = QueryAssembler::new("UPDATE jobs SET ");
    q.append(&set_clause(&payload, &JOBS).unwrap());
    q.push(" WHERE id = ").bind(ScalarValue::Int(42));

    let query = q.finish().unwrap();
    assert_eq!(
        query.sql(),
        r#"UPDATE jobs SET "title" = $1, "salary" = $2 WHERE id = $3"#
    );
    assert_eq!(
        query.params(),
        &[
            ScalarValue::Text("x".into()),
            ScalarValue::Int(1),
            ScalarValue::Int(42),
        ]
    );
}

#[test]
fn assembler_rejects_missing_parameter() {
    let mut q = QueryAssembler::new("SELECT 1 FROM jobs");
    q.push(" WHERE id = $5");
    assert!(matches!(
        q.finish().unwrap_err(),
        BoardError::Contract(_)
    ));
}

#[test]
fn assembler_rejects_gapped_placeholders() {
    let mut q = QueryAssembler::new("SELECT 1 FROM jobs WHERE a = ");
    q.bind(ScalarValue::Int(1));
    q.push(" AND b = $3");
    let err = q.finish().unwrap_err();
    assert!(matches!(err, BoardError::Contract(_)));
}

#[test]
fn params_ref_matches_param_order() {
    let mut q = QueryAssembler::new("SELECT 1 WHERE a = ");
    q.bind(ScalarValue::Int(1));
    q.push(" AND b = ");
    q.bind(ScalarValue::Text("x".into()));
    let query = q.finish().unwrap();
    assert_eq!(query.params_ref().len(), query.params().len());
}
