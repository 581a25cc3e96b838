//! End-to-end scenarios: build, render, parse and reject
//!
//! Run with: cargo test -p entity-query --test query_scenarios

use entity_query::{
    and, annotation, not, or, parse, parse_with_config, serialize, CompareOp, Condition, Expr,
    Field, LikePolicy, ParserConfig, QueryConfig, QueryError, QueryRenderer, JsonRenderer,
    CanonicalRenderer, EXPIRES_AT, OWNER,
};
use test_case::test_case;

fn eq(name: &str, value: i64) -> Expr {
    Expr::compare(Field::resolve(name).unwrap(), CompareOp::Eq, value).unwrap()
}

// ============================================================================
// Builder -> text -> tree
// ============================================================================

#[test]
fn simple_and_round_trips() {
    let age = annotation("age").unwrap();
    let status = annotation("status").unwrap();
    let built = age.gt(30).unwrap().and(status.eq("active").unwrap());

    let text = built.to_query_string();
    assert_eq!(text, "age > 30 AND status = 'active'");
    assert_eq!(parse(&text).unwrap(), built.into_expr());
}

#[test]
fn not_over_nested_group_round_trips() {
    let built = not(and([
        annotation("a").unwrap().eq(1).unwrap(),
        or([
            annotation("b").unwrap().eq(2).unwrap(),
            annotation("c").unwrap().eq(3).unwrap(),
        ])
        .unwrap(),
    ])
    .unwrap());

    let text = built.to_query_string();
    assert_eq!(text, "NOT (a = 1 AND (b = 2 OR c = 3))");
    assert_eq!(parse(&text).unwrap(), built.into_expr());
}

#[test]
fn escaping_round_trips() {
    let built = annotation("name").unwrap().eq("O'Brien").unwrap();
    assert_eq!(built.to_query_string(), "name = 'O''Brien'");

    let parsed = parse("name = 'O''Brien'").unwrap();
    let Expr::Comparison(cmp) = &parsed else {
        panic!("expected comparison");
    };
    assert_eq!(cmp.value().as_str(), Some("O'Brien"));
}

// ============================================================================
// Precedence
// ============================================================================

#[test]
fn or_under_and_is_parenthesised() {
    let expr = Expr::and(Expr::or(eq("a", 1), eq("b", 2)), eq("c", 3));
    assert_eq!(serialize(&expr), "(a = 1 OR b = 2) AND c = 3");
}

#[test]
fn and_under_or_is_not_parenthesised() {
    let expr = Expr::or(Expr::and(eq("a", 1), eq("b", 2)), eq("c", 3));
    assert_eq!(serialize(&expr), "a = 1 AND b = 2 OR c = 3");
}

#[test]
fn and_or_share_one_precedence_level() {
    // SQL would group this as a = 1 OR (b = 2 AND c = 3)
    let parsed = parse("a = 1 OR b = 2 AND c = 3").unwrap();
    assert_eq!(
        parsed,
        Expr::and(Expr::or(eq("a", 1), eq("b", 2)), eq("c", 3))
    );
    assert_eq!(serialize(&parsed), "(a = 1 OR b = 2) AND c = 3");
}

#[test_case("a = 1" ; "single comparison")]
#[test_case("a = 1 AND b = 2 AND c = 3" ; "and chain")]
#[test_case("a = 1 OR b = 2 OR c = 3" ; "or chain")]
#[test_case("(a = 1 OR b = 2) AND c = 3" ; "or group under and")]
#[test_case("a = 1 AND b = 2 OR c = 3" ; "and then or")]
#[test_case("a = 1 OR (b = 2 AND c = 3)" ; "and group on the right")]
#[test_case("NOT (a = 1) AND NOT (b IS NULL)" ; "negations")]
#[test_case("$owner = '0xabc' AND $expires_at <= -1" ; "system fields")]
#[test_case("name LIKE 'Al%' OR name = ''''" ; "like and quote")]
fn canonical_text_is_stable(text: &str) {
    let parsed = parse(text).unwrap();
    assert_eq!(serialize(&parsed), text);
}

#[test_case("a=1 and b=2", "a = 1 AND b = 2" ; "spacing and case")]
#[test_case("((a = 1))", "a = 1" ; "redundant parentheses")]
#[test_case("NOT a = 1", "NOT (a = 1)" ; "bare not")]
#[test_case("a = +5", "a = 5" ; "explicit plus sign")]
#[test_case("a is not null or b IS NULL", "a IS NOT NULL OR b IS NULL" ; "null checks")]
fn text_is_normalised(input: &str, canonical: &str) {
    assert_eq!(serialize(&parse(input).unwrap()), canonical);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn unknown_system_field() {
    assert_eq!(
        parse("$bogus = 1").unwrap_err(),
        QueryError::UnknownSystemField("$bogus".to_string())
    );
}

#[test]
fn unterminated_string_reports_end_of_input() {
    let input = "name = 'Al";
    let err = parse(input).unwrap_err();
    assert!(err.is_syntax());
    assert_eq!(err.position(), Some(input.len()));
}

#[test_case("a = 1 AND" ; "dangling junction")]
#[test_case("(a = 1" ; "missing close")]
#[test_case("a = 1)" ; "extra close")]
#[test_case("a 1" ; "missing operator")]
#[test_case("= 1" ; "missing field")]
#[test_case("a = b" ; "field as value")]
#[test_case("a IS NOT 1" ; "is not without null")]
#[test_case("a = 1 b = 2" ; "missing junction")]
fn syntax_errors(input: &str) {
    assert!(parse(input).unwrap_err().is_syntax(), "{}", input);
}

#[test_case("$signature = 'x'" ; "bytes equality")]
#[test_case("$data_hash > 'x'" ; "bytes ordering")]
#[test_case("$version LIKE '1%'" ; "like on integer")]
#[test_case("$created_at = 'yesterday'" ; "string on integer")]
#[test_case("$owner = 42" ; "integer on address")]
#[test_case("tag LIKE 7" ; "numeric pattern")]
fn type_mismatches(input: &str) {
    assert!(
        matches!(parse(input), Err(QueryError::TypeMismatch(_))),
        "{}",
        input
    );
}

#[test]
fn builder_rejects_what_the_parser_rejects() {
    assert!(matches!(
        EXPIRES_AT.like("1%"),
        Err(QueryError::TypeMismatch(_))
    ));
    assert!(matches!(OWNER.eq(42), Err(QueryError::TypeMismatch(_))));
    assert!(matches!(
        and(Vec::<Condition>::new()),
        Err(QueryError::InvalidInput(_))
    ));
}

// ============================================================================
// LIKE policy and configuration
// ============================================================================

#[test]
fn interior_wildcards_parse_by_default() {
    let parsed = parse("name LIKE 'A%l%'").unwrap();
    assert_eq!(serialize(&parsed), "name LIKE 'A%l%'");
}

#[test]
fn prefix_only_policy_rejects_interior_wildcards() {
    let config = QueryConfig::from_toml_str("[parser]\nlike_policy = \"prefix_only\"\n").unwrap();

    assert!(parse_with_config("name LIKE 'Al%'", &config.parser).is_ok());
    let err = parse_with_config("name LIKE 'A%l%'", &config.parser).unwrap_err();
    assert!(err.is_syntax());
    assert_eq!(err.position(), Some(10));
}

#[test]
fn nesting_limit_is_configurable() {
    let input = "((((a = 1))))";
    let shallow = ParserConfig::default().with_max_depth(2);
    assert!(parse_with_config(input, &shallow).unwrap_err().is_syntax());

    let deep = ParserConfig::default()
        .with_max_depth(4)
        .with_like_policy(LikePolicy::Permissive);
    assert_eq!(parse_with_config(input, &deep).unwrap(), eq("a", 1));
}

#[test]
fn nested_not_round_trips_up_to_the_default_limit() {
    let limit = ParserConfig::default().max_depth;
    let nest = |count: usize| {
        let mut condition = annotation("a").unwrap().eq(1).unwrap();
        for _ in 0..count {
            condition = not(condition);
        }
        condition
    };

    let text = nest(limit).to_query_string();
    let parsed = parse(&text).unwrap();
    assert_eq!(serialize(&parsed), text);

    let err = parse(&nest(limit + 1).to_query_string()).unwrap_err();
    assert!(err.is_syntax());
}

// ============================================================================
// Large inputs
// ============================================================================

#[test]
fn large_in_renders_and_parses_back() {
    let condition = annotation("id")
        .unwrap()
        .in_((0..100_000).collect::<Vec<i64>>())
        .unwrap();

    let text = condition.to_query_string();
    assert!(text.starts_with("id = 0 OR id = 1 OR "));
    assert!(text.ends_with(" OR id = 99999"));
    assert_eq!(text.matches(" OR ").count(), 99_999);

    let parsed = parse(&text).unwrap();
    assert_eq!(parsed.depth(), 100_000);
    drop(parsed);
    drop(condition);
}

#[test]
fn long_flat_or_parses_and_drops() {
    let text = vec!["a = 1"; 100_000].join(" OR ");
    let parsed = parse(&text).unwrap();
    assert_eq!(serialize(&parsed), text);
    drop(parsed);
}

// ============================================================================
// Renderers
// ============================================================================

#[test]
fn renderers_agree_on_the_tree() {
    let expr = parse("$owner = '0x1' AND (tier >= 2 OR tier IS NULL)").unwrap();

    let text = CanonicalRenderer.render(&expr).unwrap();
    assert_eq!(parse(&text).unwrap(), expr);

    let json = JsonRenderer::default().render(&expr).unwrap();
    let decoded: Expr = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, expr);
}
