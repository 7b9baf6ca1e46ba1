mod common;

use common::post_catalog;
use masondb_core::{
    error::{Error, GrammarError, SchemaError},
    obs::{CollectSink, Diagnostic, with_diagnostic_sink},
    query::{
        Clause, FieldExpr, Limit, Logic, ProjectionField, QueryDescription, Rhs, SortDirection,
        SqlCompiler, WhereExpr,
    },
    value::Value,
};

fn select(query: &QueryDescription) -> Result<String, Error> {
    let catalog = post_catalog();
    let compiler = SqlCompiler::new(&catalog);

    compiler.select(query)
}

#[test]
fn default_projection_drops_virtual_fields() {
    let sql = select(&QueryDescription::new()).unwrap();

    assert!(sql.starts_with("SELECT `post`.`post_id`, `post`.`post_title`"));
    assert!(sql.ends_with("FROM `post`"));
    assert!(!sql.contains("post_word_count"));
}

#[test]
fn explicit_projection_may_name_virtual_fields() {
    let query = QueryDescription::new()
        .fields(vec![ProjectionField::plain("post_word_count")]);

    let sql = select(&query).unwrap();
    assert_eq!(sql, "SELECT `post`.`post_word_count` FROM `post`");
}

#[test]
fn plain_unknown_entries_pass_through_raw() {
    let query = QueryDescription::new().fields(vec![
        ProjectionField::plain("COUNT(1)"),
        ProjectionField::plain("post_title"),
    ]);

    let sql = select(&query).unwrap();
    assert_eq!(sql, "SELECT COUNT(1), `post`.`post_title` FROM `post`");
}

#[test]
fn aliased_expressions_validate_column_references() {
    let query = QueryDescription::new().fields(vec![ProjectionField::aliased(
        FieldExpr::column("post_title"),
        "title",
    )]);
    let sql = select(&query).unwrap();
    assert_eq!(sql, "SELECT `post`.`post_title` AS `title` FROM `post`");

    let query = QueryDescription::new().fields(vec![ProjectionField::aliased(
        FieldExpr::column("missing"),
        "title",
    )]);
    assert!(matches!(
        select(&query),
        Err(Error::Schema(SchemaError::UnknownField { field, .. })) if field == "missing"
    ));
}

#[test]
fn raw_projection_passes_through() {
    let query = QueryDescription::new().raw_fields("1 AS one");

    let sql = select(&query).unwrap();
    assert_eq!(sql, "SELECT 1 AS one FROM `post`");
}

#[test]
fn group_logic_defaults_to_and_and_honors_or() {
    let entries = || {
        vec![
            ("post_views", Rhs::value(1)),
            ("post_public", Rhs::value(true)),
        ]
    };

    let sql = select(&QueryDescription::new().filter(WhereExpr::group(entries()))).unwrap();
    assert!(sql.ends_with(
        "WHERE (`post`.`post_views` = 1 AND `post`.`post_public` = 1)"
    ));

    let sql = select(
        &QueryDescription::new().filter(WhereExpr::group(entries()).with_logic(Logic::Or)),
    )
    .unwrap();
    assert!(sql.ends_with(
        "WHERE (`post`.`post_views` = 1 OR `post`.`post_public` = 1)"
    ));
}

#[test]
fn expression_lists_nest_and_parenthesize() {
    let expr = WhereExpr::any(vec![
        WhereExpr::group(vec![
            ("post_views", Rhs::op(">", 10)),
            ("post_public", Rhs::value(true)),
        ]),
        WhereExpr::field("post_title", Rhs::op("LIKE", "%sql%")),
    ]);

    let sql = select(&QueryDescription::new().filter(expr)).unwrap();
    assert!(sql.ends_with(
        "WHERE ((`post`.`post_views` > 10 AND `post`.`post_public` = 1) \
         OR (`post`.`post_title` LIKE '%sql%'))"
    ));
}

#[test]
fn null_comparisons_use_is() {
    let expr = WhereExpr::group(vec![
        ("post_title", Rhs::op("IS", Value::Null)),
        ("post_views", Rhs::op("IS NOT", Value::Null)),
    ]);

    let sql = select(&QueryDescription::new().filter(expr)).unwrap();
    assert!(sql.ends_with(
        "WHERE (`post`.`post_title` IS NULL AND `post`.`post_views` IS NOT NULL)"
    ));
}

#[test]
fn in_lists_parenthesize_and_empty_ones_vanish() {
    let expr = WhereExpr::field("post_views", Rhs::op("IN", Value::List(vec![
        Value::Int(1),
        Value::Int(2),
    ])));
    let sql = select(&QueryDescription::new().filter(expr)).unwrap();
    assert!(sql.ends_with("WHERE (`post`.`post_views` IN (1, 2))"));

    // An empty IN contributes nothing; the sibling condition survives.
    let sink = CollectSink::new();
    let expr = WhereExpr::group(vec![
        ("post_views", Rhs::Ops(vec![("IN".to_string(), Value::List(vec![]))])),
        ("post_public", Rhs::value(true)),
    ]);
    let sql = with_diagnostic_sink(sink.clone(), || {
        select(&QueryDescription::new().filter(expr))
    })
    .unwrap();
    assert!(sql.ends_with("WHERE (`post`.`post_public` = 1)"));
    assert_eq!(
        sink.drain(),
        vec![Diagnostic::EmptyInList {
            field: "post_views".to_string(),
        }]
    );

    // A filter reduced to nothing at all fails to parse.
    let expr = WhereExpr::field(
        "post_views",
        Rhs::Ops(vec![("IN".to_string(), Value::List(vec![]))]),
    );
    assert!(matches!(
        select(&QueryDescription::new().filter(expr)),
        Err(Error::Grammar(GrammarError::EmptyFilter))
    ));
}

#[test]
fn between_requires_two_values() {
    let expr = WhereExpr::field(
        "post_views",
        Rhs::op("BETWEEN", Value::List(vec![Value::Int(1), Value::Int(10)])),
    );
    let sql = select(&QueryDescription::new().filter(expr)).unwrap();
    assert!(sql.ends_with("WHERE (`post`.`post_views` BETWEEN 1 AND 10)"));

    let expr = WhereExpr::field(
        "post_views",
        Rhs::op("NOT BETWEEN", Value::List(vec![Value::Int(1)])),
    );
    assert!(matches!(
        select(&QueryDescription::new().filter(expr)),
        Err(Error::Grammar(GrammarError::BetweenArity { found: 1, .. }))
    ));
}

#[test]
fn unknown_operators_are_skipped_with_diagnostic() {
    let sink = CollectSink::new();
    let expr = WhereExpr::group(vec![
        ("post_views", Rhs::op("SOUNDS LIKE", "x")),
        ("post_public", Rhs::value(false)),
    ]);

    let sql = with_diagnostic_sink(sink.clone(), || {
        select(&QueryDescription::new().filter(expr))
    })
    .unwrap();

    assert!(sql.ends_with("WHERE (`post`.`post_public` = 0)"));
    assert_eq!(
        sink.drain(),
        vec![Diagnostic::UnknownOperator {
            field: "post_views".to_string(),
            operator: "SOUNDS LIKE".to_string(),
        }]
    );
}

#[test]
fn undeclared_fields_raise_schema_errors_everywhere() {
    let unknown = |result: Result<String, Error>| {
        assert!(matches!(
            result,
            Err(Error::Schema(SchemaError::UnknownField { field, .. })) if field == "missing"
        ));
    };

    unknown(select(
        &QueryDescription::new().filter(WhereExpr::field("missing", Rhs::value(1))),
    ));
    unknown(select(&QueryDescription::new().group(vec!["missing"])));
    unknown(select(
        &QueryDescription::new().order(vec![("missing", SortDirection::Asc)]),
    ));
    unknown(select(&QueryDescription::new().distinct(vec!["missing"])));
    unknown(select(&QueryDescription::new().join(vec!["missing"])));
}

#[test]
fn group_and_having_compile_after_where() {
    let query = QueryDescription::new()
        .filter(WhereExpr::field("post_public", Rhs::value(true)))
        .group(vec!["post_author_id"])
        .having(WhereExpr::field("post_views", Rhs::op(">", 100)));

    let sql = select(&query).unwrap();
    assert!(sql.ends_with(
        "WHERE (`post`.`post_public` = 1) \
         GROUP BY `post`.`post_author_id` \
         HAVING (`post`.`post_views` > 100)"
    ));
}

#[test]
fn order_and_limit_render_last() {
    let query = QueryDescription::new()
        .order(vec![
            ("post_created", SortDirection::Desc),
            ("post_id", SortDirection::Asc),
        ])
        .limit(Limit::offset(20, 10));

    let sql = select(&query).unwrap();
    assert!(sql.ends_with(
        "ORDER BY `post`.`post_created` DESC, `post`.`post_id` ASC LIMIT 20, 10"
    ));

    let query = QueryDescription::new().limit(Limit::count(5));
    assert!(select(&query).unwrap().ends_with("LIMIT 5"));
}

#[test]
fn raw_clauses_pass_through_after_keywords() {
    let mut query = QueryDescription::new().raw_filter("post_views > 5");
    query.order = Some(Clause::Raw("RAND()".to_string()));
    query.limit = Some(Clause::Raw("1, 2".to_string()));

    let sql = select(&query).unwrap();
    assert!(sql.ends_with("WHERE post_views > 5 ORDER BY RAND() LIMIT 1, 2"));
}

#[test]
fn distinct_replaces_the_projection() {
    let query = QueryDescription::new().distinct(vec!["post_author_id"]);

    let sql = select(&query).unwrap();
    assert_eq!(
        sql,
        "SELECT DISTINCT `post`.`post_author_id` FROM `post`"
    );
}

#[test]
fn join_synthesis_projects_remote_and_label_fields() {
    let query = QueryDescription::new().join(vec!["post_author_id"]);
    let sql = select(&query).unwrap();

    assert!(sql.contains(
        "LEFT JOIN `users` AS `post_author_id_users` \
         ON `post_author_id_users`.`id`=`post`.`post_author_id`"
    ));
    assert!(sql.contains(
        "`post_author_id_users`.`email` AS `post_author_id_email`"
    ));
    assert!(sql.contains(
        "`post_author_id_users`.`name` AS `post_author_id_name`"
    ));
}

#[test]
fn join_requests_on_plain_fields_contribute_nothing() {
    let query = QueryDescription::new().join(vec!["post_title"]);

    let sql = select(&query).unwrap();
    assert!(!sql.contains("JOIN"));
}

#[test]
fn column_references_compare_identifiers_not_literals() {
    let expr = WhereExpr::field(
        "post_views",
        Rhs::Value(Value::Column("post_word_count".to_string())),
    );

    let sql = select(&QueryDescription::new().filter(expr)).unwrap();
    assert!(sql.ends_with(
        "WHERE (`post`.`post_views` = `post`.`post_word_count`)"
    ));
}

#[test]
fn raw_values_become_bare_fragments() {
    let expr = WhereExpr::field(
        "post_views",
        Rhs::Value(Value::Raw("post_views > post_id".to_string())),
    );

    let sql = select(&QueryDescription::new().filter(expr)).unwrap();
    assert!(sql.ends_with("WHERE (post_views > post_id)"));
}

#[test]
fn text_literals_are_escaped() {
    let expr = WhereExpr::field("post_title", Rhs::value("O'Brien\\x"));

    let sql = select(&QueryDescription::new().filter(expr)).unwrap();
    assert!(sql.ends_with("WHERE (`post`.`post_title` = 'O\\'Brien\\\\x')"));
}

#[test]
fn declared_fields_never_raise_schema_errors() {
    // Every clause referencing only declared fields compiles.
    let query = QueryDescription::new()
        .fields(vec![
            ProjectionField::plain("post_id"),
            ProjectionField::aliased(FieldExpr::column("post_title"), "title"),
        ])
        .join(vec!["post_author_id"])
        .filter(WhereExpr::group(vec![
            ("post_views", Rhs::op(">=", 0)),
            ("post_public", Rhs::value(true)),
        ]))
        .group(vec!["post_author_id"])
        .having(WhereExpr::field("post_views", Rhs::op("<", 1_000_000)))
        .order(vec![("post_created", SortDirection::Desc)])
        .limit(Limit::count(50));

    assert!(select(&query).is_ok());
}
