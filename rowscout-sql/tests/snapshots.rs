//! Full statement snapshots for representative query builder requests.

use insta::assert_snapshot;
use rowscout_sql::{QueryRequest, compile};

fn compile_json(body: &str) -> String {
    compile(&QueryRequest::parse(body).unwrap()).unwrap()
}

#[test]
fn snapshot_text_filters() {
    let sql = compile_json(
        r#"{"table": "customers", "query": {"combinator": "and", "rules": [
            {"field": "city", "operator": "=", "value": "São Paulo"},
            {"field": "name", "operator": "!=", "value": "O'Neil"},
            {"field": "email", "operator": "endsWith", "value": ".br"}
        ]}}"#,
    );
    assert_snapshot!(sql, @r#"SELECT main.* FROM "customers" AS main WHERE unaccent(lower(CAST(main."city" AS TEXT))) = unaccent(lower('São Paulo')) AND unaccent(lower(CAST(main."name" AS TEXT))) != unaccent(lower('O''Neil')) AND unaccent(lower(CAST(main."email" AS TEXT))) LIKE unaccent(lower('%.br'))"#);
}

#[test]
fn snapshot_mixed_in_list() {
    let sql = compile_json(
        r#"{"table": "products", "query": {"rules": [
            {"field": "sku", "operator": "in", "value": [10, "A-7", null]}
        ]}}"#,
    );
    assert_snapshot!(sql, @r#"SELECT main.* FROM "products" AS main WHERE unaccent(lower(CAST(main."sku" AS TEXT))) IN (10, unaccent(lower('A-7')), NULL)"#);
}

#[test]
fn snapshot_ordering_on_text() {
    let sql = compile_json(
        r#"{"table": "events", "query": {"rules": [
            {"field": "starts_at", "operator": ">=", "value": "2024-01-01"},
            {"field": "priority", "operator": "<", "value": 3}
        ]}}"#,
    );
    assert_snapshot!(sql, @r#"SELECT main.* FROM "events" AS main WHERE main."starts_at" >= '2024-01-01' AND main."priority" < 3"#);
}

#[test]
fn snapshot_joins_and_projection() {
    let sql = compile_json(
        r#"{
            "table": "users",
            "joins": [
                {"type": "inner", "targetTable": "orders", "sourceColumn": "id", "targetColumn": "user_id"},
                {"type": "RIGHT", "targetTable": "profiles", "sourceColumn": "id", "targetColumn": "user_id"}
            ],
            "selectedColumns": [
                {"table": "users", "column": "email", "alias": "Email"},
                {"table": "profiles", "column": "country"}
            ],
            "query": {"combinator": "or", "rules": [
                {"field": "profiles.country", "operator": "beginsWith", "value": "Es"},
                {"combinator": "and", "rules": [
                    {"field": "orders.total", "operator": ">", "value": "99.90"},
                    {"field": "orders.shipped_at", "operator": "notNull"}
                ]}
            ]}
        }"#,
    );
    assert_snapshot!(sql, @r#"SELECT main."email" AS "Email", j1."country" AS "country" FROM "users" AS main INNER JOIN "orders" AS j0 ON main."id" = j0."user_id" RIGHT JOIN "profiles" AS j1 ON main."id" = j1."user_id" WHERE unaccent(lower(CAST(j1."country" AS TEXT))) LIKE unaccent(lower('Es%')) OR (j0."total" > 99.9 AND j0."shipped_at" IS NOT NULL)"#);
}

#[test]
fn snapshot_booleans_and_nulls() {
    let sql = compile_json(
        r#"{"table": "flags", "query": {"rules": [
            {"field": "enabled", "operator": "=", "value": true},
            {"field": "owner", "operator": "=", "value": null},
            {"field": "weight", "operator": ">", "value": null}
        ]}}"#,
    );
    assert_snapshot!(sql, @r#"SELECT main.* FROM "flags" AS main WHERE unaccent(lower(CAST(main."enabled" AS TEXT))) = 'true' AND unaccent(lower(CAST(main."owner" AS TEXT))) = NULL AND main."weight" > 'null'"#);
}
