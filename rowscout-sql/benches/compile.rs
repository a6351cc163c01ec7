//! Benchmarks for rowscout-sql compilation.
//!
//! Run with: cargo bench -p rowscout-sql

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rowscout_sql::{
    JoinConfig, JoinType, Operator, QueryCompiler, QueryRequest, Rule, RuleGroup, RuleNode, Value,
    compile, quote_ident, quote_literal,
};
use std::hint::black_box;

// =============================================================================
// Quoting Benchmarks
// =============================================================================

fn bench_quoting(c: &mut Criterion) {
    let mut group = c.benchmark_group("quoting");

    let inputs = [
        ("plain", "customer_email"),
        ("quoted", "O'Brien \"the\" Great"),
        ("long", "a very long value with 'several' quotes 'inside' it, repeated twice"),
    ];

    for (name, s) in inputs {
        group.bench_with_input(BenchmarkId::new("ident", name), s, |b, s| {
            b.iter(|| quote_ident(black_box(s)))
        });
        group.bench_with_input(BenchmarkId::new("literal", name), s, |b, s| {
            b.iter(|| quote_literal(black_box(s)))
        });
    }

    group.finish();
}

// =============================================================================
// Compilation Benchmarks
// =============================================================================

fn flat_request(rules: usize) -> QueryRequest {
    let members = (0..rules)
        .map(|i| {
            let rule = match i % 4 {
                0 => Rule::new(format!("col{i}"), Operator::Contains, "needle"),
                1 => Rule::new(format!("col{i}"), Operator::Eq, i64::try_from(i).unwrap_or(0)),
                2 => Rule::new(format!("col{i}"), Operator::In, vec!["a", "b", "c"]),
                _ => Rule::unary(format!("col{i}"), Operator::NotNull),
            };
            RuleNode::from(rule)
        })
        .collect();
    QueryRequest::new("users").filter(RuleGroup::and(members))
}

fn nested_request(depth: usize) -> QueryRequest {
    let mut group = RuleGroup::or(vec![Rule::new("name", Operator::Eq, "x").into()]);
    for i in 0..depth {
        group = RuleGroup::and(vec![
            Rule::new(format!("c{i}"), Operator::Gt, Value::Int(1)).into(),
            group.into(),
        ]);
    }
    QueryRequest::new("users").filter(group)
}

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");

    group.bench_function("select_all", |b| {
        let request = QueryRequest::new("users");
        b.iter(|| compile(black_box(&request)))
    });

    for rules in [1, 10, 50] {
        let request = flat_request(rules);
        group.bench_with_input(BenchmarkId::new("flat_rules", rules), &request, |b, r| {
            b.iter(|| compile(black_box(r)))
        });
    }

    for depth in [4, 16, 32] {
        let request = nested_request(depth);
        group.bench_with_input(BenchmarkId::new("nested_groups", depth), &request, |b, r| {
            b.iter(|| compile(black_box(r)))
        });
    }

    let compiler = QueryCompiler::new();
    let joined = QueryRequest::new("users")
        .join(JoinConfig::new(JoinType::Left, "orders", "id", "user_id"))
        .join(JoinConfig::new(JoinType::Inner, "profiles", "id", "user_id"))
        .filter(RuleGroup::and(vec![
            Rule::new("orders.status", Operator::Eq, "shipped").into(),
            Rule::new("profiles.country", Operator::BeginsWith, "Es").into(),
        ]));
    group.bench_function("joins", |b| b.iter(|| compiler.compile(black_box(&joined))));

    group.finish();
}

// =============================================================================
// Parsing Benchmarks
// =============================================================================

fn bench_parse(c: &mut Criterion) {
    let body = r#"{
        "table": "users",
        "joins": [{"type": "LEFT", "targetTable": "orders", "sourceColumn": "id", "targetColumn": "user_id"}],
        "query": {"combinator": "and", "rules": [
            {"field": "email", "operator": "contains", "value": "@example.com"},
            {"combinator": "or", "rules": [
                {"field": "orders.status", "operator": "in", "value": ["paid", "shipped"]},
                {"field": "orders.total", "operator": ">", "value": 100}
            ]}
        ]}
    }"#;

    c.bench_function("parse_request", |b| {
        b.iter(|| QueryRequest::parse(black_box(body)))
    });
}

criterion_group!(benches, bench_quoting, bench_compile, bench_parse);
criterion_main!(benches);
