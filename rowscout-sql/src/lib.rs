// =============================================================================
// CRATE-LEVEL QUALITY LINTS (following Tokio/Serde standards)
// =============================================================================
#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]
#![warn(unreachable_pub)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
// =============================================================================
// CLIPPY CONFIGURATION
// =============================================================================
#![allow(clippy::doc_markdown)] // Code items in docs - extensive doc changes needed
#![allow(clippy::missing_errors_doc)] // # Errors sections - doc-heavy
#![allow(clippy::module_name_repetitions)] // Type names matching module - acceptable
#![allow(clippy::return_self_not_must_use)] // Builder pattern methods return Self by design
#![allow(clippy::must_use_candidate)] // Builder methods - fluent API doesn't need must_use
#![allow(clippy::format_push_string)] // String building style preference

//! # rowscout-sql - Query Builder Filters to SQL
//!
//! Compiles the filter trees produced by a visual query builder, plus an
//! optional list of joins and selected columns, into one PostgreSQL SELECT
//! statement. Values are inlined as escaped literals; text comparisons are
//! case- and accent-insensitive.
//!
//! ## Quick Start
//!
//! ```
//! # use rowscout_sql::prelude::*;
//! let request = QueryRequest::new("users").filter(RuleGroup::and(vec![
//!     Rule::new("email", Operator::Contains, "@example.com").into(),
//!     Rule::new("age", Operator::Gte, 18).into(),
//! ]));
//!
//! let sql = compile(&request).unwrap();
//! assert_eq!(
//!     sql,
//!     "SELECT main.* FROM \"users\" AS main WHERE \
//!      unaccent(lower(CAST(main.\"email\" AS TEXT))) LIKE unaccent(lower('%@example.com%')) \
//!      AND main.\"age\" >= 18"
//! );
//! ```
//!
//! ## From JSON
//!
//! ```
//! # use rowscout_sql::prelude::*;
//! let request = QueryRequest::parse(r#"{
//!     "table": "users",
//!     "joins": [{"type": "LEFT", "targetTable": "orders", "sourceColumn": "id", "targetColumn": "user_id"}],
//!     "query": {"combinator": "or", "rules": [
//!         {"field": "orders.status", "operator": "in", "value": ["paid", "shipped"]},
//!         {"field": "orders.total", "operator": ">", "value": 100}
//!     ]}
//! }"#).unwrap();
//!
//! let sql = compile(&request).unwrap();
//! assert!(sql.contains("LEFT JOIN \"orders\" AS j0"));
//! assert!(sql.ends_with("OR j0.\"total\" > 100"));
//! ```
//!
//! ## Supported Operators
//!
//! | Operator | SQL |
//! |----------|-----|
//! | `=` | `norm(col) = norm('v')`, or `col = n` for numbers |
//! | `!=` | `norm(col) != norm('v')`, or `col != n` |
//! | `<` `>` `<=` `>=` | `col < 'v'` / `col < n`, never normalized |
//! | `contains` | `norm(col) LIKE norm('%v%')` |
//! | `beginsWith` | `norm(col) LIKE norm('v%')` |
//! | `endsWith` | `norm(col) LIKE norm('%v')` |
//! | `null` / `notNull` | `col IS NULL` / `col IS NOT NULL` |
//! | `in` | `norm(col) IN (norm('a'), ...)`, or `col IN (1, 2)` |
//! | anything else | treated as `=` |
//!
//! `norm(x)` stands for `unaccent(lower(x))`, with columns cast to `TEXT`.
//!
//! ## Aliases
//!
//! The primary table is aliased `main` and the join at position N `jN`, so
//! `orders.status` resolves to `j0."status"` when `orders` is the first join.

mod builder;
mod executor;
mod schema;
mod validate;

pub use builder::{
    ColumnProjection, Combinator, CompileError, CompilerOptions, DEFAULT_NORMALIZER,
    DEFAULT_PRIMARY_ALIAS, JoinConfig, JoinType, MAX_GROUP_DEPTH, Operator, ParseError,
    QueryCompiler, QueryRequest, Rule, RuleGroup, RuleNode, Value, compile, quote_ident,
    quote_literal,
};
pub use executor::{
    COMPILE_ERROR_MESSAGE, ExecutorError, INVALID_REQUEST_MESSAGE, QueryResponse, Row,
    SYNTAX_ERROR_MESSAGE, SqlExecutor, handle_query_body, run_query,
};
pub use schema::{
    ColumnInfo, FieldDescriptor, InputType, POSTGRES_INPUT_TYPES, field_descriptors,
    fields_to_json,
};
pub use validate::{is_valid_qualified_identifier, is_valid_sql_identifier};

/// Re-export miniserde's json module, used by every `from_json`/`to_json`.
///
/// ```
/// use rowscout_sql::{json, QueryRequest};
///
/// let value: miniserde::json::Value = json::from_str(r#"{"table": "users"}"#).unwrap();
/// let request = QueryRequest::from_json(&value).unwrap();
/// assert_eq!(request.table, "users");
/// ```
pub use miniserde::json;

/// Prelude module for convenient imports.
///
/// ```
/// use rowscout_sql::prelude::*;
///
/// let sql = QueryCompiler::new().compile(&QueryRequest::new("users")).unwrap();
/// assert_eq!(sql, "SELECT main.* FROM \"users\" AS main");
/// ```
pub mod prelude {
    pub use crate::{
        ColumnProjection, Combinator, CompileError, CompilerOptions, ExecutorError, JoinConfig,
        JoinType, Operator, ParseError, QueryCompiler, QueryRequest, QueryResponse, Row, Rule,
        RuleGroup, RuleNode, SqlExecutor, Value, compile, json, run_query,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_select() {
        assert_eq!(
            compile(&QueryRequest::new("users")).unwrap(),
            "SELECT main.* FROM \"users\" AS main"
        );
    }

    #[test]
    fn test_nested_groups() {
        let request = QueryRequest::new("products").filter(RuleGroup::and(vec![
            Rule::new("category", Operator::Eq, "Café").into(),
            RuleGroup::or(vec![
                Rule::new("price", Operator::Lt, 10).into(),
                Rule::new("stock", Operator::Gt, 100).into(),
            ])
            .into(),
        ]));

        assert_eq!(
            compile(&request).unwrap(),
            "SELECT main.* FROM \"products\" AS main WHERE \
             unaccent(lower(CAST(main.\"category\" AS TEXT))) = unaccent(lower('Café')) \
             AND (main.\"price\" < 10 OR main.\"stock\" > 100)"
        );
    }

    #[test]
    fn test_parse_then_compile() {
        let request = QueryRequest::parse(
            r#"{"table": "users", "query": {"rules": [
                {"field": "name", "operator": "beginsWith", "value": "O'Br"},
                {"field": "deleted_at", "operator": "null"}
            ]}}"#,
        )
        .unwrap();

        assert_eq!(
            compile(&request).unwrap(),
            "SELECT main.* FROM \"users\" AS main WHERE \
             unaccent(lower(CAST(main.\"name\" AS TEXT))) LIKE unaccent(lower('O''Br%')) \
             AND main.\"deleted_at\" IS NULL"
        );
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // EDGE CASE TESTS
    // ═══════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_numeric_string_compares_as_number() {
        let request = QueryRequest::new("orders").filter(RuleGroup::and(vec![
            Rule::new("total", Operator::Eq, "42.50").into(),
        ]));
        assert!(compile(&request).unwrap().ends_with("WHERE main.\"total\" = 42.5"));
    }

    #[test]
    fn test_injection_in_value_stays_literal() {
        let request = QueryRequest::new("users").filter(RuleGroup::and(vec![
            Rule::new("name", Operator::Eq, "x'); DROP TABLE users; --").into(),
        ]));
        let sql = compile(&request).unwrap();
        assert!(sql.contains("'x''); DROP TABLE users; --'"));
    }

    #[test]
    fn test_injection_in_field_stays_identifier() {
        let request = QueryRequest::new("users").filter(RuleGroup::and(vec![
            Rule::unary("a\" IS NULL OR \"1", Operator::NotNull).into(),
        ]));
        let sql = compile(&request).unwrap();
        assert!(sql.ends_with("WHERE main.\"a\"\" IS NULL OR \"\"1\" IS NOT NULL"));
    }

    #[test]
    fn test_unknown_operator_is_equality() {
        let request = QueryRequest::new("users").filter(RuleGroup::and(vec![
            Rule::new("n", Operator::Other, 5).into(),
        ]));
        assert!(compile(&request).unwrap().ends_with("WHERE main.\"n\" = 5"));
    }
}

// ============================================================================
// API Contract Tests (compile-time assertions)
// ============================================================================
