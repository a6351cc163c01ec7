//! SELECT statement assembly.

use tracing::debug;

use crate::validate::{is_reserved_keyword, is_valid_qualified_identifier, is_valid_sql_identifier};

use super::error::CompileError;
use super::filter::build_group;
use super::quote::quote_ident;
use super::scope::{Scope, join_alias};
use super::types::{JoinConfig, QueryRequest};

/// Alias of the primary table unless configured otherwise.
pub const DEFAULT_PRIMARY_ALIAS: &str = "main";

/// SQL function that strips diacritics, applied when comparing text.
pub const DEFAULT_NORMALIZER: &str = "unaccent";

/// Settings that shape the generated SQL.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct CompilerOptions {
    /// Alias of the primary table. Must be a bare identifier, must not be a
    /// reserved keyword and must not collide with the join aliases (`j0`,
    /// `J1`, ...) once folded to lower case.
    pub primary_alias: String,
    /// Accent-stripping SQL function, optionally schema-qualified
    /// (`unaccent`, `public.unaccent`).
    pub normalizer: String,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            primary_alias: DEFAULT_PRIMARY_ALIAS.to_string(),
            normalizer: DEFAULT_NORMALIZER.to_string(),
        }
    }
}

impl CompilerOptions {
    /// Set the primary table alias.
    pub fn primary_alias(mut self, alias: impl Into<String>) -> Self {
        self.primary_alias = alias.into();
        self
    }

    /// Set the normalizer function.
    pub fn normalizer(mut self, func: impl Into<String>) -> Self {
        self.normalizer = func.into();
        self
    }

    /// Check that both options are safe to interpolate unquoted.
    pub fn validate(&self) -> Result<(), CompileError> {
        let alias = &self.primary_alias;
        if !is_valid_sql_identifier(alias)
            || is_reserved_keyword(alias)
            || looks_like_join_alias(alias)
        {
            return Err(CompileError::InvalidOption {
                name: "primary_alias",
                value: alias.clone(),
            });
        }
        if !is_valid_qualified_identifier(&self.normalizer) {
            return Err(CompileError::InvalidOption {
                name: "normalizer",
                value: self.normalizer.clone(),
            });
        }
        Ok(())
    }
}

fn looks_like_join_alias(alias: &str) -> bool {
    alias
        .strip_prefix(['j', 'J'])
        .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()))
}

/// Compiles query requests into SELECT statements.
///
/// The compiler holds only its options; it is cheap to clone and safe to
/// share between threads.
///
/// # Example
///
/// ```
/// use rowscout_sql::prelude::*;
///
/// let request = QueryRequest::new("users")
///     .join(JoinConfig::new(JoinType::Left, "orders", "id", "user_id"))
///     .filter(RuleGroup::and(vec![
///         Rule::new("orders.status", Operator::Eq, "shipped").into(),
///     ]));
///
/// let sql = QueryCompiler::new().compile(&request).unwrap();
/// assert!(sql.starts_with("SELECT main.*, j0.* FROM \"users\" AS main"));
/// assert!(sql.contains("LEFT JOIN \"orders\" AS j0 ON main.\"id\" = j0.\"user_id\""));
/// ```
#[derive(Debug, Clone, Default)]
pub struct QueryCompiler {
    options: CompilerOptions,
}

impl QueryCompiler {
    /// Create a compiler with the default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a compiler with validated options.
    pub fn with_options(options: CompilerOptions) -> Result<Self, CompileError> {
        options.validate()?;
        Ok(Self { options })
    }

    /// The options in effect.
    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Compile a full SELECT statement.
    ///
    /// Fails on configuration errors: a missing table, a join without its
    /// columns, a selected column without a name, or a `table.column`
    /// reference to a table that is not part of the query.
    pub fn compile(&self, request: &QueryRequest) -> Result<String, CompileError> {
        if request.table.is_empty() {
            return Err(CompileError::MissingTable);
        }
        for (index, join) in request.joins.iter().enumerate() {
            check_join(index, join)?;
        }

        let scope = self.scope(request);
        let alias = scope.primary_alias;

        let mut sql = format!(
            "SELECT {} FROM {} AS {alias}",
            build_projection(&scope, request)?,
            quote_ident(&request.table),
        );

        for (index, join) in request.joins.iter().enumerate() {
            let join_alias = join_alias(index);
            sql.push_str(&format!(
                " {} JOIN {} AS {join_alias} ON {alias}.{} = {join_alias}.{}",
                join.join_type.as_sql(),
                quote_ident(&join.target_table),
                quote_ident(&join.source_column),
                quote_ident(&join.target_column),
            ));
        }

        let condition = build_group(&scope, &request.query)?;
        if !condition.trim().is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&condition);
        }

        debug!(table = %request.table, joins = request.joins.len(), %sql, "compiled query");
        Ok(sql)
    }

    /// Compile only the filter tree, without the `WHERE` keyword.
    ///
    /// Returns an empty string when the tree has no usable rule.
    pub fn compile_filter(&self, request: &QueryRequest) -> Result<String, CompileError> {
        build_group(&self.scope(request), &request.query)
    }

    fn scope<'a>(&'a self, request: &'a QueryRequest) -> Scope<'a> {
        Scope {
            table: &request.table,
            primary_alias: &self.options.primary_alias,
            joins: &request.joins,
            normalizer: &self.options.normalizer,
        }
    }
}

/// Compile a request with the default options.
///
/// ```
/// use rowscout_sql::{QueryRequest, compile};
///
/// let sql = compile(&QueryRequest::new("users")).unwrap();
/// assert_eq!(sql, "SELECT main.* FROM \"users\" AS main");
/// ```
pub fn compile(request: &QueryRequest) -> Result<String, CompileError> {
    QueryCompiler::new().compile(request)
}

fn check_join(index: usize, join: &JoinConfig) -> Result<(), CompileError> {
    let missing = if join.target_table.is_empty() {
        "targetTable"
    } else if join.source_column.is_empty() {
        "sourceColumn"
    } else if join.target_column.is_empty() {
        "targetColumn"
    } else {
        return Ok(());
    };
    Err(CompileError::IncompleteJoin {
        index,
        table: join.target_table.clone(),
        missing,
    })
}

/// Explicit column list, or every column of every table in the query.
fn build_projection(scope: &Scope<'_>, request: &QueryRequest) -> Result<String, CompileError> {
    if request.selected_columns.is_empty() {
        let mut parts = vec![format!("{}.*", scope.primary_alias)];
        parts.extend((0..request.joins.len()).map(|i| format!("{}.*", join_alias(i))));
        return Ok(parts.join(", "));
    }

    let mut parts = Vec::with_capacity(request.selected_columns.len());
    for (index, col) in request.selected_columns.iter().enumerate() {
        if col.column.is_empty() {
            return Err(CompileError::IncompleteProjection { index });
        }
        // an unnamed table means the primary table
        let table = if col.table.is_empty() {
            request.table.as_str()
        } else {
            col.table.as_str()
        };
        let alias = scope.table_alias(table, || format!("selected column {:?}", col.column))?;
        let output = if col.alias.is_empty() {
            &col.column
        } else {
            &col.alias
        };
        parts.push(format!(
            "{alias}.{} AS {}",
            quote_ident(&col.column),
            quote_ident(output)
        ));
    }
    Ok(parts.join(", "))
}
