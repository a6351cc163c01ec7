//! Running compiled statements and shaping the HTTP-style response.
//!
//! The compiler never talks to a database. Callers plug one in through
//! [`SqlExecutor`]; [`run_query`] compiles, executes and wraps the outcome in
//! the envelope the query builder UI expects.

use std::fmt;

use miniserde::json::{self, Array, Number, Object, Value as JsonValue};
use tracing::{debug, warn};

use crate::builder::{QueryCompiler, QueryRequest, Value};

/// Shown to the user when the database rejects the statement.
pub const SYNTAX_ERROR_MESSAGE: &str = "Query syntax error. Please check your filters.";

/// Shown to the user when the request cannot be compiled.
pub const COMPILE_ERROR_MESSAGE: &str =
    "Query could not be compiled. Please check your joins and filters.";

/// Shown to the user when the request body is not a valid query request.
pub const INVALID_REQUEST_MESSAGE: &str = "Invalid query request. Please check the request body.";

/// One result row: column names with their values, in result order.
pub type Row = Vec<(String, Value)>;

/// Error reported by an executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorError {
    message: String,
}

impl ExecutorError {
    /// Wrap a database error message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The database error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ExecutorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ExecutorError {}

/// Executes one SQL statement and returns its rows.
///
/// Closures with the matching signature implement this trait:
///
/// ```
/// use rowscout_sql::{ExecutorError, QueryCompiler, QueryRequest, Row, run_query};
///
/// let executor = |_sql: &str| -> Result<Vec<Row>, ExecutorError> { Ok(vec![]) };
/// let response = run_query(&QueryRequest::new("users"), &QueryCompiler::new(), &executor);
/// assert!(response.is_success());
/// ```
pub trait SqlExecutor {
    /// Run `sql` and collect every row.
    fn execute(&self, sql: &str) -> Result<Vec<Row>, ExecutorError>;
}

impl<F> SqlExecutor for F
where
    F: Fn(&str) -> Result<Vec<Row>, ExecutorError>,
{
    fn execute(&self, sql: &str) -> Result<Vec<Row>, ExecutorError> {
        self(sql)
    }
}

/// Outcome of one query request.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResponse {
    /// The statement ran.
    Success {
        /// The primary table.
        table: String,
        /// Number of rows returned.
        count: usize,
        /// The rows.
        rows: Vec<Row>,
        /// Whether the request joined other tables.
        has_joins: bool,
    },
    /// The request was rejected or the statement failed.
    Failure {
        /// HTTP status code.
        status: u16,
        /// Message safe to show to the user.
        user_message: String,
        /// Underlying error, for developers.
        dev_message: String,
    },
}

impl QueryResponse {
    fn failure(user_message: &str, dev_message: impl Into<String>) -> Self {
        Self::Failure {
            status: 400,
            user_message: user_message.to_string(),
            dev_message: dev_message.into(),
        }
    }

    /// Whether the query ran.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// HTTP status code: 200 on success.
    pub fn status(&self) -> u16 {
        match self {
            Self::Success { .. } => 200,
            Self::Failure { status, .. } => *status,
        }
    }

    /// Render the JSON envelope.
    ///
    /// Success: `{"success":true,"table":..,"count":..,"data":[..],"hasJoins":..}`.
    /// Failure: `{"success":false,"userMessage":..,"devMessage":..}`.
    /// Object keys come out sorted; when a row has two columns of the same
    /// name the later one wins.
    pub fn to_json(&self) -> String {
        json::to_string(&self.to_json_value())
    }

    /// The envelope as a JSON value.
    pub fn to_json_value(&self) -> JsonValue {
        let mut obj = Object::new();
        match self {
            Self::Success {
                table,
                count,
                rows,
                has_joins,
            } => {
                obj.insert("success".into(), JsonValue::Bool(true));
                obj.insert("table".into(), JsonValue::String(table.clone()));
                let count = u64::try_from(*count).unwrap_or(u64::MAX);
                obj.insert("count".into(), JsonValue::Number(Number::U64(count)));
                let mut data = Array::new();
                for row in rows {
                    data.push(row_to_json(row));
                }
                obj.insert("data".into(), JsonValue::Array(data));
                obj.insert("hasJoins".into(), JsonValue::Bool(*has_joins));
            },
            Self::Failure {
                user_message,
                dev_message,
                ..
            } => {
                obj.insert("success".into(), JsonValue::Bool(false));
                obj.insert("userMessage".into(), JsonValue::String(user_message.clone()));
                obj.insert("devMessage".into(), JsonValue::String(dev_message.clone()));
            },
        }
        JsonValue::Object(obj)
    }
}

impl Value {
    /// Convert to a miniserde JSON value. Non-finite floats become `null`.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Null => JsonValue::Null,
            Self::Bool(b) => JsonValue::Bool(*b),
            Self::Int(i) => JsonValue::Number(Number::I64(*i)),
            Self::Float(f) if f.is_finite() => JsonValue::Number(Number::F64(*f)),
            Self::Float(_) => JsonValue::Null,
            Self::String(s) => JsonValue::String(s.clone()),
            Self::Array(items) => {
                let mut arr = Array::new();
                for item in items {
                    arr.push(item.to_json());
                }
                JsonValue::Array(arr)
            },
        }
    }
}

fn row_to_json(row: &Row) -> JsonValue {
    let mut obj = Object::new();
    for (column, value) in row {
        obj.insert(column.clone(), value.to_json());
    }
    JsonValue::Object(obj)
}

/// Compile a request, execute it and wrap the outcome.
pub fn run_query(
    request: &QueryRequest,
    compiler: &QueryCompiler,
    executor: &impl SqlExecutor,
) -> QueryResponse {
    let sql = match compiler.compile(request) {
        Ok(sql) => sql,
        Err(err) => {
            warn!(table = %request.table, error = %err, "query compilation failed");
            return QueryResponse::failure(COMPILE_ERROR_MESSAGE, err.to_string());
        },
    };

    match executor.execute(&sql) {
        Ok(rows) => {
            debug!(table = %request.table, count = rows.len(), "query executed");
            QueryResponse::Success {
                table: request.table.clone(),
                count: rows.len(),
                rows,
                has_joins: request.has_joins(),
            }
        },
        Err(err) => {
            warn!(table = %request.table, error = %err, %sql, "query execution failed");
            QueryResponse::failure(SYNTAX_ERROR_MESSAGE, err.message())
        },
    }
}

/// Parse a raw JSON request body and run it.
///
/// A body that does not parse is a 400 failure like any other.
pub fn handle_query_body(
    body: &[u8],
    compiler: &QueryCompiler,
    executor: &impl SqlExecutor,
) -> QueryResponse {
    match QueryRequest::parse_bytes(body) {
        Ok(request) => run_query(&request, compiler, executor),
        Err(err) => {
            warn!(error = %err, "rejected query request body");
            QueryResponse::failure(INVALID_REQUEST_MESSAGE, err.to_string())
        },
    }
}
