//! Compilation errors.

use std::fmt;

/// Configuration errors that stop a statement from being compiled.
///
/// Malformed filter rules are never errors; they are skipped. These variants
/// cover definitions that would otherwise produce invalid SQL.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CompileError {
    /// The request names no primary table.
    MissingTable,
    /// A join lacks its target table or one of its ON columns.
    IncompleteJoin {
        /// Position of the join in the request.
        index: usize,
        /// The join's target table (may be empty).
        table: String,
        /// Which part is missing: `targetTable`, `sourceColumn` or `targetColumn`.
        missing: &'static str,
    },
    /// A selected column has no column name.
    IncompleteProjection {
        /// Position of the projection in the request.
        index: usize,
    },
    /// A `table.column` reference names neither the primary table nor a join.
    UnknownTable {
        /// The unresolved table name.
        table: String,
        /// Where the reference appeared, e.g. `filter field "orders.status"`.
        context: String,
    },
    /// A compiler option is not usable in generated SQL.
    InvalidOption {
        /// Option name.
        name: &'static str,
        /// Rejected value.
        value: String,
    },
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTable => write!(f, "Table name is required"),
            Self::IncompleteJoin {
                index,
                table,
                missing,
            } => write!(f, "Join {index} ({table:?}) is missing its {missing}"),
            Self::IncompleteProjection { index } => {
                write!(f, "Selected column {index} has no column name")
            },
            Self::UnknownTable { table, context } => write!(
                f,
                "Table '{table}' in {context} is neither the queried table nor a joined table"
            ),
            Self::InvalidOption { name, value } => {
                write!(f, "Invalid compiler option {name} = {value:?}")
            },
        }
    }
}

impl std::error::Error for CompileError {}
