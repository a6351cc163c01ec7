//! Identifier checks for names interpolated into SQL without quoting.
//!
//! Table and column names from a request are always quoted. The compiler's
//! own settings (the primary alias and the normalizer function) are written
//! bare, so they must pass these checks first.

mod column;

pub(crate) use column::is_reserved_keyword;
pub use column::{is_valid_qualified_identifier, is_valid_sql_identifier};
