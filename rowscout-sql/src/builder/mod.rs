//! Query compiler: filter trees and joins to a single SELECT statement.

mod error;
mod filter;
mod parse;
mod quote;
mod scope;
mod select;
mod types;
mod value;

pub use error::CompileError;
pub use parse::{MAX_GROUP_DEPTH, ParseError};
pub use quote::{quote_ident, quote_literal};
pub use select::{
    CompilerOptions, DEFAULT_NORMALIZER, DEFAULT_PRIMARY_ALIAS, QueryCompiler, compile,
};
pub use types::{
    ColumnProjection, Combinator, JoinConfig, JoinType, Operator, QueryRequest, Rule, RuleGroup,
    RuleNode, Value,
};
