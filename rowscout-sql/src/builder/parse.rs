//! Runtime JSON parsing for query requests.
//!
//! Turns the body the query builder UI posts into a [`QueryRequest`]:
//!
//! ```json
//! {
//!   "table": "users",
//!   "query": {
//!     "combinator": "and",
//!     "rules": [
//!       { "field": "email", "operator": "contains", "value": "@example.com" },
//!       { "combinator": "or", "rules": [
//!         { "field": "orders.status", "operator": "=", "value": "shipped" }
//!       ]}
//!     ]
//!   },
//!   "joins": [
//!     { "type": "LEFT", "targetTable": "orders", "sourceColumn": "id", "targetColumn": "user_id" }
//!   ],
//!   "selectedColumns": [
//!     { "table": "users", "column": "email", "alias": "Email" }
//!   ]
//! }
//! ```
//!
//! Parsing is lenient where compiling is: rules missing a field or operator
//! parse fine and are skipped later. Structural mistakes (wrong JSON types,
//! unknown combinators or join types) are errors.

use super::types::{
    ColumnProjection, Combinator, JoinConfig, JoinType, Operator, QueryRequest, Rule, RuleGroup,
    RuleNode, Value,
};
use miniserde::json::{self, Number, Object, Value as JsonValue};
use std::fmt;
use tracing::debug;

/// Deepest group nesting accepted from JSON.
pub const MAX_GROUP_DEPTH: usize = 32;

/// Error type for request parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
    /// Invalid JSON syntax or encoding.
    InvalidJson,
    /// Expected an object but got something else.
    ExpectedObject,
    /// Expected an array but got something else.
    ExpectedArray,
    /// `table` is absent, empty, or not a string.
    MissingTable,
    /// A group combinator other than `and` / `or`.
    InvalidCombinator(String),
    /// A join type other than `INNER` / `LEFT` / `RIGHT`.
    InvalidJoinType(String),
    /// A rule value is an object (or an array containing one).
    InvalidValue {
        /// Field of the offending rule.
        field: String,
    },
    /// Groups are nested deeper than allowed.
    TooDeep {
        /// The nesting limit.
        max: usize,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidJson => write!(f, "Invalid JSON syntax or encoding"),
            Self::ExpectedObject => write!(f, "Expected JSON object"),
            Self::ExpectedArray => write!(f, "Expected JSON array"),
            Self::MissingTable => write!(f, "Table name is required"),
            Self::InvalidCombinator(c) => write!(f, "Unknown combinator '{c}'"),
            Self::InvalidJoinType(t) => write!(f, "Unknown join type '{t}'"),
            Self::InvalidValue { field } => {
                write!(f, "Value of rule '{field}' must be a scalar or a list")
            },
            Self::TooDeep { max } => write!(f, "Rule groups nested deeper than {max}"),
        }
    }
}

impl std::error::Error for ParseError {}

impl Value {
    /// Convert from a miniserde JSON value.
    ///
    /// Returns `None` for objects and for arrays nested inside arrays, which
    /// are not valid rule values.
    ///
    /// ```
    /// use rowscout_sql::Value;
    /// use miniserde::json::{Number, Value as JsonValue};
    ///
    /// let json = JsonValue::Number(Number::I64(42));
    /// assert_eq!(Value::from_json(&json), Some(Value::Int(42)));
    /// ```
    #[must_use]
    pub fn from_json(json: &JsonValue) -> Option<Self> {
        match json {
            JsonValue::Array(arr) => {
                let values: Option<Vec<Self>> = arr.iter().map(Self::scalar_from_json).collect();
                values.map(Self::Array)
            },
            scalar => Self::scalar_from_json(scalar),
        }
    }

    fn scalar_from_json(json: &JsonValue) -> Option<Self> {
        match json {
            JsonValue::Null => Some(Self::Null),
            JsonValue::Bool(b) => Some(Self::Bool(*b)),
            JsonValue::Number(n) => Some(match n {
                Number::I64(i) => Self::Int(*i),
                #[allow(clippy::cast_precision_loss)]
                Number::U64(u) => i64::try_from(*u).map_or(Self::Float(*u as f64), Self::Int),
                Number::F64(f) => Self::Float(*f),
            }),
            JsonValue::String(s) => Some(Self::String(s.clone())),
            JsonValue::Array(_) | JsonValue::Object(_) => None,
        }
    }
}

impl QueryRequest {
    /// Parse a request from a JSON string.
    ///
    /// ```
    /// use rowscout_sql::QueryRequest;
    ///
    /// let req = QueryRequest::parse(r#"{"table": "users"}"#).unwrap();
    /// assert_eq!(req.table, "users");
    /// assert!(req.query.is_empty());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the JSON is invalid or malformed.
    pub fn parse(json_str: &str) -> Result<Self, ParseError> {
        let json: JsonValue = json::from_str(json_str).map_err(|_| ParseError::InvalidJson)?;
        Self::from_json(&json)
    }

    /// Parse a request from raw body bytes.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the bytes are not valid UTF-8 or valid JSON.
    pub fn parse_bytes(bytes: &[u8]) -> Result<Self, ParseError> {
        let s = std::str::from_utf8(bytes).map_err(|_| ParseError::InvalidJson)?;
        Self::parse(s)
    }

    /// Build a request from an already parsed JSON value.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the JSON structure is invalid.
    pub fn from_json(json: &JsonValue) -> Result<Self, ParseError> {
        let JsonValue::Object(obj) = json else {
            return Err(ParseError::ExpectedObject);
        };

        let table = match obj.get("table") {
            Some(JsonValue::String(t)) if !t.is_empty() => t.clone(),
            _ => return Err(ParseError::MissingTable),
        };

        let query = match obj.get("query") {
            None | Some(JsonValue::Null) => RuleGroup::default(),
            Some(JsonValue::Object(group)) => parse_group(group, 1)?,
            Some(_) => return Err(ParseError::ExpectedObject),
        };

        let joins = array_member(obj, "joins")?
            .iter()
            .map(parse_join)
            .collect::<Result<_, _>>()?;

        let selected_columns = array_member(obj, "selectedColumns")?
            .iter()
            .map(parse_projection)
            .collect::<Result<_, _>>()?;

        Ok(Self {
            table,
            query,
            joins,
            selected_columns,
        })
    }
}

impl RuleGroup {
    /// Build a rule group from a parsed JSON object.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the JSON structure is invalid.
    pub fn from_json(json: &JsonValue) -> Result<Self, ParseError> {
        match json {
            JsonValue::Object(obj) => parse_group(obj, 1),
            _ => Err(ParseError::ExpectedObject),
        }
    }
}

/// An optional array member; absent or `null` reads as empty.
fn array_member<'a>(obj: &'a Object, key: &str) -> Result<&'a [JsonValue], ParseError> {
    match obj.get(key) {
        None | Some(JsonValue::Null) => Ok(&[][..]),
        Some(JsonValue::Array(arr)) => Ok(arr.as_slice()),
        Some(_) => Err(ParseError::ExpectedArray),
    }
}

/// An optional string member; anything else reads as empty.
fn string_member(obj: &Object, key: &str) -> String {
    match obj.get(key) {
        Some(JsonValue::String(s)) => s.clone(),
        _ => String::new(),
    }
}

fn is_group(obj: &Object) -> bool {
    matches!(obj.get("rules"), Some(JsonValue::Array(_)))
}

fn parse_group(obj: &Object, depth: usize) -> Result<RuleGroup, ParseError> {
    if depth > MAX_GROUP_DEPTH {
        return Err(ParseError::TooDeep {
            max: MAX_GROUP_DEPTH,
        });
    }

    let combinator = match obj.get("combinator") {
        None | Some(JsonValue::Null) => Combinator::default(),
        Some(JsonValue::String(name)) => {
            Combinator::from_name(name).ok_or_else(|| ParseError::InvalidCombinator(name.clone()))?
        },
        Some(other) => return Err(ParseError::InvalidCombinator(json::to_string(other))),
    };

    let mut rules = Vec::new();
    for member in array_member(obj, "rules")? {
        match member {
            JsonValue::Object(child) if is_group(child) => {
                rules.push(RuleNode::Group(parse_group(child, depth + 1)?));
            },
            JsonValue::Object(child) => rules.push(RuleNode::Rule(parse_rule(child)?)),
            other => debug!(member = %json::to_string(other), "dropping non-object group member"),
        }
    }

    Ok(RuleGroup { combinator, rules })
}

fn parse_rule(obj: &Object) -> Result<Rule, ParseError> {
    let field = string_member(obj, "field");
    let operator = match obj.get("operator") {
        Some(JsonValue::String(name)) => Operator::from_name(name),
        _ => None,
    };
    let value = match obj.get("value") {
        None => None,
        Some(json) => Some(
            Value::from_json(json).ok_or_else(|| ParseError::InvalidValue {
                field: field.clone(),
            })?,
        ),
    };
    Ok(Rule {
        field,
        operator,
        value,
    })
}

fn parse_join(json: &JsonValue) -> Result<JoinConfig, ParseError> {
    let JsonValue::Object(obj) = json else {
        return Err(ParseError::ExpectedObject);
    };
    let join_type = match obj.get("type") {
        None | Some(JsonValue::Null) => JoinType::default(),
        Some(JsonValue::String(name)) => {
            JoinType::from_name(name).ok_or_else(|| ParseError::InvalidJoinType(name.clone()))?
        },
        Some(other) => return Err(ParseError::InvalidJoinType(json::to_string(other))),
    };
    Ok(JoinConfig {
        join_type,
        target_table: string_member(obj, "targetTable"),
        source_column: string_member(obj, "sourceColumn"),
        target_column: string_member(obj, "targetColumn"),
    })
}

fn parse_projection(json: &JsonValue) -> Result<ColumnProjection, ParseError> {
    let JsonValue::Object(obj) = json else {
        return Err(ParseError::ExpectedObject);
    };
    let column = string_member(obj, "column");
    let alias = match obj.get("alias") {
        Some(JsonValue::String(alias)) => alias.clone(),
        _ => column.clone(),
    };
    Ok(ColumnProjection {
        table: string_member(obj, "table"),
        column,
        alias,
    })
}
