//! Bare identifier validation.

/// Maximum length for SQL identifiers (`PostgreSQL` limit is 63).
const MAX_IDENTIFIER_LENGTH: usize = 63;

/// Whether a string can be written into SQL as a bare identifier.
///
/// A valid identifier starts with an ASCII letter or underscore, continues
/// with ASCII letters, digits or underscores, and is 1-63 bytes long.
///
/// ```
/// use rowscout_sql::is_valid_sql_identifier;
///
/// assert!(is_valid_sql_identifier("main"));
/// assert!(is_valid_sql_identifier("_base1"));
///
/// assert!(!is_valid_sql_identifier(""));
/// assert!(!is_valid_sql_identifier("1st"));
/// assert!(!is_valid_sql_identifier("public.unaccent"));
/// assert!(!is_valid_sql_identifier("x; DROP TABLE users"));
/// ```
#[inline]
#[must_use]
pub fn is_valid_sql_identifier(s: &str) -> bool {
    if s.is_empty() || s.len() > MAX_IDENTIFIER_LENGTH {
        return false;
    }

    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {},
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Whether a string is a dot-separated path of bare identifiers, such as a
/// schema-qualified function name.
///
/// ```
/// use rowscout_sql::is_valid_qualified_identifier;
///
/// assert!(is_valid_qualified_identifier("unaccent"));
/// assert!(is_valid_qualified_identifier("public.unaccent"));
/// assert!(!is_valid_qualified_identifier("public..unaccent"));
/// assert!(!is_valid_qualified_identifier("unaccent(x)"));
/// ```
#[must_use]
pub fn is_valid_qualified_identifier(s: &str) -> bool {
    s.split('.').all(is_valid_sql_identifier)
}

/// `PostgreSQL` keywords that cannot name a table alias, reserved and
/// type/function-name classes.
const RESERVED_KEYWORDS: &[&str] = &[
    "all", "analyse", "analyze", "and", "any", "array", "as", "asc", "asymmetric",
    "authorization", "binary", "both", "case", "cast", "check", "collate", "collation",
    "column", "concurrently", "constraint", "create", "cross", "current_catalog",
    "current_date", "current_role", "current_schema", "current_time", "current_timestamp",
    "current_user", "default", "deferrable", "desc", "distinct", "do", "else", "end",
    "except", "false", "fetch", "for", "foreign", "freeze", "from", "full", "grant",
    "group", "having", "ilike", "in", "initially", "inner", "intersect", "into", "is",
    "isnull", "join", "lateral", "leading", "left", "like", "limit", "localtime",
    "localtimestamp", "natural", "not", "notnull", "null", "offset", "on", "only", "or",
    "order", "outer", "overlaps", "placing", "primary", "references", "returning", "right",
    "select", "session_user", "similar", "some", "symmetric", "system_user", "table",
    "tablesample", "then", "to", "trailing", "true", "union", "unique", "user", "using",
    "variadic", "verbose", "when", "where", "window", "with",
];

/// Whether an identifier is a keyword `PostgreSQL` rejects as a bare alias.
/// Case-insensitive, since unquoted identifiers fold to lower case.
pub(crate) fn is_reserved_keyword(s: &str) -> bool {
    let lower = s.to_ascii_lowercase();
    RESERVED_KEYWORDS.contains(&lower.as_str())
}
