//! Identifier and literal quoting.

/// Quote a table or column name as a SQL identifier.
///
/// Wraps the name in double quotes and doubles any embedded double quote, so
/// the result is always a single identifier token whatever the input.
///
/// # Examples
///
/// ```
/// use rowscout_sql::quote_ident;
///
/// assert_eq!(quote_ident("users"), r#""users""#);
/// assert_eq!(quote_ident(r#"we"ird"#), r#""we""ird""#);
/// assert_eq!(quote_ident(""), r#""""#);
/// ```
#[must_use]
pub fn quote_ident(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    out.push('"');
    for c in name.chars() {
        if c == '"' {
            out.push('"');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Quote a string as a SQL string literal, doubling embedded single quotes.
///
/// # Examples
///
/// ```
/// use rowscout_sql::quote_literal;
///
/// assert_eq!(quote_literal("shipped"), "'shipped'");
/// assert_eq!(quote_literal("O'Brien"), "'O''Brien'");
/// ```
#[must_use]
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
