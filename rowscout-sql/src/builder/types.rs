//! Core types for the query compiler.

/// Filter operators understood by the query builder UI.
///
/// Any operator name outside this set parses to [`Operator::Other`] and is
/// compiled with equality semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// Equal: `=`
    Eq,
    /// Not equal: `!=`
    Ne,
    /// Less than: `<`
    Lt,
    /// Greater than: `>`
    Gt,
    /// Less than or equal: `<=`
    Lte,
    /// Greater than or equal: `>=`
    Gte,
    /// Substring match: `LIKE '%v%'`
    Contains,
    /// Prefix match: `LIKE 'v%'`
    BeginsWith,
    /// Suffix match: `LIKE '%v'`
    EndsWith,
    /// `IS NULL`
    Null,
    /// `IS NOT NULL`
    NotNull,
    /// Set membership: `IN (...)`
    In,
    /// Unrecognized operator name, compiled as `=`.
    Other,
}

impl Operator {
    /// Operator name table, in the spelling the query builder sends.
    pub const NAMES: &'static [(&'static str, Self)] = &[
        ("=", Self::Eq),
        ("!=", Self::Ne),
        ("<", Self::Lt),
        (">", Self::Gt),
        ("<=", Self::Lte),
        (">=", Self::Gte),
        ("contains", Self::Contains),
        ("beginsWith", Self::BeginsWith),
        ("endsWith", Self::EndsWith),
        ("null", Self::Null),
        ("notNull", Self::NotNull),
        ("in", Self::In),
    ];

    /// Look up an operator by name.
    ///
    /// Returns `None` for an empty name; unknown names map to [`Operator::Other`].
    ///
    /// # Example
    ///
    /// ```
    /// use rowscout_sql::Operator;
    ///
    /// assert_eq!(Operator::from_name("beginsWith"), Some(Operator::BeginsWith));
    /// assert_eq!(Operator::from_name("doesNotContain"), Some(Operator::Other));
    /// assert_eq!(Operator::from_name(""), None);
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        if name.is_empty() {
            return None;
        }
        Some(
            Self::NAMES
                .iter()
                .find(|(n, _)| *n == name)
                .map_or(Self::Other, |(_, op)| *op),
        )
    }

    /// Text-match operators always compare normalized text.
    pub const fn is_text_match(self) -> bool {
        matches!(self, Self::Contains | Self::BeginsWith | Self::EndsWith)
    }

    /// Null tests ignore the rule value.
    pub const fn is_null_test(self) -> bool {
        matches!(self, Self::Null | Self::NotNull)
    }
}

/// Boolean combinator of a rule group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Combinator {
    /// All members must match: `AND`
    #[default]
    And,
    /// At least one member must match: `OR`
    Or,
}

impl Combinator {
    /// Parse `and` / `or`, ignoring case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("and") {
            Some(Self::And)
        } else if name.eq_ignore_ascii_case("or") {
            Some(Self::Or)
        } else {
            None
        }
    }

    /// Separator placed between compiled members.
    pub(crate) const fn separator(self) -> &'static str {
        match self {
            Self::And => " AND ",
            Self::Or => " OR ",
        }
    }
}

/// Rule values as they arrive from the query builder.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// JSON `null`, or no value at all.
    Null,
    /// JSON `true` or `false`; always compared as text.
    Bool(bool),
    /// Whole number.
    Int(i64),
    /// Floating point number; non-finite values are not numeric.
    Float(f64),
    /// Free text; may still be numeric (`"42"`).
    String(String),
    /// List value, used by `in`.
    Array(Vec<Value>),
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl<T: Into<Self>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Self::Array(values.into_iter().map(Into::into).collect())
    }
}

/// A leaf filter predicate.
///
/// `field` is either a bare column of the primary table or `table.column`.
/// A rule without a field or operator is skipped when compiling.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    /// `column` or `table.column`.
    pub field: String,
    /// `None` when the operator name was missing or unrecognised.
    pub operator: Option<Operator>,
    /// Absent values compile as `NULL`.
    pub value: Option<Value>,
}

impl Rule {
    /// Create a rule with a value.
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator: Some(operator),
            value: Some(value.into()),
        }
    }

    /// Create a rule that carries no value (`null`, `notNull`).
    pub fn unary(field: impl Into<String>, operator: Operator) -> Self {
        Self {
            field: field.into(),
            operator: Some(operator),
            value: None,
        }
    }

    /// Whether the rule has both a field and an operator.
    ///
    /// A dotted field needs a non-empty table and column on either side of
    /// the first `.`; `users.` and `.email` are incomplete.
    pub fn is_complete(&self) -> bool {
        let field_ok = match self.field.split_once('.') {
            Some((table, column)) => !table.is_empty() && !column.is_empty(),
            None => !self.field.is_empty(),
        };
        field_ok && self.operator.is_some()
    }

    /// The rule value, with an absent value read as `NULL`.
    pub(crate) fn value_or_null(&self) -> &Value {
        const NULL: &Value = &Value::Null;
        self.value.as_ref().unwrap_or(NULL)
    }
}

/// A member of a rule group.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleNode {
    /// A leaf predicate.
    Rule(Rule),
    /// A nested group, compiled inside parentheses.
    Group(RuleGroup),
}

impl From<Rule> for RuleNode {
    fn from(rule: Rule) -> Self {
        Self::Rule(rule)
    }
}

impl From<RuleGroup> for RuleNode {
    fn from(group: RuleGroup) -> Self {
        Self::Group(group)
    }
}

/// A combinator over rules and nested groups.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RuleGroup {
    /// How members are combined; `AND` unless stated.
    pub combinator: Combinator,
    /// Members, in order.
    pub rules: Vec<RuleNode>,
}

impl RuleGroup {
    /// Create an empty group.
    #[must_use]
    pub const fn new(combinator: Combinator) -> Self {
        Self {
            combinator,
            rules: Vec::new(),
        }
    }

    /// Create an AND group.
    #[must_use]
    pub fn and(rules: Vec<RuleNode>) -> Self {
        Self {
            combinator: Combinator::And,
            rules,
        }
    }

    /// Create an OR group.
    #[must_use]
    pub fn or(rules: Vec<RuleNode>) -> Self {
        Self {
            combinator: Combinator::Or,
            rules,
        }
    }

    /// Append a member.
    pub fn with(mut self, node: impl Into<RuleNode>) -> Self {
        self.rules.push(node.into());
        self
    }

    /// Whether the group has no members at all.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Drop the rules the query builder UI never submits.
    ///
    /// Removes rules lacking a field or operator, rules whose operator needs a
    /// value but carry none (absent or empty string), and groups left empty.
    pub fn prune(&mut self) {
        self.rules.retain_mut(|node| match node {
            RuleNode::Group(group) => {
                group.prune();
                !group.is_empty()
            },
            RuleNode::Rule(rule) => rule_is_submittable(rule),
        });
    }

    /// Maximum nesting depth of this group (a flat group has depth 1).
    pub fn depth(&self) -> usize {
        1 + self
            .rules
            .iter()
            .map(|node| match node {
                RuleNode::Group(group) => group.depth(),
                RuleNode::Rule(_) => 0,
            })
            .max()
            .unwrap_or(0)
    }
}

fn rule_is_submittable(rule: &Rule) -> bool {
    let Some(op) = rule.operator else {
        return false;
    };
    if !rule.is_complete() {
        return false;
    }
    if op.is_null_test() {
        return true;
    }
    match &rule.value {
        None => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

/// SQL join kinds offered by the join editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinType {
    /// `INNER JOIN`
    #[default]
    Inner,
    /// `LEFT JOIN`
    Left,
    /// `RIGHT JOIN`
    Right,
}

impl JoinType {
    /// Parse `INNER` / `LEFT` / `RIGHT`, ignoring case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "INNER" => Some(Self::Inner),
            "LEFT" => Some(Self::Left),
            "RIGHT" => Some(Self::Right),
            _ => None,
        }
    }

    /// SQL keyword, without `JOIN`.
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Inner => "INNER",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
        }
    }
}

/// One joined table.
///
/// Its position in the request's join list determines its alias (`j0`, `j1`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinConfig {
    /// Join kind; `INNER` unless stated.
    pub join_type: JoinType,
    /// Table being joined.
    pub target_table: String,
    /// Column of the primary table in the ON condition.
    pub source_column: String,
    /// Column of the joined table in the ON condition.
    pub target_column: String,
}

impl JoinConfig {
    /// Create a join from `primary.source_column` to `target_table.target_column`.
    pub fn new(
        join_type: JoinType,
        target_table: impl Into<String>,
        source_column: impl Into<String>,
        target_column: impl Into<String>,
    ) -> Self {
        Self {
            join_type,
            target_table: target_table.into(),
            source_column: source_column.into(),
            target_column: target_column.into(),
        }
    }
}

/// An explicitly selected column with its output alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnProjection {
    /// Primary or joined table; empty means the primary table.
    pub table: String,
    /// Column to select.
    pub column: String,
    /// Output column name; empty means the column name.
    pub alias: String,
}

impl ColumnProjection {
    /// Select `table.column`, named after the column.
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        let column = column.into();
        Self {
            table: table.into(),
            alias: column.clone(),
            column,
        }
    }

    /// Rename the output column.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }
}

/// Everything needed to compile one SELECT statement.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryRequest {
    /// Primary table.
    pub table: String,
    /// Root of the filter tree.
    pub query: RuleGroup,
    /// Joins; the one at position N is aliased `jN`.
    pub joins: Vec<JoinConfig>,
    /// Explicit projection; empty selects every column of every table.
    pub selected_columns: Vec<ColumnProjection>,
}

impl QueryRequest {
    /// Start a request against the given primary table.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    /// Set the filter tree.
    pub fn filter(mut self, query: RuleGroup) -> Self {
        self.query = query;
        self
    }

    /// Add a join.
    pub fn join(mut self, join: JoinConfig) -> Self {
        self.joins.push(join);
        self
    }

    /// Add an explicitly selected column.
    pub fn column(mut self, column: ColumnProjection) -> Self {
        self.selected_columns.push(column);
        self
    }

    /// Whether any other table is joined.
    pub fn has_joins(&self) -> bool {
        !self.joins.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_names() {
        for (name, op) in Operator::NAMES {
            assert_eq!(Operator::from_name(name), Some(*op));
        }
        assert_eq!(Operator::from_name("between"), Some(Operator::Other));
        assert_eq!(Operator::from_name("CONTAINS"), Some(Operator::Other));
        assert_eq!(Operator::from_name(""), None);
    }

    #[test]
    fn test_combinator_from_name() {
        assert_eq!(Combinator::from_name("and"), Some(Combinator::And));
        assert_eq!(Combinator::from_name("OR"), Some(Combinator::Or));
        assert_eq!(Combinator::from_name("xor"), None);
    }

    #[test]
    fn test_join_type_from_name() {
        assert_eq!(JoinType::from_name("left"), Some(JoinType::Left));
        assert_eq!(JoinType::from_name("RIGHT"), Some(JoinType::Right));
        assert_eq!(JoinType::from_name("FULL OUTER"), None);
    }

    #[test]
    fn test_projection_alias_defaults_to_column() {
        let col = ColumnProjection::new("users", "email");
        assert_eq!(col.alias, "email");
        assert_eq!(col.alias("contact").alias, "contact");
    }

    #[test]
    fn test_prune_drops_unsubmittable_rules() {
        let mut group = RuleGroup::and(vec![
            Rule::new("email", Operator::Contains, "test").into(),
            Rule::new("", Operator::Eq, "").into(),
            Rule::new("name", Operator::Eq, "John").into(),
            Rule::new("age", Operator::Gt, "").into(),
            Rule::unary("deleted_at", Operator::Null).into(),
            Rule {
                field: "status".into(),
                operator: None,
                value: Some("x".into()),
            }
            .into(),
        ]);

        group.prune();

        let fields: Vec<&str> = group
            .rules
            .iter()
            .map(|node| match node {
                RuleNode::Rule(r) => r.field.as_str(),
                RuleNode::Group(_) => "<group>",
            })
            .collect();
        assert_eq!(fields, vec!["email", "name", "deleted_at"]);
    }

    #[test]
    fn test_is_complete_requires_both_field_parts() {
        assert!(Rule::new("users.email", Operator::Eq, "a").is_complete());
        assert!(Rule::new("email", Operator::Eq, "a").is_complete());
        assert!(!Rule::new("users.", Operator::Eq, "a").is_complete());
        assert!(!Rule::new(".email", Operator::Eq, "a").is_complete());
        assert!(!Rule::new(".", Operator::Eq, "a").is_complete());
        assert!(!Rule::new("", Operator::Eq, "a").is_complete());
    }

    #[test]
    fn test_prune_removes_emptied_groups() {
        let mut group = RuleGroup::and(vec![
            RuleGroup::or(vec![Rule::new("a", Operator::Eq, "").into()]).into(),
            Rule::new("b", Operator::Eq, 1).into(),
        ]);

        group.prune();

        assert_eq!(group.rules.len(), 1);
        assert!(matches!(group.rules[0], RuleNode::Rule(_)));
    }

    #[test]
    fn test_depth() {
        let flat = RuleGroup::and(vec![Rule::new("a", Operator::Eq, 1).into()]);
        assert_eq!(flat.depth(), 1);

        let nested = RuleGroup::and(vec![
            RuleGroup::or(vec![RuleGroup::and(vec![]).into()]).into(),
        ]);
        assert_eq!(nested.depth(), 3);
    }
}
