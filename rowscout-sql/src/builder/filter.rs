//! WHERE clause compilation: rule groups and single conditions.

use tracing::debug;

use super::error::CompileError;
use super::quote::quote_literal;
use super::scope::Scope;
use super::types::{Operator, Rule, RuleGroup, RuleNode, Value};
use super::value::{escape_value, ordering_literal};

/// Compile a rule group into a boolean expression.
///
/// Nested groups are wrapped in parentheses; incomplete rules and groups that
/// compile to nothing are skipped. Returns an empty string when no member
/// produced a condition.
pub(super) fn build_group(scope: &Scope<'_>, group: &RuleGroup) -> Result<String, CompileError> {
    let mut parts = Vec::with_capacity(group.rules.len());

    for node in &group.rules {
        match node {
            RuleNode::Group(nested) => {
                let sql = build_group(scope, nested)?;
                if !sql.trim().is_empty() {
                    parts.push(format!("({sql})"));
                }
            },
            RuleNode::Rule(rule) if rule.is_complete() => {
                parts.push(build_condition(scope, rule)?);
            },
            RuleNode::Rule(rule) => {
                debug!(field = %rule.field, "skipping filter rule without field or operator");
            },
        }
    }

    Ok(parts.join(group.combinator.separator()))
}

/// Compile one rule into a boolean expression.
///
/// Text comparisons are case- and accent-insensitive: the column is cast to
/// text and both sides pass through `lower` and the normalizer. Ordering
/// comparisons never normalize.
pub(super) fn build_condition(scope: &Scope<'_>, rule: &Rule) -> Result<String, CompileError> {
    let field = scope.column_ref(&rule.field)?;
    let op = rule.operator.unwrap_or(Operator::Other);
    let value = rule.value_or_null();
    let normalizer = scope.normalizer;

    let normalize = should_normalize(op, value);
    let literal_normalizer = normalize.then_some(normalizer);
    let compared = if normalize {
        normalized_column(normalizer, &field)
    } else {
        field.clone()
    };

    let sql = match op {
        Operator::Ne => format!("{compared} != {}", escape_value(value, literal_normalizer)),
        Operator::Contains => like(normalizer, &field, "%", value, "%"),
        Operator::BeginsWith => like(normalizer, &field, "", value, "%"),
        Operator::EndsWith => like(normalizer, &field, "%", value, ""),
        Operator::Null => format!("{field} IS NULL"),
        Operator::NotNull => format!("{field} IS NOT NULL"),
        Operator::In => {
            let items: Vec<String> = match value {
                Value::Array(items) => items
                    .iter()
                    .map(|v| escape_value(v, literal_normalizer))
                    .collect(),
                single => vec![escape_value(single, literal_normalizer)],
            };
            if items.is_empty() {
                // IN () is not valid SQL; an empty set matches nothing
                "1=0".to_string()
            } else {
                format!("{compared} IN ({})", items.join(", "))
            }
        },
        Operator::Lt => format!("{field} < {}", ordering_literal(value)),
        Operator::Gt => format!("{field} > {}", ordering_literal(value)),
        Operator::Lte => format!("{field} <= {}", ordering_literal(value)),
        Operator::Gte => format!("{field} >= {}", ordering_literal(value)),
        Operator::Eq | Operator::Other => {
            format!("{compared} = {}", escape_value(value, literal_normalizer))
        },
    };

    Ok(sql)
}

/// Whether the column and value are compared as normalized text.
///
/// Text-match operators always normalize and null tests never do. Otherwise a
/// non-numeric value forces a text comparison; an `in` list compares numbers
/// only when every member is numeric.
fn should_normalize(op: Operator, value: &Value) -> bool {
    if op.is_text_match() {
        return true;
    }
    if op.is_null_test() {
        return false;
    }
    let numeric = match (op, value) {
        (Operator::In, Value::Array(items)) => {
            !items.is_empty() && items.iter().all(Value::is_numeric)
        },
        _ => value.is_numeric(),
    };
    !numeric
}

fn normalized_column(normalizer: &str, field: &str) -> String {
    format!("{normalizer}(lower(CAST({field} AS TEXT)))")
}

fn like(normalizer: &str, field: &str, prefix: &str, value: &Value, suffix: &str) -> String {
    let pattern = quote_literal(&format!("{prefix}{}{suffix}", value.to_text()));
    format!(
        "{} LIKE {normalizer}(lower({pattern}))",
        normalized_column(normalizer, field)
    )
}
