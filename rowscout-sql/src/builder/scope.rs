//! Table alias resolution.

use std::borrow::Cow;

use super::error::CompileError;
use super::quote::quote_ident;
use super::types::JoinConfig;

/// Alias of the join at `index`.
pub(super) fn join_alias(index: usize) -> String {
    format!("j{index}")
}

/// Names visible while compiling one statement.
///
/// The primary table is reachable under `primary_alias`; the join at position
/// N under `jN`. A table name that appears more than once among the joins
/// resolves to its first occurrence.
#[derive(Debug, Clone, Copy)]
pub(super) struct Scope<'a> {
    pub(super) table: &'a str,
    pub(super) primary_alias: &'a str,
    pub(super) joins: &'a [JoinConfig],
    pub(super) normalizer: &'a str,
}

impl<'a> Scope<'a> {
    /// Alias under which `table` is reachable.
    pub(super) fn table_alias(
        &self,
        table: &str,
        context: impl FnOnce() -> String,
    ) -> Result<Cow<'a, str>, CompileError> {
        if table == self.table {
            return Ok(Cow::Borrowed(self.primary_alias));
        }
        self.joins
            .iter()
            .position(|j| j.target_table == table)
            .map(|index| Cow::Owned(join_alias(index)))
            .ok_or_else(|| CompileError::UnknownTable {
                table: table.to_string(),
                context: context(),
            })
    }

    /// Qualified, quoted column reference for a filter field.
    ///
    /// `orders.status` resolves through the join list; a bare `status`
    /// belongs to the primary table. Only the first `.` separates table
    /// from column.
    pub(super) fn column_ref(&self, field: &str) -> Result<String, CompileError> {
        match field.split_once('.') {
            Some((table, column)) => {
                let alias = self.table_alias(table, || format!("filter field {field:?}"))?;
                Ok(format!("{alias}.{}", quote_ident(column)))
            },
            None => Ok(format!("{}.{}", self.primary_alias, quote_ident(field))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::types::JoinType;

    fn joins() -> Vec<JoinConfig> {
        vec![
            JoinConfig::new(JoinType::Inner, "orders", "id", "user_id"),
            JoinConfig::new(JoinType::Left, "profiles", "id", "user_id"),
            JoinConfig::new(JoinType::Left, "orders", "id", "buyer_id"),
        ]
    }

    fn scope(joins: &[JoinConfig]) -> Scope<'_> {
        Scope {
            table: "users",
            primary_alias: "main",
            joins,
            normalizer: "unaccent",
        }
    }

    #[test]
    fn test_bare_field_uses_primary_alias() {
        let joins = joins();
        assert_eq!(scope(&joins).column_ref("email").unwrap(), "main.\"email\"");
    }

    #[test]
    fn test_primary_table_prefix() {
        let joins = joins();
        assert_eq!(
            scope(&joins).column_ref("users.email").unwrap(),
            "main.\"email\""
        );
    }

    #[test]
    fn test_join_prefix_uses_position() {
        let joins = joins();
        assert_eq!(
            scope(&joins).column_ref("profiles.bio").unwrap(),
            "j1.\"bio\""
        );
    }

    #[test]
    fn test_duplicate_join_target_resolves_to_first() {
        let joins = joins();
        assert_eq!(
            scope(&joins).column_ref("orders.total").unwrap(),
            "j0.\"total\""
        );
    }

    #[test]
    fn test_unknown_table_is_an_error() {
        let joins = joins();
        let err = scope(&joins).column_ref("payments.amount").unwrap_err();
        assert_eq!(
            err,
            CompileError::UnknownTable {
                table: "payments".into(),
                context: "filter field \"payments.amount\"".into(),
            }
        );
    }

    #[test]
    fn test_only_first_dot_splits() {
        let joins = joins();
        assert_eq!(
            scope(&joins).column_ref("users.meta.key").unwrap(),
            "main.\"meta.key\""
        );
    }

    #[test]
    fn test_self_join_prefers_primary() {
        let joins = vec![JoinConfig::new(JoinType::Inner, "users", "manager_id", "id")];
        assert_eq!(
            scope(&joins).column_ref("users.name").unwrap(),
            "main.\"name\""
        );
    }
}
