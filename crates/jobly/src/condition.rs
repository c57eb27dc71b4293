//! Predicate primitives for `WHERE` clauses.
//!
//! A [`Condition`] is one comparison over a quoted column. It holds its bound
//! value (if any) but no placeholder number: numbering happens when the
//! condition is appended to a [`Sql`] builder.

use crate::error::JoblyResult;
use crate::ident::Ident;
use crate::sql::Sql;
use crate::value::SqlValue;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
enum ConditionInner {
    /// `column <op> $n`
    Bound {
        column: Ident,
        operator: &'static str,
        value: SqlValue,
    },
    /// `column <op> <literal>`; takes no parameter.
    Literal {
        column: Ident,
        operator: &'static str,
        literal: &'static str,
    },
}

/// A single predicate used by the filter compiler and the model façade.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition(ConditionInner);

impl Condition {
    fn bound(
        column: &str,
        operator: &'static str,
        value: impl Into<SqlValue>,
    ) -> JoblyResult<Self> {
        Ok(Self(ConditionInner::Bound {
            column: Ident::new(column)?,
            operator,
            value: value.into(),
        }))
    }

    /// `column >= value`
    pub fn gte(column: &str, value: impl Into<SqlValue>) -> JoblyResult<Self> {
        Self::bound(column, ">=", value)
    }

    /// `column ILIKE pattern` (case-insensitive; `%` and `_` keep their meaning).
    pub fn ilike(column: &str, pattern: impl Into<SqlValue>) -> JoblyResult<Self> {
        Self::bound(column, "ILIKE", pattern)
    }

    /// `column > 0`
    pub fn positive(column: &str) -> JoblyResult<Self> {
        Ok(Self(ConditionInner::Literal {
            column: Ident::new(column)?,
            operator: ">",
            literal: "0",
        }))
    }

    /// The value this condition binds, if it binds one.
    pub fn value(&self) -> Option<&SqlValue> {
        match &self.0 {
            ConditionInner::Bound { value, .. } => Some(value),
            ConditionInner::Literal { .. } => None,
        }
    }

    pub(crate) fn append_to_sql(&self, sql: &mut Sql) {
        match &self.0 {
            ConditionInner::Bound {
                column,
                operator,
                value,
            } => {
                sql.push_ident_ref(column)
                    .push(" ")
                    .push(operator)
                    .push(" ")
                    .push_bind_value(Arc::new(value.clone()));
            }
            ConditionInner::Literal {
                column,
                operator,
                literal,
            } => {
                sql.push_ident_ref(column)
                    .push(" ")
                    .push(operator)
                    .push(" ")
                    .push(literal);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(cond: &Condition) -> String {
        let mut sql = Sql::empty();
        sql.push_condition(cond);
        sql.to_sql()
    }

    #[test]
    fn bound_conditions_render_placeholders() {
        assert_eq!(render(&Condition::gte("salary", 100).unwrap()), r#""salary" >= $1"#);
        assert_eq!(
            render(&Condition::ilike("title", "%job%").unwrap()),
            r#""title" ILIKE $1"#
        );
    }

    #[test]
    fn literal_condition_has_no_param() {
        let cond = Condition::positive("equity").unwrap();
        let mut sql = Sql::empty();
        sql.push_condition(&cond);
        assert_eq!(sql.to_sql(), r#""equity" > 0"#);
        assert_eq!(sql.param_count(), 0);
        assert!(cond.value().is_none());
    }

    #[test]
    fn rejects_empty_column() {
        assert!(Condition::gte("", 1).is_err());
        assert!(Condition::positive("").is_err());
    }

    #[test]
    fn value_is_exposed() {
        let cond = Condition::ilike("title", "%x%").unwrap();
        assert_eq!(cond.value(), Some(&SqlValue::from("%x%")));
    }
}
