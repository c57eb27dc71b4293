//! `SET` clause compiler for partial updates.
//!
//! A caller hands over the subset of fields it wants to change, in order, and
//! the entity's [`FieldMapping`]. The compiler turns that into
//! `"col_a"=$1, "col_b"=$2` plus the values in the same order:
//!
//! ```ignore
//! use jobly::{FieldMapping, UpdateRequest, sql_for_partial_update};
//!
//! const USER_FIELDS: FieldMapping = FieldMapping::new(&[("firstName", "first_name")]);
//!
//! let req = UpdateRequest::new().set("firstName", "Aliya").set("age", 32);
//! let set = sql_for_partial_update(&req, &USER_FIELDS)?;
//! assert_eq!(set.clause(), r#""first_name"=$1, "age"=$2"#);
//! ```

use crate::error::{JoblyError, JoblyResult};
use crate::ident::Ident;
use crate::sql::Sql;
use crate::value::SqlValue;
use std::sync::Arc;

/// Static table from external field names to storage column names.
///
/// Fields without an entry, or whose entry maps to an empty column, are used
/// as column names unchanged.
#[derive(Debug, Clone, Copy)]
pub struct FieldMapping {
    entries: &'static [(&'static str, &'static str)],
}

impl FieldMapping {
    pub const fn new(entries: &'static [(&'static str, &'static str)]) -> Self {
        Self { entries }
    }

    /// A mapping with no renames.
    pub const fn identity() -> Self {
        Self { entries: &[] }
    }

    pub fn column_for<'f>(&self, field: &'f str) -> &'f str {
        self.entries
            .iter()
            .find(|(name, column)| *name == field && !column.is_empty())
            .map_or(field, |(_, column)| *column)
    }
}

/// Ordered list of `(field, new value)` pairs for one partial update.
///
/// Order is significant: it decides placeholder numbering. Setting a field
/// that is already present replaces its value and keeps its original
/// position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateRequest {
    fields: Vec<(String, SqlValue)>,
}

impl UpdateRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`UpdateRequest::push`].
    pub fn set(mut self, field: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.push(field, value);
        self
    }

    pub fn push(&mut self, field: impl Into<String>, value: impl Into<SqlValue>) {
        let field = field.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((field, value)),
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&SqlValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl<K, V> FromIterator<(K, V)> for UpdateRequest
where
    K: Into<String>,
    V: Into<SqlValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut req = Self::new();
        for (field, value) in iter {
            req.push(field, value);
        }
        req
    }
}

/// A compiled clause: SQL text with placeholders numbered from `$1`, plus the
/// values that feed them in order.
#[derive(Debug)]
pub struct CompiledClause {
    sql: Sql,
    params: Vec<SqlValue>,
}

impl CompiledClause {
    fn new() -> Self {
        Self {
            sql: Sql::empty(),
            params: Vec::new(),
        }
    }

    fn push_bind(&mut self, value: SqlValue) {
        self.sql.push_bind_value(Arc::new(value.clone()));
        self.params.push(value);
    }

    /// The clause text, e.g. `"a1"=$1, "a2"=$2`.
    pub fn clause(&self) -> String {
        self.sql.to_sql()
    }

    pub fn params(&self) -> &[SqlValue] {
        &self.params
    }

    pub fn placeholder_count(&self) -> usize {
        self.sql.placeholder_count()
    }

    /// Hand the clause to a larger statement. Placeholders are renumbered to
    /// follow whatever the outer statement already binds.
    pub fn into_sql(self) -> Sql {
        self.sql
    }
}

/// Compile an [`UpdateRequest`] into a `SET` assignment list.
///
/// Fails with [`JoblyError::NoData`] when the request is empty: an empty `SET`
/// is invalid SQL and must never reach the database.
pub fn sql_for_partial_update(
    request: &UpdateRequest,
    mapping: &FieldMapping,
) -> JoblyResult<CompiledClause> {
    if request.is_empty() {
        return Err(JoblyError::NoData);
    }

    let mut out = CompiledClause::new();
    for (i, (field, value)) in request.iter().enumerate() {
        if i > 0 {
            out.sql.push(", ");
        }
        let column = Ident::new(mapping.column_for(field))?;
        out.sql.push_ident_ref(&column).push("=");
        out.push_bind(value.clone());
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAPPING_A: FieldMapping = FieldMapping::new(&[("a1", "a1"), ("aA2", "a2")]);
    const MAPPING_B: FieldMapping = FieldMapping::new(&[("aA2", "a2")]);

    #[test]
    fn updates_one_item() {
        let req = UpdateRequest::new().set("a1", "b1");
        let set = sql_for_partial_update(&req, &MAPPING_A).unwrap();
        assert_eq!(set.clause(), r#""a1"=$1"#);
        assert_eq!(set.params(), &[SqlValue::from("b1")]);
    }

    #[test]
    fn updates_two_items_with_fallback() {
        let req = UpdateRequest::new().set("a1", "b1").set("aA2", "b2");
        let set = sql_for_partial_update(&req, &MAPPING_B).unwrap();
        assert_eq!(set.clause(), r#""a1"=$1, "a2"=$2"#);
        assert_eq!(set.params(), &[SqlValue::from("b1"), SqlValue::from("b2")]);
    }

    #[test]
    fn empty_mapped_column_falls_back_to_field() {
        const BLANK: FieldMapping = FieldMapping::new(&[("title", ""), ("aA2", "a2")]);
        assert_eq!(BLANK.column_for("title"), "title");

        let req = UpdateRequest::new().set("title", "x").set("aA2", 2);
        let set = sql_for_partial_update(&req, &BLANK).unwrap();
        assert_eq!(set.clause(), r#""title"=$1, "a2"=$2"#);
    }

    #[test]
    fn empty_request_is_no_data_for_any_mapping() {
        for mapping in [MAPPING_A, MAPPING_B, FieldMapping::identity()] {
            let err = sql_for_partial_update(&UpdateRequest::new(), &mapping).unwrap_err();
            assert!(err.is_no_data());
        }
    }

    #[test]
    fn placeholder_count_matches_params_in_key_order() {
        let fields = ["zeta", "alpha", "mid", "companyHandle", "b"];
        for n in 1..=fields.len() {
            let req: UpdateRequest = fields[..n]
                .iter()
                .enumerate()
                .map(|(i, f)| (*f, i as i32))
                .collect();
            let set = sql_for_partial_update(&req, &FieldMapping::identity()).unwrap();

            assert_eq!(set.placeholder_count(), n);
            assert_eq!(set.params().len(), n);
            let expected: Vec<SqlValue> = (0..n as i32).map(SqlValue::from).collect();
            assert_eq!(set.params(), expected.as_slice());

            let clause = set.clause();
            let expected_clause = fields[..n]
                .iter()
                .enumerate()
                .map(|(i, f)| format!("\"{f}\"=${}", i + 1))
                .collect::<Vec<_>>()
                .join(", ");
            assert_eq!(clause, expected_clause);
        }
    }

    #[test]
    fn repeated_field_keeps_first_position() {
        let req = UpdateRequest::new()
            .set("title", "a")
            .set("salary", 1)
            .set("title", "b");
        let set = sql_for_partial_update(&req, &FieldMapping::identity()).unwrap();
        assert_eq!(set.clause(), r#""title"=$1, "salary"=$2"#);
        assert_eq!(set.params(), &[SqlValue::from("b"), SqlValue::from(1)]);
    }

    #[test]
    fn columns_are_quoted_even_when_reserved() {
        let req = UpdateRequest::new().set("order", 1).set("user", "x");
        let set = sql_for_partial_update(&req, &FieldMapping::identity()).unwrap();
        assert_eq!(set.clause(), r#""order"=$1, "user"=$2"#);
    }

    #[test]
    fn null_values_are_bound_not_inlined() {
        let req = UpdateRequest::new().set("salary", None::<i32>);
        let set = sql_for_partial_update(&req, &FieldMapping::identity()).unwrap();
        assert_eq!(set.clause(), r#""salary"=$1"#);
        assert_eq!(set.params(), &[SqlValue::Null]);
    }

    #[test]
    fn values_never_appear_in_clause_text() {
        let req = UpdateRequest::new().set("title", "'; DROP TABLE jobs; --");
        let set = sql_for_partial_update(&req, &FieldMapping::identity()).unwrap();
        assert_eq!(set.clause(), r#""title"=$1"#);
    }

    #[test]
    fn clause_renumbers_when_embedded() {
        let req = UpdateRequest::new().set("title", "x").set("salary", 5);
        let set = sql_for_partial_update(&req, &FieldMapping::identity()).unwrap();

        let mut q = Sql::new("UPDATE t SET flag = ");
        q.push_bind(true).push(", ").push_sql(set.into_sql());
        q.push(" WHERE id = ").push_bind(1_i32);
        assert_eq!(
            q.to_sql(),
            r#"UPDATE t SET flag = $1, "title"=$2, "salary"=$3 WHERE id = $4"#
        );
        assert_eq!(q.param_count(), 4);
    }
}
