//! `WHERE` clause compiler for job searches.
//!
//! [`JobFilter`] has three independent, optional members. Each present member
//! contributes one predicate, always checked in the same order (minimum
//! salary, equity, title) so that a given filter compiles to byte-identical
//! SQL and parameters on every call.

use crate::condition::Condition;
use crate::error::JoblyResult;
use crate::sql::Sql;
use crate::value::SqlValue;
use serde::{Deserialize, Serialize};

/// Typed search criteria for jobs.
///
/// Values are already coerced (see [`JobSearchQuery`](crate::models::job::JobSearchQuery)
/// for the string-typed query-string boundary).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobFilter {
    /// Case-insensitive substring of the title.
    pub title: Option<String>,
    /// Inclusive lower bound on salary.
    pub min_salary: Option<i32>,
    /// `Some(true)` keeps only jobs with equity above zero. `Some(false)` is
    /// the same as `None`: no constraint.
    pub has_equity: Option<bool>,
}

impl JobFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn min_salary(mut self, min_salary: i32) -> Self {
        self.min_salary = Some(min_salary);
        self
    }

    pub fn has_equity(mut self, has_equity: bool) -> Self {
        self.has_equity = Some(has_equity);
        self
    }
}

/// Predicates compiled from a [`JobFilter`], in check order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterClause {
    conditions: Vec<Condition>,
}

impl FilterClause {
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// No predicates: the caller must not emit `WHERE` at all.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Predicates joined with ` AND `, placeholders numbered from `$1`.
    pub fn clause(&self) -> String {
        let mut sql = Sql::empty();
        sql.push_conditions_and(&self.conditions);
        sql.to_sql()
    }

    /// Bound values in placeholder order.
    pub fn params(&self) -> Vec<SqlValue> {
        self.conditions
            .iter()
            .filter_map(Condition::value)
            .cloned()
            .collect()
    }

    /// Append ` WHERE <predicates>` to `sql`, numbering after its existing
    /// placeholders. Does nothing when there are no predicates.
    pub fn append_where(&self, sql: &mut Sql) {
        sql.push_where_and(&self.conditions);
    }
}

/// Compile a [`JobFilter`] into predicates over the `jobs` columns.
pub fn compile_job_filter(filter: &JobFilter) -> JoblyResult<FilterClause> {
    let mut conditions = Vec::with_capacity(3);

    if let Some(min_salary) = filter.min_salary {
        conditions.push(Condition::gte("salary", min_salary)?);
    }

    if filter.has_equity == Some(true) {
        conditions.push(Condition::positive("equity")?);
    }

    if let Some(title) = &filter.title {
        conditions.push(Condition::ilike("title", format!("%{title}%"))?);
    }

    Ok(FilterClause { conditions })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_filters() -> Vec<JobFilter> {
        let mut out = Vec::new();
        for title in [None, Some("job")] {
            for min_salary in [None, Some(150)] {
                for has_equity in [None, Some(false), Some(true)] {
                    out.push(JobFilter {
                        title: title.map(str::to_string),
                        min_salary,
                        has_equity,
                    });
                }
            }
        }
        out
    }

    #[test]
    fn empty_filter_has_no_predicates() {
        let clause = compile_job_filter(&JobFilter::new()).unwrap();
        assert!(clause.is_empty());
        assert_eq!(clause.clause(), "");
        assert!(clause.params().is_empty());

        let mut q = Sql::new("SELECT * FROM jobs");
        clause.append_where(&mut q);
        assert_eq!(q.to_sql(), "SELECT * FROM jobs");
    }

    #[test]
    fn min_salary_predicate() {
        let clause = compile_job_filter(&JobFilter::new().min_salary(215)).unwrap();
        assert_eq!(clause.clause(), r#""salary" >= $1"#);
        assert_eq!(clause.params(), vec![SqlValue::Int(215)]);
    }

    #[test]
    fn equity_true_is_literal_comparison() {
        let clause = compile_job_filter(&JobFilter::new().has_equity(true)).unwrap();
        assert_eq!(clause.clause(), r#""equity" > 0"#);
        assert!(clause.params().is_empty());
    }

    #[test]
    fn equity_false_is_ignored() {
        let clause = compile_job_filter(&JobFilter::new().has_equity(false)).unwrap();
        assert!(clause.is_empty());
    }

    #[test]
    fn title_is_wrapped_for_substring_match() {
        let clause = compile_job_filter(&JobFilter::new().title("job1")).unwrap();
        assert_eq!(clause.clause(), r#""title" ILIKE $1"#);
        assert_eq!(clause.params(), vec![SqlValue::from("%job1%")]);
    }

    #[test]
    fn all_members_in_fixed_order() {
        let filter = JobFilter::new().title("eng").has_equity(true).min_salary(100);
        let clause = compile_job_filter(&filter).unwrap();
        assert_eq!(
            clause.clause(),
            r#""salary" >= $1 AND "equity" > 0 AND "title" ILIKE $2"#
        );
        assert_eq!(
            clause.params(),
            vec![SqlValue::Int(100), SqlValue::from("%eng%")]
        );
    }

    #[test]
    fn compiling_twice_is_identical() {
        for filter in all_filters() {
            let a = compile_job_filter(&filter).unwrap();
            let b = compile_job_filter(&filter).unwrap();
            assert_eq!(a.clause(), b.clause());
            assert_eq!(a.params(), b.params());
        }
    }

    #[test]
    fn placeholders_match_params() {
        for filter in all_filters() {
            let clause = compile_job_filter(&filter).unwrap();
            assert_eq!(clause.clause().matches('$').count(), clause.params().len());
        }
    }

    #[test]
    fn adding_constraints_keeps_existing_predicates() {
        let filters = all_filters();
        for narrow in &filters {
            for wide in &filters {
                let implied = (wide.title.is_none() || wide.title == narrow.title)
                    && (wide.min_salary.is_none() || wide.min_salary == narrow.min_salary)
                    && (wide.has_equity != Some(true) || narrow.has_equity == Some(true));
                if !implied {
                    continue;
                }
                let wide_clause = compile_job_filter(wide).unwrap();
                let narrow_clause = compile_job_filter(narrow).unwrap();
                for cond in wide_clause.conditions() {
                    assert!(
                        narrow_clause.conditions().contains(cond),
                        "{narrow:?} lost {cond:?} from {wide:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn renumbers_after_outer_params() {
        let clause = compile_job_filter(&JobFilter::new().min_salary(1).title("x")).unwrap();
        let mut q = Sql::new("SELECT * FROM jobs WHERE company_handle = ");
        q.push_bind("c1");
        q.push(" AND ");
        q.push_conditions_and(clause.conditions());
        assert_eq!(
            q.to_sql(),
            r#"SELECT * FROM jobs WHERE company_handle = $1 AND "salary" >= $2 AND "title" ILIKE $3"#
        );
    }
}
