//! Dynamic SQL builder.
//!
//! [`Sql`] keeps SQL text and bound values apart and only numbers the
//! placeholders (`$1, $2, ...`) when the statement is rendered. Fragments
//! built independently, such as a compiled `SET` list or a filter's `WHERE`
//! predicates, can therefore be spliced into a larger statement and pick up
//! the right positions automatically.
//!
//! # Example
//!
//! ```ignore
//! use jobly::sql;
//!
//! let mut q = sql("SELECT id, title FROM jobs");
//! if let Some(min) = min_salary {
//!     q.push(" WHERE salary >= ").push_bind(min);
//! }
//! q.push(" ORDER BY title");
//!
//! let jobs: Vec<Job> = q.fetch_all_as(&conn).await?;
//! ```

mod builder;
mod parts;


pub use builder::Sql;

/// Start building a SQL statement.
pub fn sql(initial_sql: impl Into<String>) -> Sql {
    Sql::new(initial_sql)
}
