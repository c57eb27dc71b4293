//! Statement logging through `tracing`.
//!
//! [`TracedClient`] wraps any [`GenericClient`] and emits one event per
//! statement on the `jobly.sql` target before it runs, and a `warn` event with
//! the elapsed time when it fails. Bound values are never logged, only their
//! count.
//!
//! ```ignore
//! let client = TracedClient::new(pool.get().await?).max_sql_length(120);
//! let jobs = Job::find_all(&client, &JobFilter::new()).await?;
//! ```

use crate::client::GenericClient;
use crate::error::JoblyResult;
use std::time::Instant;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;
use tracing::Level;

/// Kind of statement, detected from its leading keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
    Other,
}

impl StatementKind {
    pub fn from_sql(sql: &str) -> Self {
        let keyword = sql
            .trim_start()
            .split(|c: char| c.is_whitespace() || c == '(')
            .next()
            .unwrap_or("");
        if keyword.eq_ignore_ascii_case("SELECT") {
            StatementKind::Select
        } else if keyword.eq_ignore_ascii_case("INSERT") {
            StatementKind::Insert
        } else if keyword.eq_ignore_ascii_case("UPDATE") {
            StatementKind::Update
        } else if keyword.eq_ignore_ascii_case("DELETE") {
            StatementKind::Delete
        } else {
            StatementKind::Other
        }
    }
}

/// Cut `sql` to at most `max_bytes`, backing off to a char boundary.
pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

/// A [`GenericClient`] that logs every statement it forwards.
#[derive(Debug, Clone)]
pub struct TracedClient<C> {
    inner: C,
    level: Level,
    max_sql_length: Option<usize>,
}

impl<C: GenericClient> TracedClient<C> {
    /// Wrap `inner`, logging at `DEBUG` and truncating SQL past 200 bytes.
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            level: Level::DEBUG,
            max_sql_length: Some(200),
        }
    }

    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn into_inner(self) -> C {
        self.inner
    }

    fn display_sql(&self, sql: &str) -> String {
        match self.max_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
            _ => sql.to_string(),
        }
    }

    fn before(&self, tag: Option<&str>, sql: &str, param_count: usize) {
        macro_rules! emit_at_level {
            ($level:expr, $($field:tt)*) => {
                match $level {
                    Level::ERROR => tracing::error!($($field)*),
                    Level::WARN  => tracing::warn!($($field)*),
                    Level::INFO  => tracing::info!($($field)*),
                    Level::DEBUG => tracing::debug!($($field)*),
                    Level::TRACE => tracing::trace!($($field)*),
                }
            };
        }

        let tag = tag.unwrap_or("-");
        let shown = self.display_sql(sql);
        emit_at_level!(
            self.level,
            target: "jobly.sql",
            kind = ?StatementKind::from_sql(sql),
            tag,
            param_count,
            sql = %shown,
        );
    }

    fn after<T>(&self, tag: Option<&str>, started: Instant, result: &JoblyResult<T>) {
        if let Err(err) = result {
            tracing::warn!(
                target: "jobly.sql",
                tag = tag.unwrap_or("-"),
                elapsed_ms = started.elapsed().as_millis() as u64,
                error = %err,
                "statement failed"
            );
        }
    }
}

impl<C: GenericClient> GenericClient for TracedClient<C> {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> JoblyResult<Vec<Row>> {
        self.before(None, sql, params.len());
        let started = Instant::now();
        let result = self.inner.query(sql, params).await;
        self.after(None, started, &result);
        result
    }

    async fn query_tagged(
        &self,
        tag: &str,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> JoblyResult<Vec<Row>> {
        self.before(Some(tag), sql, params.len());
        let started = Instant::now();
        let result = self.inner.query_tagged(tag, sql, params).await;
        self.after(Some(tag), started, &result);
        result
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> JoblyResult<u64> {
        self.before(None, sql, params.len());
        let started = Instant::now();
        let result = self.inner.execute(sql, params).await;
        self.after(None, started, &result);
        result
    }

    async fn execute_tagged(
        &self,
        tag: &str,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> JoblyResult<u64> {
        self.before(Some(tag), sql, params.len());
        let started = Instant::now();
        let result = self.inner.execute_tagged(tag, sql, params).await;
        self.after(Some(tag), started, &result);
        result
    }
}
