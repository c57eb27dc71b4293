//! Jobs: records, the query façade, and the input boundary.
//!
//! ```ignore
//! use jobly::{Job, JobFilter, UpdateRequest};
//!
//! let listings = Job::find_all(&client, &JobFilter::new().has_equity(true)).await?;
//! let detail = Job::get(&client, listings[0].id).await?;
//! let job = Job::update(&client, detail.id, &UpdateRequest::new().set("salary", 900)).await?;
//! Job::remove(&client, job.id).await?;
//! ```

mod input;

pub use input::{JobSearchQuery, JobUpdateInput, NewJobInput};

use super::Company;
use crate::client::GenericClient;
use crate::error::{JoblyError, JoblyResult};
use crate::filter::{JobFilter, compile_job_filter};
use crate::partial_update::{FieldMapping, UpdateRequest, sql_for_partial_update};
use crate::row::{FromRow, RowExt};
use crate::sql::sql;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

/// External field names that differ from their `jobs` column.
pub const JOB_FIELDS: FieldMapping = FieldMapping::new(&[("companyHandle", "company_handle")]);

const RETURNING_JOB: &str = " RETURNING id, title, salary, equity, company_handle";

/// A row of the `jobs` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

impl FromRow for Job {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            title: row.try_get_column("title")?,
            salary: row.try_get_column("salary")?,
            equity: row.try_get_column("equity")?,
            company_handle: row.try_get_column("company_handle")?,
        })
    }
}

/// A job as listed by [`Job::find_all`], with the owning company's name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListing {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
    pub company_name: Option<String>,
}

impl FromRow for JobListing {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            title: row.try_get_column("title")?,
            salary: row.try_get_column("salary")?,
            equity: row.try_get_column("equity")?,
            company_handle: row.try_get_column("company_handle")?,
            company_name: row.try_get_column("company_name")?,
        })
    }
}

/// A single job with its company nested under `company`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDetail {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company: Company,
}

impl FromRow for JobDetail {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            title: row.try_get_column("title")?,
            salary: row.try_get_column("salary")?,
            equity: row.try_get_column("equity")?,
            company: Company::from_row(row)?,
        })
    }
}

/// Validated attributes for [`Job::create`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewJob {
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

impl Job {
    /// Insert a job and return it with its generated id.
    #[tracing::instrument(level = "debug", skip(conn))]
    pub async fn create(conn: &impl GenericClient, new: NewJob) -> JoblyResult<Job> {
        let mut q = sql("INSERT INTO jobs (title, salary, equity, company_handle) VALUES (");
        q.push_bind(new.title)
            .push(", ")
            .push_bind(new.salary)
            .push(", ")
            .push_bind(new.equity)
            .push(", ")
            .push_bind(new.company_handle)
            .push(")")
            .push(RETURNING_JOB)
            .tag("jobs.create");
        q.fetch_one_as(conn).await
    }

    /// List jobs matching `filter`, ordered by title. An empty filter lists
    /// every job.
    #[tracing::instrument(level = "debug", skip(conn))]
    pub async fn find_all(
        conn: &impl GenericClient,
        filter: &JobFilter,
    ) -> JoblyResult<Vec<JobListing>> {
        let predicates = compile_job_filter(filter)?;

        let mut q = sql(
            "SELECT j.id, j.title, j.salary, j.equity, j.company_handle, c.name AS company_name \
             FROM jobs AS j LEFT JOIN companies AS c ON c.handle = j.company_handle",
        );
        predicates.append_where(&mut q);
        q.push(" ORDER BY j.title").tag("jobs.find_all");
        q.fetch_all_as(conn).await
    }

    /// Fetch one job with its company.
    ///
    /// Fails with [`JoblyError::NotFound`] when no job has `id`.
    #[tracing::instrument(level = "debug", skip(conn))]
    pub async fn get(conn: &impl GenericClient, id: i32) -> JoblyResult<JobDetail> {
        let mut q = sql(
            "SELECT j.id, j.title, j.salary, j.equity, \
             c.handle, c.name, c.description, c.num_employees, c.logo_url \
             FROM jobs AS j JOIN companies AS c ON c.handle = j.company_handle \
             WHERE j.id = ",
        );
        q.push_bind(id).tag("jobs.get");

        match q.fetch_opt_as(conn).await? {
            Some(job) => Ok(job),
            None => Err(missing(id)),
        }
    }

    /// Apply a partial update and return the whole updated row.
    ///
    /// An empty `request` fails with [`JoblyError::NoData`] before any
    /// statement is sent. Fails with [`JoblyError::NotFound`] when no row was
    /// updated.
    #[tracing::instrument(level = "debug", skip(conn))]
    pub async fn update(
        conn: &impl GenericClient,
        id: i32,
        request: &UpdateRequest,
    ) -> JoblyResult<Job> {
        let set = sql_for_partial_update(request, &JOB_FIELDS)?;

        let mut q = sql("UPDATE jobs SET ");
        q.push_sql(set.into_sql());
        q.push(" WHERE id = ")
            .push_bind(id)
            .push(RETURNING_JOB)
            .tag("jobs.update");

        match q.fetch_opt_as(conn).await? {
            Some(job) => Ok(job),
            None => Err(missing(id)),
        }
    }

    /// Delete a job. Fails with [`JoblyError::NotFound`] when nothing was deleted.
    #[tracing::instrument(level = "debug", skip(conn))]
    pub async fn remove(conn: &impl GenericClient, id: i32) -> JoblyResult<()> {
        let affected = sql("DELETE FROM jobs WHERE id = ")
            .bind(id)
            .tagged("jobs.remove")
            .execute(conn)
            .await?;

        if affected == 0 {
            return Err(missing(id));
        }
        Ok(())
    }
}

fn missing(id: i32) -> JoblyError {
    tracing::debug!(id, "no such job");
    JoblyError::not_found(format!("No job: {id}"))
}
