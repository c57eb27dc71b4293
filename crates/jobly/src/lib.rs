//! # jobly
//!
//! Dynamic SQL composition for the jobs service on PostgreSQL.
//!
//! ## Pieces
//!
//! - **Partial updates**: [`sql_for_partial_update`] turns an ordered
//!   [`UpdateRequest`] into `"col"=$1, "col2"=$2` plus its values, renaming
//!   fields through a [`FieldMapping`].
//! - **Search filters**: [`compile_job_filter`] turns a [`JobFilter`] into
//!   `WHERE` predicates with a fixed check order.
//! - **Query façade**: [`Job`] runs create/find_all/get/update/remove on
//!   anything implementing [`GenericClient`] (a connection, a transaction,
//!   a pooled client or a [`TracedClient`]).
//!
//! ```ignore
//! use jobly::{DatabaseConfig, Job, JobFilter, JobUpdateInput, TracedClient, create_pool};
//!
//! let pool = create_pool(&DatabaseConfig::from_env()?)?;
//! let client = TracedClient::new(pool.get().await?);
//!
//! let rich = Job::find_all(&client, &JobFilter::new().min_salary(150).has_equity(true)).await?;
//!
//! let patch: JobUpdateInput = serde_json::from_str(r#"{"salary": 900}"#)?;
//! let job = Job::update(&client, rich[0].id, &patch.try_into_patch()?).await?;
//! ```

pub mod changeset;
pub mod client;
pub mod condition;
pub mod config;
pub mod error;
pub mod filter;
pub mod ident;
pub mod models;
pub mod partial_update;
pub mod row;
pub mod sql;
pub mod traced;
pub mod value;

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "migrate")]
pub mod migrate;

pub use changeset::{ValidationCode, ValidationError, ValidationErrors};
pub use client::GenericClient;
pub use condition::Condition;
pub use config::{DatabaseConfig, Environment};
pub use error::{JoblyError, JoblyResult};
pub use filter::{FilterClause, JobFilter, compile_job_filter};
pub use ident::Ident;
pub use models::{
    Company, JOB_FIELDS, Job, JobDetail, JobListing, JobSearchQuery, JobUpdateInput, NewJob,
    NewJobInput,
};
pub use partial_update::{CompiledClause, FieldMapping, UpdateRequest, sql_for_partial_update};
pub use row::{FromRow, RowExt};
pub use sql::{Sql, sql};
pub use traced::{StatementKind, TracedClient};
pub use value::SqlValue;

#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_with_url};
