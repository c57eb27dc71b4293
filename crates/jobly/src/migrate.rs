//! Embedded schema migrations via [`refinery`].
//!
//! The SQL lives in `crates/jobly/migrations/` and is compiled into the crate.

use crate::error::JoblyResult;
use refinery::Report;

mod embedded {
    refinery::embed_migrations!("migrations");
}

/// Apply every pending migration on `client`.
pub async fn run(client: &mut tokio_postgres::Client) -> JoblyResult<Report> {
    let report = embedded::migrations::runner().run_async(client).await?;
    for migration in report.applied_migrations() {
        tracing::info!(
            target: "jobly.migrate",
            version = migration.version(),
            name = migration.name(),
            "applied migration"
        );
    }
    Ok(report)
}

/// Apply pending migrations using a pooled connection.
#[cfg(feature = "pool")]
pub async fn run_pool(pool: &deadpool_postgres::Pool) -> JoblyResult<Report> {
    let mut client = pool.get().await?;
    run(&mut client).await
}
