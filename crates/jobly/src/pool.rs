//! Connection pool construction.

use crate::config::DatabaseConfig;
use crate::error::{JoblyError, JoblyResult};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use tokio_postgres::NoTls;

/// Build a pool for the active environment's database.
///
/// ```ignore
/// let config = jobly::DatabaseConfig::from_env()?;
/// let pool = jobly::create_pool(&config)?;
/// let client = pool.get().await?;
/// ```
pub fn create_pool(config: &DatabaseConfig) -> JoblyResult<Pool> {
    create_pool_with_url(config.database_url(), config.max_pool_size)
}

pub fn create_pool_with_url(database_url: &str, max_size: usize) -> JoblyResult<Pool> {
    let pg_config: tokio_postgres::Config = database_url
        .parse()
        .map_err(|e: tokio_postgres::Error| JoblyError::Connection(e.to_string()))?;

    let manager_config = ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    };
    let mgr = Manager::from_config(pg_config, NoTls, manager_config);
    Pool::builder(mgr)
        .max_size(max_size)
        .build()
        .map_err(|e| JoblyError::Pool(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_url() {
        let err = create_pool_with_url("postgres://host:notaport/db", 2).unwrap_err();
        assert!(matches!(err, JoblyError::Connection(_)));
    }

    #[test]
    fn sizes_pool_from_config() {
        let config = DatabaseConfig {
            max_pool_size: 3,
            ..DatabaseConfig::default()
        };
        let pool = create_pool(&config).unwrap();
        assert_eq!(pool.status().max_size, 3);
    }
}
