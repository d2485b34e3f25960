// PostgreSQL connection pool and unit-of-work factory

use crate::config::Settings;
use crate::db::schema;
use crate::db::unit_of_work::UnitOfWork;
use crate::errors::DatabaseError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{info, instrument};

/// Database connection pool wrapper.
///
/// One instance is built at process start and cloned into request handlers;
/// clones share the same underlying pool.
#[derive(Debug, Clone)]
pub struct DbPool {
    pool: PgPool,
}

impl DbPool {
    /// Create the process-wide connection pool.
    ///
    /// Connections are opened on first use, so unreachable stores surface on
    /// [`DbPool::ensure_schema`] or [`DbPool::begin`] rather than here.
    /// `settings.debug` only switches SQL statement logging on.
    #[instrument(skip(settings), fields(
        url = %settings.redacted_database_url(),
        max_connections = settings.db_max_connections,
        debug = settings.debug,
    ))]
    pub fn connect(settings: &Settings) -> Self {
        let pool = PgPoolOptions::new()
            .max_connections(settings.db_max_connections)
            .connect_lazy_with(settings.connect_options());

        info!("Database connection pool initialized");
        Self { pool }
    }

    /// Wrap an already configured pool
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Acquire a request-scoped unit of work.
    ///
    /// Suspends while the pool is exhausted. Any failure to obtain a
    /// connection and open the transaction is a connection error; it is not
    /// retried.
    #[instrument(skip(self))]
    pub async fn begin(&self) -> Result<UnitOfWork, DatabaseError> {
        let tx = self.pool.begin().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to acquire unit of work");
            DatabaseError::Connection(e.to_string())
        })?;

        tracing::debug!("Unit of work acquired");
        Ok(UnitOfWork::new(tx))
    }

    /// Create any missing tables. Existing tables are left untouched.
    #[instrument(skip(self))]
    pub async fn ensure_schema(&self) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to connect for schema setup");
            DatabaseError::Connection(e.to_string())
        })?;

        for statement in schema::STATEMENTS {
            sqlx::query(statement)
                .execute(&mut *tx)
                .await
                .map_err(|e| DatabaseError::SchemaFailed(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| DatabaseError::SchemaFailed(e.to_string()))?;

        info!(statements = schema::STATEMENTS.len(), "Database schema ensured");
        Ok(())
    }

    /// Perform a health check on the database connection
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Database health check failed");
                DatabaseError::HealthCheckFailed(e.to_string())
            })?;

        tracing::debug!("Database health check passed");
        Ok(())
    }

    /// Get the current number of connections in the pool
    pub fn size(&self) -> u32 {
        self.pool.size()
    }

    /// Get the number of idle connections in the pool
    pub fn num_idle(&self) -> usize {
        self.pool.num_idle()
    }

    /// Close the connection pool gracefully
    #[instrument(skip(self))]
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
        info!("Database connection pool closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn unreachable_pool() -> DbPool {
        let options = sqlx::postgres::PgConnectOptions::new()
            .host("127.0.0.1")
            .port(1)
            .username("nobody")
            .database("nowhere");
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_millis(500))
            .connect_lazy_with(options);
        DbPool::from_pool(pool)
    }

    #[tokio::test]
    async fn test_lazy_pool_starts_empty() {
        let pool = unreachable_pool();
        assert_eq!(pool.size(), 0);
        assert_eq!(pool.num_idle(), 0);
    }

    #[tokio::test]
    async fn test_begin_against_unreachable_store_is_connection_error() {
        let pool = unreachable_pool();
        let err = pool.begin().await.err().expect("begin should fail");
        assert!(err.is_connection());
    }

    #[tokio::test]
    async fn test_ensure_schema_against_unreachable_store_fails() {
        let pool = unreachable_pool();
        let err = pool.ensure_schema().await.err().expect("schema setup should fail");
        assert!(err.is_connection());
    }

    #[tokio::test]
    async fn test_health_check_against_unreachable_store_fails() {
        let pool = unreachable_pool();
        assert!(pool.health_check().await.is_err());
    }
}
