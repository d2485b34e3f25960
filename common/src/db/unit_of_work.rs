// Request-scoped unit of work over a single database transaction

use crate::errors::DatabaseError;
use sqlx::{PgConnection, Postgres, Transaction};
use std::fmt;
use tracing::instrument;

/// A single-use transactional handle bound to one request.
///
/// Nothing is committed unless [`UnitOfWork::commit`] is called. Dropping the
/// handle on any other path, including cancellation of the owning future,
/// rolls the transaction back and returns the connection to the pool.
pub struct UnitOfWork {
    tx: Transaction<'static, Postgres>,
}

impl fmt::Debug for UnitOfWork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnitOfWork").finish_non_exhaustive()
    }
}

impl UnitOfWork {
    pub(crate) fn new(tx: Transaction<'static, Postgres>) -> Self {
        Self { tx }
    }

    /// Connection of the open transaction, for repositories
    pub fn conn(&mut self) -> &mut PgConnection {
        &mut self.tx
    }

    /// Commit all pending writes and release the connection
    #[instrument(skip(self))]
    pub async fn commit(self) -> Result<(), DatabaseError> {
        self.tx.commit().await.map_err(|e| {
            tracing::error!(error = %e, "Commit failed");
            match DatabaseError::from(e) {
                DatabaseError::QueryFailed(msg) => DatabaseError::TransactionFailed(msg),
                other => other,
            }
        })?;

        tracing::debug!("Unit of work committed");
        Ok(())
    }

    /// Discard all pending writes and release the connection
    #[instrument(skip(self))]
    pub async fn rollback(self) -> Result<(), DatabaseError> {
        self.tx.rollback().await.map_err(|e| {
            tracing::error!(error = %e, "Rollback failed");
            DatabaseError::TransactionFailed(e.to_string())
        })?;

        tracing::debug!("Unit of work rolled back");
        Ok(())
    }
}
