//! Transactional unit of work with conflict retry.
//!
//! Every money-moving operation runs as one closure over a
//! [`DatabaseTransaction`]. The closure commits when it returns `Ok` and
//! rolls back when it returns `Err`, so partial effects are impossible by
//! construction. Serialization failures replay the whole closure in a fresh
//! transaction.
//!
//! The closure may be called more than once and must only touch the
//! database through the transaction it is given.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use sarraf_shared::LedgerConfig;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use tracing::{debug, warn};

use crate::error::TreasuryError;

/// Future returned by a unit-of-work closure, borrowing the transaction.
pub type TxFuture<'c, T> = Pin<Box<dyn Future<Output = Result<T, TreasuryError>> + Send + 'c>>;

/// Runs closures atomically against a connection pool.
#[derive(Debug, Clone)]
pub struct UnitOfWork {
    db: DatabaseConnection,
    policy: LedgerConfig,
}

impl UnitOfWork {
    /// Creates a unit of work with the given retry policy.
    #[must_use]
    pub const fn new(db: DatabaseConnection, policy: LedgerConfig) -> Self {
        Self { db, policy }
    }

    /// Returns the underlying connection for reads outside a transaction.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Runs `work` in a transaction, retrying on serialization failures.
    ///
    /// # Errors
    ///
    /// Returns the closure's error after rollback, or `ConcurrencyConflict`
    /// once `max_attempts` attempts have all hit serialization failures.
    pub async fn run<T, F>(&self, operation: &'static str, work: F) -> Result<T, TreasuryError>
    where
        F: for<'c> Fn(&'c DatabaseTransaction) -> TxFuture<'c, T>,
    {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;

            match self.attempt(&work).await {
                Err(err) if err.is_retryable() => {
                    if attempt >= max_attempts {
                        warn!(operation, attempts = attempt, error = %err, "giving up after serialization conflicts");
                        return Err(TreasuryError::ConcurrencyConflict { attempts: attempt });
                    }
                    warn!(operation, attempt, error = %err, "serialization conflict, retrying");
                    let backoff = self.policy.retry_backoff_ms * u64::from(attempt);
                    tokio::time::sleep(Duration::from_millis(backoff)).await;
                }
                result => return result,
            }
        }
    }

    async fn attempt<T, F>(&self, work: &F) -> Result<T, TreasuryError>
    where
        F: for<'c> Fn(&'c DatabaseTransaction) -> TxFuture<'c, T>,
    {
        let txn = self.db.begin().await?;
        let result = work(&txn).await;

        match result {
            Ok(value) => {
                txn.commit().await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = txn.rollback().await {
                    warn!(error = %rollback_err, "rollback failed");
                }
                debug!(error = %err, code = err.error_code(), "transaction rolled back");
                Err(err)
            }
        }
    }
}
