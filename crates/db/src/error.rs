//! Error type of the treasury engine.
//!
//! Every operation exposed by this crate fails with a [`TreasuryError`].
//! Errors from the pure rules in `sarraf-core` convert into it with `From`.

use rust_decimal::Decimal;
use sarraf_core::debt::DebtError;
use sarraf_core::exchange::TradeError;
use sarraf_core::ledger::LedgerError;
use sarraf_core::money::AmountError;
use sarraf_shared::types::{CurrencyId, DebtId};
use sea_orm::{DbErr, RuntimeErr};
use thiserror::Error;
use uuid::Uuid;

/// SQLSTATE codes worth retrying: `40001` serialization_failure, `40P01` deadlock_detected.
const RETRYABLE_CODES: &[&str] = &["40001", "40P01"];

/// Errors returned by treasury operations.
#[derive(Debug, Error)]
pub enum TreasuryError {
    /// A credit would drive a currency balance negative.
    #[error("Insufficient funds in currency {currency_id}: required {required}, available {available}")]
    InsufficientFunds {
        /// The currency that would be overdrawn.
        currency_id: CurrencyId,
        /// Amount the operation needs to take out.
        required: Decimal,
        /// Amount available.
        available: Decimal,
    },

    /// A referenced record does not exist or is deleted.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of record.
        entity: &'static str,
        /// The id looked up.
        id: Uuid,
    },

    /// Malformed or missing input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Payment attempted on a PAID or RECEIVED debt.
    #[error("Debt {0} is already settled")]
    AlreadySettled(DebtId),

    /// Payment amount not positive or above the remaining amount.
    #[error("Invalid payment amount {amount}, remaining {remaining}")]
    InvalidPaymentAmount {
        /// The requested payment.
        amount: Decimal,
        /// The outstanding amount.
        remaining: Decimal,
    },

    /// Debt is no longer ACTIVE.
    #[error("Debt {0} is not active")]
    NotActive(DebtId),

    /// Serialization conflicts persisted through every retry.
    #[error("Concurrency conflict persisted after {attempts} attempts")]
    ConcurrencyConflict {
        /// Attempts made.
        attempts: u32,
    },

    /// A currency holding a balance cannot be deleted.
    #[error("Currency {currency_id} still holds {balance}")]
    CurrencyNotEmpty {
        /// The currency.
        currency_id: CurrencyId,
        /// Its balance.
        balance: Decimal,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl TreasuryError {
    /// Shorthand for a missing record.
    pub fn not_found(entity: &'static str, id: impl Into<Uuid>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Returns the error code for callers.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::AlreadySettled(_) => "ALREADY_SETTLED",
            Self::InvalidPaymentAmount { .. } => "INVALID_PAYMENT_AMOUNT",
            Self::NotActive(_) => "NOT_ACTIVE",
            Self::ConcurrencyConflict { .. } => "CONCURRENCY_CONFLICT",
            Self::CurrencyNotEmpty { .. } => "CURRENCY_NOT_EMPTY",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns true if replaying the operation may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Database(err) => is_serialization_failure(err),
            _ => false,
        }
    }
}

/// Returns true if the driver reported a serialization failure or deadlock.
fn is_serialization_failure(err: &DbErr) -> bool {
    let runtime = match err {
        DbErr::Conn(runtime) | DbErr::Exec(runtime) | DbErr::Query(runtime) => runtime,
        _ => return false,
    };

    match runtime {
        RuntimeErr::SqlxError(sqlx::Error::Database(db_err)) => db_err
            .code()
            .is_some_and(|code| RETRYABLE_CODES.contains(&code.as_ref())),
        _ => false,
    }
}

impl From<LedgerError> for TreasuryError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InsufficientFunds {
                currency_id,
                required,
                available,
            } => Self::InsufficientFunds {
                currency_id,
                required,
                available,
            },
            LedgerError::NegativeAmount { .. } | LedgerError::Amount(_) => {
                Self::InvalidInput(err.to_string())
            }
        }
    }
}

impl From<AmountError> for TreasuryError {
    fn from(err: AmountError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl From<TradeError> for TreasuryError {
    fn from(err: TradeError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl From<DebtError> for TreasuryError {
    fn from(err: DebtError) -> Self {
        match err {
            DebtError::NonPositiveAmount(_) | DebtError::Amount(_) => {
                Self::InvalidInput(err.to_string())
            }
            DebtError::AlreadySettled(id) => Self::AlreadySettled(id),
            DebtError::InvalidPaymentAmount { amount, remaining } => {
                Self::InvalidPaymentAmount { amount, remaining }
            }
            DebtError::NotActive { id, .. } => Self::NotActive(id),
        }
    }
}
