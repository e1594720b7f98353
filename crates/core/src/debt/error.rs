//! Debt state machine errors.

use rust_decimal::Decimal;
use sarraf_shared::types::DebtId;
use thiserror::Error;

use super::types::DebtStatus;
use crate::money::AmountError;

/// Errors raised by the debt lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DebtError {
    /// Debt amount must be positive.
    #[error("Debt amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// The debt is already PAID or RECEIVED.
    #[error("Debt {0} is already settled")]
    AlreadySettled(DebtId),

    /// Payment is not positive or exceeds what is outstanding.
    #[error("Invalid payment amount {amount}, remaining {remaining}")]
    InvalidPaymentAmount {
        /// The requested payment.
        amount: Decimal,
        /// The outstanding amount.
        remaining: Decimal,
    },

    /// An amount does not fit a monetary column.
    #[error(transparent)]
    Amount(#[from] AmountError),

    /// Operation requires an ACTIVE debt.
    #[error("Debt {id} is {status}, only ACTIVE debts can be deleted")]
    NotActive {
        /// The debt.
        id: DebtId,
        /// Its current status.
        status: DebtStatus,
    },
}

impl DebtError {
    /// Returns the error code for callers.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositiveAmount(_) => "NON_POSITIVE_AMOUNT",
            Self::AlreadySettled(_) => "ALREADY_SETTLED",
            Self::InvalidPaymentAmount { .. } => "INVALID_PAYMENT_AMOUNT",
            Self::NotActive { .. } => "NOT_ACTIVE",
            Self::Amount(err) => err.error_code(),
        }
    }
}
