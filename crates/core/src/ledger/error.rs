//! Ledger error types for balance mutations.

use rust_decimal::Decimal;
use sarraf_shared::types::CurrencyId;
use thiserror::Error;

use crate::money::AmountError;

/// Errors that can occur while computing a balance mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// A credit would drive the currency balance below zero.
    #[error("Insufficient funds in currency {currency_id}: required {required}, available {available}")]
    InsufficientFunds {
        /// The currency being credited.
        currency_id: CurrencyId,
        /// Amount the mutation tried to take out.
        required: Decimal,
        /// Amount available to cover it.
        available: Decimal,
    },

    /// Mutation amounts cannot be negative.
    #[error("Mutation amounts cannot be negative. Credit: {credit}, Debit: {debit}")]
    NegativeAmount {
        /// Requested credit.
        credit: Decimal,
        /// Requested debit.
        debit: Decimal,
    },

    /// An amount or the resulting balance does not fit a monetary column.
    #[error(transparent)]
    Amount(#[from] AmountError),
}

impl LedgerError {
    /// Returns the error code for callers.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            Self::NegativeAmount { .. } => "NEGATIVE_AMOUNT",
            Self::Amount(err) => err.error_code(),
        }
    }
}
