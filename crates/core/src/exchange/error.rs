//! Trade validation errors.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::money::AmountError;

/// Errors raised while validating a buy or sale.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TradeError {
    /// A quantity or price was zero or negative.
    #[error("{field} must be positive, got {value}")]
    NonPositive {
        /// The offending field.
        field: &'static str,
        /// The value supplied.
        value: Decimal,
    },

    /// Total price does not equal value times price.
    #[error("Total price mismatch. Expected: {expected}, Got: {actual}")]
    TotalMismatch {
        /// `value * price`, rounded.
        expected: Decimal,
        /// The total supplied by the caller.
        actual: Decimal,
    },

    /// `value * price` does not fit a monetary column.
    #[error("Total of {value} at {price} is out of range")]
    TotalOverflow {
        /// Quantity of traded currency.
        value: Decimal,
        /// Rate supplied.
        price: Decimal,
    },

    /// A figure does not fit a monetary column.
    #[error(transparent)]
    Amount(#[from] AmountError),

    /// Traded and payment currency are the same.
    #[error("Traded and payment currency must be different")]
    SameCurrency,

    /// The bill counter cannot be incremented further.
    #[error("Bill number sequence exhausted for series {0}")]
    BillSequenceExhausted(&'static str),
}

impl TradeError {
    /// Returns the error code for callers.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositive { .. } => "NON_POSITIVE_AMOUNT",
            Self::TotalMismatch { .. } => "TOTAL_MISMATCH",
            Self::TotalOverflow { .. } => "AMOUNT_OUT_OF_RANGE",
            Self::Amount(err) => err.error_code(),
            Self::SameCurrency => "SAME_CURRENCY_TRADE",
            Self::BillSequenceExhausted(_) => "BILL_SEQUENCE_EXHAUSTED",
        }
    }
}
