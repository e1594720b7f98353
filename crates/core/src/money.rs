//! Limits of a monetary amount.
//!
//! Every money column is `NUMERIC(19, 4)`: four decimal places and fifteen
//! integer digits. Amounts outside that shape are rejected before they reach
//! the database, so nothing is rounded or truncated on write.

use rust_decimal::Decimal;
use thiserror::Error;

/// Decimal places carried by monetary columns.
pub const MONEY_SCALE: u32 = 4;

/// Largest magnitude a monetary column holds: `999_999_999_999_999.9999`.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0x89E7_FFFF, 0x8AC7_2304, 0, false, MONEY_SCALE);

/// An amount that does not fit a monetary column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AmountError {
    /// More than four decimal places.
    #[error("{field} has more than four decimal places: {value}")]
    TooPrecise {
        /// The offending field.
        field: &'static str,
        /// The value supplied.
        value: Decimal,
    },

    /// Larger than [`MAX_AMOUNT`], or the arithmetic on it overflowed.
    #[error("{field} is out of range: {value}")]
    OutOfRange {
        /// The offending field.
        field: &'static str,
        /// The value supplied, or the operand that overflowed.
        value: Decimal,
    },
}

impl AmountError {
    /// Returns the error code for callers.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::TooPrecise { .. } => "AMOUNT_TOO_PRECISE",
            Self::OutOfRange { .. } => "AMOUNT_OUT_OF_RANGE",
        }
    }
}

/// Checks that `value` is storable in a monetary column as-is.
///
/// Trailing zeros do not count: `1.50000` has two decimal places.
///
/// # Errors
///
/// - `OutOfRange` if `|value| > MAX_AMOUNT`
/// - `TooPrecise` if it carries more than [`MONEY_SCALE`] significant decimals
pub fn check_amount(field: &'static str, value: Decimal) -> Result<Decimal, AmountError> {
    if value.abs() > MAX_AMOUNT {
        return Err(AmountError::OutOfRange { field, value });
    }
    if value.normalize().scale() > MONEY_SCALE {
        return Err(AmountError::TooPrecise { field, value });
    }
    Ok(value)
}
