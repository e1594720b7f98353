//! Buy and sale rules.
//!
//! A trade has two currency legs:
//! - the traded currency, moved by `value`
//! - the payment currency, moved by `total_price`
//!
//! A buy takes the traded currency in and pays out the payment currency. A
//! sale is the mirror image.

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use sarraf_shared::types::CurrencyId;
use serde::{Deserialize, Serialize};

use crate::exchange::error::TradeError;
use crate::ledger::BalanceMutation;
use crate::money::{MONEY_SCALE, check_amount};

/// Which side of the counter the trade is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeSide {
    /// We buy foreign currency from a customer.
    Buy,
    /// We sell foreign currency to a customer.
    Sale,
}

impl TradeSide {
    /// Returns the bill series key of this side.
    #[must_use]
    pub const fn series(self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sale => "SALE",
        }
    }

    const fn verb(self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sale => "sale",
        }
    }

    /// Computes the two balance mutations for validated terms.
    #[must_use]
    pub fn legs(self, terms: &TradeTerms) -> TradeLegs {
        match self {
            Self::Buy => TradeLegs {
                traded: BalanceMutation::debit(terms.value),
                payment: BalanceMutation::credit(terms.total_price),
            },
            Self::Sale => TradeLegs {
                traded: BalanceMutation::credit(terms.value),
                payment: BalanceMutation::debit(terms.total_price),
            },
        }
    }

    /// Journal statement for the traded-currency leg.
    #[must_use]
    pub fn traded_statement(self, value: Decimal, currency_code: &str, bill_number: i64) -> String {
        let label = match self {
            Self::Buy => "Buy",
            Self::Sale => "Sale",
        };
        format!("{label} {} {currency_code} - Bill #{bill_number}", value.normalize())
    }

    /// Journal statement for the payment-currency leg.
    #[must_use]
    pub fn payment_statement(self, value: Decimal, currency_code: &str, bill_number: i64) -> String {
        format!(
            "Payment for {} {} {currency_code} - Bill #{bill_number}",
            self.verb(),
            value.normalize()
        )
    }
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.series())
    }
}

/// The balance mutations produced by one trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradeLegs {
    /// Mutation on the traded currency.
    pub traded: BalanceMutation,
    /// Mutation on the payment currency.
    pub payment: BalanceMutation,
}

/// The figures of a buy or sale as entered at the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeTerms {
    /// Currency being bought or sold.
    pub traded_currency_id: CurrencyId,
    /// Currency the customer pays or is paid in.
    pub payment_currency_id: CurrencyId,
    /// Quantity of traded currency.
    pub value: Decimal,
    /// Rate in payment currency per unit of traded currency.
    pub price: Decimal,
    /// `value * price`, in payment currency.
    pub total_price: Decimal,
}

impl TradeTerms {
    /// Validates the terms.
    ///
    /// # Errors
    ///
    /// - `NonPositive` if value, price or total is not positive
    /// - `Amount` if a figure has more than four decimals or is out of range
    /// - `TotalOverflow` if `value * price` is out of range
    /// - `TotalMismatch` if the total is not `value * price` at money scale
    /// - `SameCurrency` if both legs name the same currency
    pub fn validate(&self) -> Result<(), TradeError> {
        for (field, value) in [
            ("value", self.value),
            ("price", self.price),
            ("total_price", self.total_price),
        ] {
            if value <= Decimal::ZERO {
                return Err(TradeError::NonPositive { field, value });
            }
            check_amount(field, value)?;
        }

        let expected = expected_total(self.value, self.price)?;
        if expected != self.total_price {
            return Err(TradeError::TotalMismatch {
                expected,
                actual: self.total_price,
            });
        }

        if self.traded_currency_id == self.payment_currency_id {
            return Err(TradeError::SameCurrency);
        }

        Ok(())
    }
}

/// Computes `value * price` at money scale.
///
/// Uses banker's rounding (round half to even) to minimize cumulative errors.
///
/// # Errors
///
/// Returns `TotalOverflow` if the product does not fit a monetary column.
pub fn expected_total(value: Decimal, price: Decimal) -> Result<Decimal, TradeError> {
    value
        .checked_mul(price)
        .map(|total| total.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointNearestEven))
        .filter(|total| check_amount("total_price", *total).is_ok())
        .ok_or(TradeError::TotalOverflow { value, price })
}

/// Returns the bill number following `last` in a series.
///
/// # Errors
///
/// Returns `BillSequenceExhausted` on overflow.
pub fn next_bill_number(side: TradeSide, last: i64) -> Result<i64, TradeError> {
    last.checked_add(1)
        .ok_or(TradeError::BillSequenceExhausted(side.series()))
}
