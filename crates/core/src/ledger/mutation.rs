//! Balance mutation arithmetic.
//!
//! Ledger convention is a cash drawer, not a T-account:
//! - credit = money leaving, the balance decreases
//! - debit = money entering, the balance increases
//!
//! `final = open - credit + debit`, and the final balance may never be negative.

use rust_decimal::Decimal;
use sarraf_shared::types::CurrencyId;
use serde::{Deserialize, Serialize};

use super::error::LedgerError;
use crate::money::{AmountError, check_amount};

/// A requested change to one currency balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceMutation {
    /// Amount subtracted from the balance.
    pub credit: Decimal,
    /// Amount added to the balance.
    pub debit: Decimal,
}

impl BalanceMutation {
    /// A mutation that only decreases the balance.
    #[must_use]
    pub const fn credit(amount: Decimal) -> Self {
        Self {
            credit: amount,
            debit: Decimal::ZERO,
        }
    }

    /// A mutation that only increases the balance.
    #[must_use]
    pub const fn debit(amount: Decimal) -> Self {
        Self {
            credit: Decimal::ZERO,
            debit: amount,
        }
    }

    /// Net effect on the balance.
    #[must_use]
    pub fn net_change(&self) -> Decimal {
        self.debit - self.credit
    }

    /// The mutation that undoes this one.
    #[must_use]
    pub const fn reversed(&self) -> Self {
        Self {
            credit: self.debit,
            debit: self.credit,
        }
    }

    /// Returns true if the mutation can never fail the sufficiency check.
    #[must_use]
    pub fn is_debit_only(&self) -> bool {
        self.credit.is_zero()
    }
}

/// Current holding of one currency, as read inside a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyPosition {
    /// The currency.
    pub currency_id: CurrencyId,
    /// Balance before the mutation.
    pub balance: Decimal,
}

impl CurrencyPosition {
    /// Creates a position.
    #[must_use]
    pub const fn new(currency_id: CurrencyId, balance: Decimal) -> Self {
        Self {
            currency_id,
            balance,
        }
    }

    /// Applies a mutation to this position.
    ///
    /// # Errors
    ///
    /// - `NegativeAmount` if either side of the mutation is negative
    /// - `Amount` if a side or the resulting balance does not fit a money column
    /// - `InsufficientFunds` if the resulting balance would be below zero
    pub fn apply(&self, mutation: &BalanceMutation) -> Result<MutationOutcome, LedgerError> {
        if mutation.credit < Decimal::ZERO || mutation.debit < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount {
                credit: mutation.credit,
                debit: mutation.debit,
            });
        }
        check_amount("credit", mutation.credit)?;
        check_amount("debit", mutation.debit)?;

        let final_balance = self
            .balance
            .checked_sub(mutation.credit)
            .and_then(|b| b.checked_add(mutation.debit))
            .ok_or(AmountError::OutOfRange {
                field: "balance",
                value: self.balance,
            })?;
        if final_balance < Decimal::ZERO {
            return Err(LedgerError::InsufficientFunds {
                currency_id: self.currency_id,
                required: mutation.credit,
                available: self.balance.saturating_add(mutation.debit),
            });
        }
        check_amount("balance", final_balance)?;

        Ok(MutationOutcome {
            open_balance: self.balance,
            credit: mutation.credit,
            debit: mutation.debit,
            final_balance,
        })
    }
}

/// The before/after figures of one applied mutation.
///
/// These are exactly the figures journaled on a treasury movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationOutcome {
    /// Balance before the mutation.
    pub open_balance: Decimal,
    /// Amount subtracted.
    pub credit: Decimal,
    /// Amount added.
    pub debit: Decimal,
    /// Balance after the mutation.
    pub final_balance: Decimal,
}

impl MutationOutcome {
    /// Returns true if `final == open - credit + debit`.
    #[must_use]
    pub fn reconciles(&self) -> bool {
        self.final_balance == self.open_balance - self.credit + self.debit
    }
}
