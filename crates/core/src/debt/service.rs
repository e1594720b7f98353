//! Debt lifecycle state machine.
//!
//! All methods are pure: they take the current state of a debt and return
//! the new state together with the balance mutation the caller must apply
//! through the treasury protocol in the same transaction.

use rust_decimal::Decimal;

use crate::debt::error::DebtError;
use crate::debt::types::{DebtAmounts, DebtSnapshot, DebtStatus, DebtType, PaymentType};
use crate::ledger::BalanceMutation;
use crate::money::check_amount;

/// Initial state of a new debt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebtOpening {
    /// Amounts with nothing paid.
    pub amounts: DebtAmounts,
    /// Always `Active`.
    pub status: DebtStatus,
    /// Balance change caused by opening the debt.
    pub mutation: BalanceMutation,
}

/// State change caused by one payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentTransition {
    /// Amounts after the payment.
    pub amounts: DebtAmounts,
    /// Status before the payment.
    pub from_status: DebtStatus,
    /// Status after the payment.
    pub new_status: DebtStatus,
    /// Type recorded on the payment row.
    pub payment_type: PaymentType,
    /// Balance change caused by the payment.
    pub mutation: BalanceMutation,
}

impl PaymentTransition {
    /// Returns true if this payment clears the debt.
    #[must_use]
    pub fn settles(&self) -> bool {
        self.new_status.is_terminal()
    }
}

/// Stateless service for debt state transitions.
pub struct DebtService;

impl DebtService {
    /// Opens a debt.
    ///
    /// TAKEN debts bring money in (debit); GIVEN debts pay money out (credit).
    ///
    /// # Errors
    ///
    /// - `NonPositiveAmount` if `amount <= 0`
    /// - `Amount` if it has more than four decimals or is out of range
    pub fn open(debt_type: DebtType, amount: Decimal) -> Result<DebtOpening, DebtError> {
        if amount <= Decimal::ZERO {
            return Err(DebtError::NonPositiveAmount(amount));
        }
        check_amount("amount", amount)?;

        Ok(DebtOpening {
            amounts: DebtAmounts::opening(amount),
            status: DebtStatus::Active,
            mutation: Self::creation_mutation(debt_type, amount),
        })
    }

    /// Balance change caused by opening a debt of `amount`.
    #[must_use]
    pub const fn creation_mutation(debt_type: DebtType, amount: Decimal) -> BalanceMutation {
        match debt_type {
            DebtType::Taken => BalanceMutation::debit(amount),
            DebtType::Given => BalanceMutation::credit(amount),
        }
    }

    /// Applies a payment to a debt.
    ///
    /// # Errors
    ///
    /// - `AlreadySettled` if the debt is PAID or RECEIVED
    /// - `Amount` if `amount` has more than four decimals
    /// - `InvalidPaymentAmount` if `amount <= 0` or `amount > remaining`
    pub fn apply_payment(
        debt: &DebtSnapshot,
        amount: Decimal,
    ) -> Result<PaymentTransition, DebtError> {
        if debt.status.is_terminal() {
            return Err(DebtError::AlreadySettled(debt.id));
        }
        check_amount("amount", amount)?;

        let remaining = debt.amounts.remaining_amount;
        if amount <= Decimal::ZERO || amount > remaining {
            return Err(DebtError::InvalidPaymentAmount { amount, remaining });
        }

        let amounts = DebtAmounts {
            amount: debt.amounts.amount,
            paid_amount: debt.amounts.paid_amount + amount,
            remaining_amount: remaining - amount,
        };

        // Paying back a taken debt spends money; collecting a given debt receives it.
        let mutation = Self::creation_mutation(debt.debt_type, amount).reversed();

        Ok(PaymentTransition {
            amounts,
            from_status: debt.status,
            new_status: Self::status_for(debt.debt_type, &amounts),
            payment_type: debt.debt_type.payment_type(),
            mutation,
        })
    }

    /// The status implied by a debt's amounts.
    #[must_use]
    pub fn status_for(debt_type: DebtType, amounts: &DebtAmounts) -> DebtStatus {
        if amounts.remaining_amount.is_zero() {
            debt_type.settled_status()
        } else if amounts.paid_amount.is_zero() {
            DebtStatus::Active
        } else {
            DebtStatus::Partial
        }
    }

    /// Checks that a debt may be deleted and returns the mutation that
    /// reverses its opening.
    ///
    /// # Errors
    ///
    /// Returns `NotActive` unless the debt is ACTIVE.
    pub fn deletion(debt: &DebtSnapshot) -> Result<BalanceMutation, DebtError> {
        if debt.status != DebtStatus::Active {
            return Err(DebtError::NotActive {
                id: debt.id,
                status: debt.status,
            });
        }

        Ok(Self::creation_mutation(debt.debt_type, debt.amounts.amount).reversed())
    }

    /// Journal statement for opening a debt.
    #[must_use]
    pub fn creation_statement(debt_type: DebtType, debtor_name: &str) -> String {
        format!("Debt {}", Self::subject(debt_type, debtor_name))
    }

    /// Journal statement for a payment.
    #[must_use]
    pub fn payment_statement(debt_type: DebtType, debtor_name: &str, settles: bool) -> String {
        let kind = if settles { "Full" } else { "Partial" };
        format!(
            "{kind} settlement of debt {}",
            Self::subject(debt_type, debtor_name)
        )
    }

    /// Journal statement for deleting a debt.
    #[must_use]
    pub fn reversal_statement(debt_type: DebtType, debtor_name: &str) -> String {
        format!("Reversal of debt {}", Self::subject(debt_type, debtor_name))
    }

    fn subject(debt_type: DebtType, debtor_name: &str) -> String {
        match debt_type {
            DebtType::Taken => format!("taken from {debtor_name}"),
            DebtType::Given => format!("given to {debtor_name}"),
        }
    }
}
