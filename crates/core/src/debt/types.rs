//! Debt domain types.

use rust_decimal::Decimal;
use sarraf_shared::types::DebtId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of an IOU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DebtType {
    /// We borrowed money. Creation increases the balance, repayment decreases it.
    Taken,
    /// We lent money. Creation decreases the balance, collection increases it.
    Given,
}

impl DebtType {
    /// Returns the persisted representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Taken => "TAKEN",
            Self::Given => "GIVEN",
        }
    }

    /// Parses a debt type.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "TAKEN" => Some(Self::Taken),
            "GIVEN" => Some(Self::Given),
            _ => None,
        }
    }

    /// The terminal status a debt of this type reaches when cleared.
    #[must_use]
    pub const fn settled_status(self) -> DebtStatus {
        match self {
            Self::Taken => DebtStatus::Paid,
            Self::Given => DebtStatus::Received,
        }
    }

    /// The payment type recorded for payments on a debt of this type.
    #[must_use]
    pub const fn payment_type(self) -> PaymentType {
        match self {
            Self::Taken => PaymentType::Paid,
            Self::Given => PaymentType::Received,
        }
    }
}

impl fmt::Display for DebtType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Debt status.
///
/// Valid transitions on payment:
/// - Active → Partial
/// - Active → Paid / Received (single payment clears the debt)
/// - Partial → Partial
/// - Partial → Paid / Received
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DebtStatus {
    /// No payment recorded yet.
    Active,
    /// Some but not all of the amount is settled.
    Partial,
    /// A taken debt we have fully repaid (terminal).
    Paid,
    /// A given debt fully collected (terminal).
    Received,
}

impl DebtStatus {
    /// Returns the persisted representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Partial => "PARTIAL",
            Self::Paid => "PAID",
            Self::Received => "RECEIVED",
        }
    }

    /// Parses a status.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "ACTIVE" => Some(Self::Active),
            "PARTIAL" => Some(Self::Partial),
            "PAID" => Some(Self::Paid),
            "RECEIVED" => Some(Self::Received),
            _ => None,
        }
    }

    /// Returns true if no further payments are accepted.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Paid | Self::Received)
    }
}

impl fmt::Display for DebtStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of a debt payment, derived from the parent debt type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentType {
    /// We paid back part of a taken debt.
    Paid,
    /// We collected part of a given debt.
    Received,
}

impl PaymentType {
    /// Returns the persisted representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Paid => "PAID",
            Self::Received => "RECEIVED",
        }
    }

    /// Parses a payment type.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "PAID" => Some(Self::Paid),
            "RECEIVED" => Some(Self::Received),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Amount split of a debt. `paid_amount + remaining_amount == amount` always.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtAmounts {
    /// Original amount.
    pub amount: Decimal,
    /// Cumulative payments.
    pub paid_amount: Decimal,
    /// Outstanding amount.
    pub remaining_amount: Decimal,
}

impl DebtAmounts {
    /// Amounts of a freshly opened debt.
    #[must_use]
    pub const fn opening(amount: Decimal) -> Self {
        Self {
            amount,
            paid_amount: Decimal::ZERO,
            remaining_amount: amount,
        }
    }

    /// Returns true if paid and remaining add up to the original amount.
    #[must_use]
    pub fn is_conserved(&self) -> bool {
        self.paid_amount + self.remaining_amount == self.amount
    }
}

/// The state of a debt as read from storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebtSnapshot {
    /// The debt.
    pub id: DebtId,
    /// Its direction.
    pub debt_type: DebtType,
    /// Its current status.
    pub status: DebtStatus,
    /// Its current amounts.
    pub amounts: DebtAmounts,
}
