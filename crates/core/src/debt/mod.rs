//! Debt (IOU) lifecycle.
//!
//! Debts move ACTIVE → PARTIAL → PAID (taken) or RECEIVED (given). Every
//! transition carries exactly one balance mutation.

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::DebtError;
pub use service::{DebtOpening, DebtService, PaymentTransition};
pub use types::{DebtAmounts, DebtSnapshot, DebtStatus, DebtType, PaymentType};
