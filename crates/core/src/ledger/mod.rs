//! Treasury ledger arithmetic.
//!
//! This module implements the rules behind every balance change:
//! - Balance mutations (credit decreases, debit increases)
//! - The non-negative balance check
//! - Journal chain auditing for reconciliation

pub mod error;
pub mod journal;
pub mod mutation;

#[cfg(test)]
mod mutation_props;

pub use error::LedgerError;
pub use journal::{ChainAudit, JournalLine, audit_chain};
pub use mutation::{BalanceMutation, CurrencyPosition, MutationOutcome};
