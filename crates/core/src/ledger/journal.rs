//! Journal chain auditing.
//!
//! A currency's treasury movements form a chain ordered by `sequence`:
//! - the first movement opens at zero
//! - every movement opens at the previous movement's final balance
//! - every movement satisfies `final = open - credit + debit`
//!
//! The currency's stored balance must equal the final balance of the last
//! movement, or zero when the journal is empty.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::mutation::MutationOutcome;

/// The figures of one journaled movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLine {
    /// Per-currency position of the movement (1-based).
    pub sequence: i64,
    /// The applied mutation.
    pub outcome: MutationOutcome,
}

/// Result of walking one currency's journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainAudit {
    /// Number of movements inspected.
    pub entries: u64,
    /// Final balance of the last movement (zero for an empty journal).
    pub last_final_balance: Decimal,
    /// Sequences run 1..=n and each movement opens where the previous closed.
    pub contiguous: bool,
    /// Every movement reconciles arithmetically.
    pub arithmetic_ok: bool,
    /// Sequence of the first movement that broke either rule.
    pub first_break: Option<i64>,
}

impl ChainAudit {
    /// Returns true if the journal is sound and agrees with `stored_balance`.
    #[must_use]
    pub fn matches_balance(&self, stored_balance: Decimal) -> bool {
        self.contiguous && self.arithmetic_ok && self.last_final_balance == stored_balance
    }
}

/// Walks movements in ascending sequence order and checks the chain rules.
#[must_use]
pub fn audit_chain<'a>(lines: impl IntoIterator<Item = &'a JournalLine>) -> ChainAudit {
    let mut audit = ChainAudit {
        entries: 0,
        last_final_balance: Decimal::ZERO,
        contiguous: true,
        arithmetic_ok: true,
        first_break: None,
    };
    let mut expected_sequence = 1_i64;

    for line in lines {
        let linked = line.sequence == expected_sequence
            && line.outcome.open_balance == audit.last_final_balance;
        let reconciles = line.outcome.reconciles();

        if !linked {
            audit.contiguous = false;
        }
        if !reconciles {
            audit.arithmetic_ok = false;
        }
        if (!linked || !reconciles) && audit.first_break.is_none() {
            audit.first_break = Some(line.sequence);
        }

        audit.entries += 1;
        audit.last_final_balance = line.outcome.final_balance;
        expected_sequence = line.sequence + 1;
    }

    audit
}
