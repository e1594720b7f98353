//! Read-only reconciliation of balances against the journal.
//!
//! Checks, for every currency (deleted ones included):
//! - the stored balance equals the last movement's final balance
//! - the movement chain is contiguous and arithmetically sound
//!
//! and for every debt:
//! - `paid_amount + remaining_amount == amount`
//! - the stored status is the one the state machine implies

use rust_decimal::Decimal;
use sarraf_core::debt::{DebtAmounts, DebtService, DebtStatus};
use sarraf_core::ledger::{ChainAudit, JournalLine, MutationOutcome, audit_chain};
use sarraf_shared::types::{CurrencyId, DebtId};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};
use serde::Serialize;
use tracing::{info, warn};

use crate::entities::{currencies, debts};
use crate::error::TreasuryError;
use crate::repositories::treasury::TreasuryRepository;

/// Reconciliation of one currency.
#[derive(Debug, Clone, Serialize)]
pub struct CurrencyReconciliation {
    /// The currency.
    pub currency_id: CurrencyId,
    /// Its code.
    pub code: String,
    /// Balance stored on the currency row.
    pub stored_balance: Decimal,
    /// Result of walking its journal.
    pub audit: ChainAudit,
}

impl CurrencyReconciliation {
    /// Returns true if the balance and the journal agree.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.audit.matches_balance(self.stored_balance)
    }
}

/// Reconciliation of one debt.
#[derive(Debug, Clone, Serialize)]
pub struct DebtReconciliation {
    /// The debt.
    pub debt_id: DebtId,
    /// `paid_amount + remaining_amount == amount`.
    pub conserved: bool,
    /// Stored status equals the status implied by the amounts.
    pub status_consistent: bool,
}

impl DebtReconciliation {
    /// Returns true if both checks pass.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.conserved && self.status_consistent
    }
}

/// Full reconciliation report.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconciliationReport {
    /// One entry per currency.
    pub currencies: Vec<CurrencyReconciliation>,
    /// One entry per debt.
    pub debts: Vec<DebtReconciliation>,
}

impl ReconciliationReport {
    /// Returns true if nothing drifted.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.currencies.iter().all(CurrencyReconciliation::is_clean)
            && self.debts.iter().all(DebtReconciliation::is_clean)
    }
}

/// Reconciliation repository.
#[derive(Debug, Clone)]
pub struct ReconciliationRepository {
    db: DatabaseConnection,
}

impl ReconciliationRepository {
    /// Creates a new reconciliation repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Reconciles every currency and debt.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn reconcile(&self) -> Result<ReconciliationReport, TreasuryError> {
        let mut report = ReconciliationReport::default();

        let all_currencies = currencies::Entity::find()
            .order_by_asc(currencies::Column::Code)
            .all(&self.db)
            .await?;

        for currency in all_currencies {
            let currency_id = CurrencyId::from_uuid(currency.id);
            let journal = TreasuryRepository::currency_journal(&self.db, currency_id).await?;
            let lines: Vec<JournalLine> = journal
                .iter()
                .map(|m| JournalLine {
                    sequence: m.sequence,
                    outcome: MutationOutcome {
                        open_balance: m.open_balance,
                        credit: m.credit,
                        debit: m.debit,
                        final_balance: m.final_balance,
                    },
                })
                .collect();

            let entry = CurrencyReconciliation {
                currency_id,
                code: currency.code,
                stored_balance: currency.balance,
                audit: audit_chain(&lines),
            };

            if !entry.is_clean() {
                warn!(
                    %currency_id,
                    code = %entry.code,
                    stored_balance = %entry.stored_balance,
                    journal_balance = %entry.audit.last_final_balance,
                    first_break = ?entry.audit.first_break,
                    "currency balance drift"
                );
            }
            report.currencies.push(entry);
        }

        let all_debts = debts::Entity::find()
            .order_by_asc(debts::Column::CreatedAt)
            .all(&self.db)
            .await?;

        for debt in all_debts {
            let amounts = DebtAmounts {
                amount: debt.amount,
                paid_amount: debt.paid_amount,
                remaining_amount: debt.remaining_amount,
            };
            let expected = DebtService::status_for(debt.debt_type.into(), &amounts);
            let entry = DebtReconciliation {
                debt_id: DebtId::from_uuid(debt.id),
                conserved: amounts.is_conserved(),
                status_consistent: expected == DebtStatus::from(debt.status),
            };

            if !entry.is_clean() {
                warn!(debt_id = %entry.debt_id, status = ?debt.status, expected = %expected, "debt drift");
            }
            report.debts.push(entry);
        }

        info!(
            currencies = report.currencies.len(),
            debts = report.debts.len(),
            clean = report.is_clean(),
            "reconciliation finished"
        );
        Ok(report)
    }
}
