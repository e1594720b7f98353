//! Property-based tests for balance mutation arithmetic.

use proptest::prelude::*;
use rust_decimal::Decimal;
use sarraf_shared::types::CurrencyId;

use crate::ledger::error::LedgerError;
use crate::ledger::journal::{JournalLine, audit_chain};
use crate::ledger::mutation::{BalanceMutation, CurrencyPosition};

/// Strategy for non-negative amounts with 4 decimal places.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000_000).prop_map(|units| Decimal::new(units, 4))
}

/// Strategy for one-sided mutations.
fn arb_mutation() -> impl Strategy<Value = BalanceMutation> {
    prop_oneof![
        arb_amount().prop_map(BalanceMutation::credit),
        arb_amount().prop_map(BalanceMutation::debit),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A successful mutation always reconciles and never goes negative.
    #[test]
    fn prop_applied_mutation_reconciles(balance in arb_amount(), mutation in arb_mutation()) {
        let position = CurrencyPosition::new(CurrencyId::new(), balance);
        if let Ok(outcome) = position.apply(&mutation) {
            prop_assert!(outcome.reconciles());
            prop_assert!(outcome.final_balance >= Decimal::ZERO);
            prop_assert_eq!(outcome.open_balance, balance);
        }
    }

    /// Debit-only mutations never fail.
    #[test]
    fn prop_debit_never_fails(balance in arb_amount(), amount in arb_amount()) {
        let position = CurrencyPosition::new(CurrencyId::new(), balance);
        let outcome = position.apply(&BalanceMutation::debit(amount));
        prop_assert!(outcome.is_ok());
    }

    /// A credit fails exactly when it exceeds the balance.
    #[test]
    fn prop_credit_fails_iff_overdraw(balance in arb_amount(), amount in arb_amount()) {
        let position = CurrencyPosition::new(CurrencyId::new(), balance);
        match position.apply(&BalanceMutation::credit(amount)) {
            Ok(outcome) => {
                prop_assert!(amount <= balance);
                prop_assert_eq!(outcome.final_balance, balance - amount);
            }
            Err(LedgerError::InsufficientFunds { required, available, .. }) => {
                prop_assert!(amount > balance);
                prop_assert_eq!(required, amount);
                prop_assert_eq!(available, balance);
            }
            Err(other) => prop_assert!(false, "unexpected error: {other}"),
        }
    }

    /// Applying a mutation and then its reversal restores the balance.
    #[test]
    fn prop_reversal_restores_balance(balance in arb_amount(), amount in arb_amount()) {
        let position = CurrencyPosition::new(CurrencyId::new(), balance);
        let forward = position.apply(&BalanceMutation::debit(amount)).unwrap();
        let back = CurrencyPosition::new(position.currency_id, forward.final_balance)
            .apply(&BalanceMutation::debit(amount).reversed())
            .unwrap();
        prop_assert_eq!(back.final_balance, balance);
    }

    /// Any sequence of successfully applied mutations yields a sound chain
    /// whose last final balance is the running balance.
    #[test]
    fn prop_applied_sequence_forms_sound_chain(
        mutations in prop::collection::vec(arb_mutation(), 0..40)
    ) {
        let currency_id = CurrencyId::new();
        let mut balance = Decimal::ZERO;
        let mut lines = Vec::new();

        for mutation in &mutations {
            if let Ok(outcome) = CurrencyPosition::new(currency_id, balance).apply(mutation) {
                lines.push(JournalLine {
                    sequence: i64::try_from(lines.len()).unwrap() + 1,
                    outcome,
                });
                balance = outcome.final_balance;
            }
        }

        let audit = audit_chain(&lines);
        prop_assert!(audit.matches_balance(balance));
        prop_assert_eq!(audit.entries, lines.len() as u64);
    }
}
